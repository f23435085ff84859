//! Functional core of the circles backend.
//!
//! Holds the domain values and entities, the storage ports the adapters
//! implement, and the application services that orchestrate them. Nothing in
//! this crate performs I/O directly; every side effect goes through a
//! repository trait.

pub mod application;
pub mod domain;
pub mod storage;

//! Serverless backend for users and circles.
//!
//! Controllers translate API Gateway events into application commands from
//! `circles_core`; storage persists entities in a single DynamoDB table,
//! enforcing unique circle names and mail addresses with reservation records
//! written in the same transaction as the entity.

pub mod config;
pub mod controllers;
pub mod storage;

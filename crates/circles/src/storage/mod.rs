//! Storage backend implementations.
//!
//! [`TableRepository`] implements the repository traits defined in
//! `circles_core::storage` once, on top of any [`Table`]. Two tables are
//! provided:
//!
//! - [`dynamodb::DynamoDbTable`]: the production single-table DynamoDB backend
//! - [`inmemory::InMemoryTable`]: a transactional in-memory table for tests and local runs

pub mod conversions;
pub mod dynamodb;
pub mod inmemory;
pub mod keys;
pub mod repository;
pub mod table;

pub use repository::TableRepository;
pub use table::{CancellationReason, Condition, Item, SecondaryIndex, Table, TableError, WriteOp};

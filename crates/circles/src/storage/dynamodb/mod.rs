//! DynamoDB storage backend implementation.
//!
//! This module provides a [`Table`](crate::storage::Table) backed by a single
//! DynamoDB table, using `aws-sdk-dynamodb`. The client is created once from
//! [`Config`](crate::config::Config) and passed in explicitly.

mod client;
mod error;
mod expressions;
mod table;

pub use client::{create_client, target_display};
pub use table::DynamoDbTable;

//! In-memory table for tests and local runs.
//!
//! Items live in a `HashMap` wrapped in `Arc<RwLock<_>>`. Transactions are
//! evaluated under a single write lock, so they are atomic and isolated just
//! like DynamoDB transactions, and cancel with the same per-item reasons.
//!
//! # Example
//!
//! ```rust,ignore
//! use circles::storage::{inmemory::InMemoryTable, TableRepository};
//!
//! let repository = TableRepository::new(InMemoryTable::new());
//! ```

mod table;

pub use table::InMemoryTable;

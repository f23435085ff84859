//! Key-value store abstraction used by the transactional repository.
//!
//! A [`Table`] offers point reads, secondary-index lookups, filtered scans and
//! all-or-nothing transactions of conditional single-item writes. That is
//! exactly what DynamoDB provides, and nothing more is assumed.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use thiserror::Error;

use super::keys;

/// A stored record: attribute name to attribute value.
pub type Item = HashMap<String, AttributeValue>;

/// Secondary indexes of the single table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecondaryIndex {
    /// Circle name lookups.
    Gsi1,
    /// User mail address lookups.
    Gsi2,
}

impl SecondaryIndex {
    /// Attribute holding the index partition key.
    pub fn key_attribute(self) -> &'static str {
        match self {
            Self::Gsi1 => keys::GSI1_PK,
            Self::Gsi2 => keys::GSI2_PK,
        }
    }
}

/// Precondition a single write checks against the current item under its key.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    None,
    Exists,
    NotExists,
    /// The item exists and `attribute` holds the string `value`.
    AttributeEquals {
        attribute: &'static str,
        value: String,
    },
}

impl Condition {
    /// Evaluates the condition against the current item, as the store does server side.
    pub fn is_satisfied_by(&self, current: Option<&Item>) -> bool {
        match self {
            Self::None => true,
            Self::Exists => current.is_some(),
            Self::NotExists => current.is_none(),
            Self::AttributeEquals { attribute, value } => current
                .and_then(|item| item.get(*attribute))
                .and_then(|attribute| attribute.as_s().ok())
                .is_some_and(|current| current == value),
        }
    }
}

/// One write inside a transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Writes `item` as a whole under `key`.
    Put {
        key: String,
        item: Item,
        condition: Condition,
    },
    /// Sets the attributes in `set` on the item under `key`, keeping the others.
    Update {
        key: String,
        set: Item,
        condition: Condition,
    },
    Delete {
        key: String,
        condition: Condition,
    },
}

impl WriteOp {
    pub fn key(&self) -> &str {
        match self {
            Self::Put { key, .. } | Self::Update { key, .. } | Self::Delete { key, .. } => key,
        }
    }

    pub fn condition(&self) -> &Condition {
        match self {
            Self::Put { condition, .. }
            | Self::Update { condition, .. }
            | Self::Delete { condition, .. } => condition,
        }
    }
}

/// Why a transaction item caused (or did not cause) a cancellation.
#[derive(Debug, Clone, PartialEq)]
pub enum CancellationReason {
    /// This item did not cause the cancellation.
    None,
    /// The condition failed. `current` is the item stored under the key, if any.
    ConditionalCheckFailed { current: Option<Item> },
    /// Another transaction touched the same item concurrently.
    TransactionConflict,
    Other(String),
}

impl CancellationReason {
    pub fn is_condition_failure(&self) -> bool {
        matches!(self, Self::ConditionalCheckFailed { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::TransactionConflict)
    }
}

/// Errors returned by a [`Table`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    /// Nothing was written. `reasons` has one entry per write, in request order.
    #[error("Transaction cancelled: {reasons:?}")]
    Cancelled { reasons: Vec<CancellationReason> },
    /// The request may or may not have been applied.
    #[error("Outcome unknown: {0}")]
    Indeterminate(String),
    #[error("Store request failed: {0}")]
    Service(String),
}

/// Transactional key-value store keyed by the partition key attribute `pk`.
#[async_trait]
pub trait Table: Send + Sync {
    /// Strongly consistent point read.
    async fn get_item(&self, key: &str) -> Result<Option<Item>, TableError>;

    /// Returns the items whose index key attribute equals `value`.
    ///
    /// Callers only rely on telling zero, one and more than one result apart,
    /// so implementations may stop after two matches.
    async fn query_index(
        &self,
        index: SecondaryIndex,
        value: &str,
    ) -> Result<Vec<Item>, TableError>;

    /// Returns up to `limit` items whose `entityType` equals `entity_type`.
    async fn scan_entities(&self, entity_type: &str, limit: usize)
        -> Result<Vec<Item>, TableError>;

    /// Applies every write or none of them.
    async fn transact_write(&self, ops: Vec<WriteOp>) -> Result<(), TableError>;
}

//! In-memory table implementation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use tokio::sync::RwLock;

use crate::storage::keys;
use crate::storage::table::{
    CancellationReason, Item, SecondaryIndex, Table, TableError, WriteOp,
};

/// In-memory [`Table`] keyed by `pk`.
///
/// Cloning is cheap and clones share the same items.
#[derive(Debug, Clone)]
pub struct InMemoryTable {
    items: Arc<RwLock<HashMap<String, Item>>>,
}

impl Default for InMemoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTable {
    /// Creates a new empty table.
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Stores `item` under `key` as is, bypassing every condition.
    pub async fn insert_raw(&self, key: impl Into<String>, item: Item) {
        self.items.write().await.insert(key.into(), item);
    }

    /// Returns a copy of every stored item.
    pub async fn snapshot(&self) -> HashMap<String, Item> {
        self.items.read().await.clone()
    }
}

fn string_attribute<'a>(item: &'a Item, attribute: &str) -> Option<&'a str> {
    item.get(attribute)
        .and_then(|value| value.as_s().ok())
        .map(String::as_str)
}

#[async_trait]
impl Table for InMemoryTable {
    async fn get_item(&self, key: &str) -> Result<Option<Item>, TableError> {
        let items = self.items.read().await;
        Ok(items.get(key).cloned())
    }

    async fn query_index(
        &self,
        index: SecondaryIndex,
        value: &str,
    ) -> Result<Vec<Item>, TableError> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|item| string_attribute(item, index.key_attribute()) == Some(value))
            .cloned()
            .collect())
    }

    async fn scan_entities(
        &self,
        entity_type: &str,
        limit: usize,
    ) -> Result<Vec<Item>, TableError> {
        let items = self.items.read().await;
        let mut matching: Vec<(&String, &Item)> = items
            .iter()
            .filter(|(_, item)| string_attribute(item, keys::ENTITY_TYPE) == Some(entity_type))
            .collect();
        matching.sort_by(|a, b| a.0.cmp(b.0));

        Ok(matching
            .into_iter()
            .take(limit)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn transact_write(&self, ops: Vec<WriteOp>) -> Result<(), TableError> {
        let mut items = self.items.write().await;

        {
            let mut seen = HashSet::new();
            if let Some(op) = ops.iter().find(|op| !seen.insert(op.key())) {
                return Err(TableError::Service(format!(
                    "Transaction targets key {} more than once",
                    op.key()
                )));
            }
        }

        let reasons: Vec<CancellationReason> = ops
            .iter()
            .map(|op| {
                let current = items.get(op.key());
                if op.condition().is_satisfied_by(current) {
                    CancellationReason::None
                } else {
                    CancellationReason::ConditionalCheckFailed {
                        current: current.cloned(),
                    }
                }
            })
            .collect();

        if reasons.iter().any(CancellationReason::is_condition_failure) {
            return Err(TableError::Cancelled { reasons });
        }

        for op in ops {
            match op {
                WriteOp::Put { key, item, .. } => {
                    items.insert(key, item);
                }
                WriteOp::Update { key, set, .. } => {
                    // Updating an absent key creates the item, as DynamoDB does.
                    let entry = items.entry(key.clone()).or_insert_with(|| {
                        HashMap::from([(keys::PK.to_string(), AttributeValue::S(key))])
                    });
                    entry.extend(set);
                }
                WriteOp::Delete { key, .. } => {
                    items.remove(&key);
                }
            }
        }

        Ok(())
    }
}

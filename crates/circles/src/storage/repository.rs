//! Uniqueness-enforcing repository over a transactional [`Table`].
//!
//! Every entity is stored as a primary record plus a reservation record whose
//! key embeds the entity's unique attribute value. Both are written, swapped
//! and deleted in the same transaction, and the reservation is only ever put
//! under an `attribute_not_exists` condition, so the store itself rejects a
//! second entity claiming the same value.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use circles_core::domain::{Circle, User};
use circles_core::storage::{
    CircleIdentifier, CircleRepository, RepositoryError, Result, UserIdentifier, UserRepository,
};

use super::conversions::{reservation_item, Record, ENTITY_TYPE_USER};
use super::keys;
use super::table::{CancellationReason, Condition, Item, Table, TableError, WriteOp};

// ============================================================================
// Transaction builders
// ============================================================================

/// Primary put, then reservation put. Both require the key to be free.
pub fn create_ops<R: Record>(record: &R) -> Vec<WriteOp> {
    let reservation_key = R::reservation_key(record.unique_value());
    vec![
        WriteOp::Put {
            key: record.primary_key(),
            item: record.to_item(),
            condition: Condition::NotExists,
        },
        WriteOp::Put {
            item: reservation_item(reservation_key.clone()),
            key: reservation_key,
            condition: Condition::NotExists,
        },
    ]
}

/// Primary update guarded by the unique value observed when the record was read.
///
/// When the unique value changes, the old reservation is deleted and the new
/// one is put in the same transaction.
pub fn update_ops<R: Record>(record: &R, observed_unique_value: &str) -> Vec<WriteOp> {
    let index_attribute = R::INDEX.key_attribute();
    let mut set = record.mutable_attributes();
    let renaming = observed_unique_value != record.unique_value();
    if renaming {
        set.insert(
            index_attribute.to_string(),
            AttributeValue::S(record.unique_value().to_string()),
        );
    }

    let mut ops = vec![WriteOp::Update {
        key: record.primary_key(),
        set,
        condition: Condition::AttributeEquals {
            attribute: index_attribute,
            value: observed_unique_value.to_string(),
        },
    }];

    if renaming {
        let new_reservation_key = R::reservation_key(record.unique_value());
        ops.push(WriteOp::Delete {
            key: R::reservation_key(observed_unique_value),
            condition: Condition::None,
        });
        ops.push(WriteOp::Put {
            item: reservation_item(new_reservation_key.clone()),
            key: new_reservation_key,
            condition: Condition::NotExists,
        });
    }

    ops
}

/// Primary and reservation deletes. Neither is conditioned.
pub fn delete_ops<R: Record>(record: &R) -> Vec<WriteOp> {
    vec![
        WriteOp::Delete {
            key: record.primary_key(),
            condition: Condition::None,
        },
        WriteOp::Delete {
            key: R::reservation_key(record.unique_value()),
            condition: Condition::None,
        },
    ]
}

// ============================================================================
// Error classification
// ============================================================================

/// Maps a table failure that carries no entity-specific meaning.
fn map_table_error(err: TableError) -> RepositoryError {
    match err {
        TableError::Indeterminate(cause) => RepositoryError::Indeterminate(cause),
        TableError::Service(cause) => RepositoryError::Unknown(cause),
        TableError::Cancelled { reasons } => {
            RepositoryError::Unknown(format!("Transaction cancelled: {reasons:?}"))
        }
    }
}

fn failed_at(reasons: &[CancellationReason], index: usize) -> Option<&CancellationReason> {
    reasons.get(index).filter(|reason| reason.is_condition_failure())
}

/// Classifies a failed create by which item's condition failed.
pub fn classify_create_error<R: Record>(err: TableError, record: &R) -> RepositoryError {
    let reasons = match err {
        TableError::Cancelled { reasons } => reasons,
        err => return map_table_error(err),
    };

    if failed_at(&reasons, 0).is_some() {
        RepositoryError::AlreadyExists {
            entity_type: R::ENTITY_LABEL,
            id: record.primary_key(),
        }
    } else if failed_at(&reasons, 1).is_some() {
        RepositoryError::Duplicate {
            entity_type: R::ENTITY_LABEL,
            field: R::UNIQUE_FIELD,
            value: record.unique_value().to_string(),
        }
    } else if reasons.iter().any(CancellationReason::is_conflict) {
        RepositoryError::Conflict {
            entity_type: R::ENTITY_LABEL,
            id: record.primary_key(),
        }
    } else {
        map_table_error(TableError::Cancelled { reasons })
    }
}

/// Classifies a failed update by which item's condition failed.
///
/// A failed primary condition means the record was deleted (no current item)
/// or its unique value changed since it was read.
pub fn classify_update_error<R: Record>(err: TableError, record: &R) -> RepositoryError {
    let reasons = match err {
        TableError::Cancelled { reasons } => reasons,
        err => return map_table_error(err),
    };

    match failed_at(&reasons, 0) {
        Some(CancellationReason::ConditionalCheckFailed { current: None }) => {
            return RepositoryError::NotFound {
                entity_type: R::ENTITY_LABEL,
                id: record.primary_key(),
            }
        }
        Some(_) => {
            return RepositoryError::Conflict {
                entity_type: R::ENTITY_LABEL,
                id: record.primary_key(),
            }
        }
        None => {}
    }

    if failed_at(&reasons, 2).is_some() {
        RepositoryError::Duplicate {
            entity_type: R::ENTITY_LABEL,
            field: R::UNIQUE_FIELD,
            value: record.unique_value().to_string(),
        }
    } else if reasons.iter().any(CancellationReason::is_conflict) {
        RepositoryError::Conflict {
            entity_type: R::ENTITY_LABEL,
            id: record.primary_key(),
        }
    } else {
        map_table_error(TableError::Cancelled { reasons })
    }
}

/// Users and circles share the primary key space, so a key may resolve to a
/// record of the other entity. Such a record is treated as absent. Records
/// without an `entityType` still fail conversion.
fn is_other_entity<R: Record>(item: &Item) -> bool {
    matches!(
        item.get(keys::ENTITY_TYPE),
        Some(AttributeValue::S(entity_type)) if entity_type != R::ENTITY_TYPE
    )
}

// ============================================================================
// Repository
// ============================================================================

/// Repository implementing both storage ports on top of any [`Table`].
pub struct TableRepository<T> {
    table: T,
}

impl<T: Table> TableRepository<T> {
    pub fn new(table: T) -> Self {
        Self { table }
    }

    /// Get the underlying table.
    pub fn table(&self) -> &T {
        &self.table
    }

    async fn create_record<R: Record + Sync>(&self, record: &R) -> Result<()> {
        self.table
            .transact_write(create_ops(record))
            .await
            .map_err(|err| {
                tracing::warn!(
                    entity_type = R::ENTITY_LABEL,
                    id = %record.primary_key(),
                    error = %err,
                    "Create transaction failed"
                );
                classify_create_error(err, record)
            })?;

        tracing::info!(
            entity_type = R::ENTITY_LABEL,
            id = %record.primary_key(),
            "Created record"
        );
        Ok(())
    }

    async fn update_record<R: Record + Sync>(&self, record: &R) -> Result<()> {
        let key = record.primary_key();
        let current = self
            .table
            .get_item(&key)
            .await
            .map_err(map_table_error)?
            .filter(|item| !is_other_entity::<R>(item))
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: R::ENTITY_LABEL,
                id: key.clone(),
            })?;
        let stored = R::from_item(&current)?;

        self.table
            .transact_write(update_ops(record, stored.unique_value()))
            .await
            .map_err(|err| {
                tracing::warn!(
                    entity_type = R::ENTITY_LABEL,
                    id = %key,
                    error = %err,
                    "Update transaction failed"
                );
                classify_update_error(err, record)
            })?;

        tracing::info!(entity_type = R::ENTITY_LABEL, id = %key, "Updated record");
        Ok(())
    }

    async fn get_by_key<R: Record>(&self, key: &str) -> Result<R> {
        let item = self
            .table
            .get_item(key)
            .await
            .map_err(map_table_error)?
            .filter(|item| !is_other_entity::<R>(item))
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: R::ENTITY_LABEL,
                id: key.to_string(),
            })?;
        R::from_item(&item)
    }

    async fn get_by_unique_value<R: Record>(&self, value: &str) -> Result<R> {
        let items = self
            .table
            .query_index(R::INDEX, value)
            .await
            .map_err(map_table_error)?;

        match items.as_slice() {
            [item] => R::from_item(item),
            [] => Err(RepositoryError::NotFound {
                entity_type: R::ENTITY_LABEL,
                id: value.to_string(),
            }),
            _ => {
                tracing::warn!(
                    entity_type = R::ENTITY_LABEL,
                    value,
                    "Unique value resolves to more than one record"
                );
                Err(RepositoryError::NotFound {
                    entity_type: R::ENTITY_LABEL,
                    id: value.to_string(),
                })
            }
        }
    }

    async fn delete_record<R: Record + Sync>(&self, record: &R) -> Result<()> {
        self.table
            .transact_write(delete_ops(record))
            .await
            .map_err(map_table_error)?;

        tracing::info!(
            entity_type = R::ENTITY_LABEL,
            id = %record.primary_key(),
            "Deleted record"
        );
        Ok(())
    }
}

// ============================================================================
// CircleRepository implementation
// ============================================================================

#[async_trait]
impl<T: Table> CircleRepository for TableRepository<T> {
    async fn create(&self, circle: &Circle) -> Result<()> {
        self.create_record(circle).await
    }

    async fn update(&self, circle: &Circle) -> Result<()> {
        self.update_record(circle).await
    }

    async fn get(&self, identifier: &CircleIdentifier) -> Result<Circle> {
        match identifier {
            CircleIdentifier::Id(id) => self.get_by_key(&keys::circle_pk(id)).await,
            CircleIdentifier::Name(name) => self.get_by_unique_value(name.as_str()).await,
        }
    }

    async fn delete(&self, circle: &Circle) -> Result<()> {
        self.delete_record(circle).await
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl<T: Table> UserRepository for TableRepository<T> {
    async fn create(&self, user: &User) -> Result<()> {
        self.create_record(user).await
    }

    async fn update(&self, user: &User) -> Result<()> {
        self.update_record(user).await
    }

    async fn get(&self, identifier: &UserIdentifier) -> Result<User> {
        match identifier {
            UserIdentifier::Id(id) => self.get_by_key(&keys::user_pk(id)).await,
            UserIdentifier::MailAddress(mail_address) => {
                self.get_by_unique_value(mail_address.as_str()).await
            }
        }
    }

    async fn delete(&self, user: &User) -> Result<()> {
        self.delete_record(user).await
    }

    async fn list(&self, limit: usize) -> Result<Vec<User>> {
        let items = self
            .table
            .scan_entities(ENTITY_TYPE_USER, limit)
            .await
            .map_err(map_table_error)?;

        items.iter().map(User::from_item).collect()
    }
}

#[cfg(test)]
mod tests {
    use circles_core::domain::{CircleId, CircleName, UserId};

    use super::*;

    fn circle(name: &str) -> Circle {
        Circle::new(
            CircleId::new("c1").unwrap(),
            CircleName::new(name).unwrap(),
            UserId::new("u1").unwrap(),
            [],
        )
    }

    fn ccf(current: Option<&str>) -> CancellationReason {
        CancellationReason::ConditionalCheckFailed {
            current: current.map(|pk| {
                [("pk".to_string(), AttributeValue::S(pk.to_string()))]
                    .into_iter()
                    .collect()
            }),
        }
    }

    #[test]
    fn test_create_ops_guard_both_keys() {
        let ops = create_ops(&circle("Foo"));

        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].key(), "c1");
        assert_eq!(ops[1].key(), "circleName#Foo");
        assert!(ops.iter().all(|op| op.condition() == &Condition::NotExists));
    }

    #[test]
    fn test_update_ops_without_rename_is_single_guarded_update() {
        let ops = update_ops(&circle("Foo"), "Foo");

        assert_eq!(ops.len(), 1);
        match &ops[0] {
            WriteOp::Update { key, set, condition } => {
                assert_eq!(key, "c1");
                assert!(!set.contains_key("gsi1pk"));
                assert_eq!(
                    condition,
                    &Condition::AttributeEquals {
                        attribute: "gsi1pk",
                        value: "Foo".to_string(),
                    }
                );
            }
            other => panic!("unexpected op: {other:?}"),
        }
    }

    #[test]
    fn test_update_ops_with_rename_swaps_reservations() {
        let ops = update_ops(&circle("Bar"), "Foo");

        assert_eq!(ops.len(), 3);
        match &ops[0] {
            WriteOp::Update { set, .. } => assert_eq!(
                set.get("gsi1pk"),
                Some(&AttributeValue::S("Bar".to_string()))
            ),
            other => panic!("unexpected op: {other:?}"),
        }
        assert_eq!(
            ops[1],
            WriteOp::Delete {
                key: "circleName#Foo".to_string(),
                condition: Condition::None,
            }
        );
        assert_eq!(ops[2].key(), "circleName#Bar");
        assert_eq!(ops[2].condition(), &Condition::NotExists);
    }

    #[test]
    fn test_delete_ops_are_unconditioned() {
        let ops = delete_ops(&circle("Foo"));

        assert_eq!(ops.len(), 2);
        assert_eq!(ops[1].key(), "circleName#Foo");
        assert!(ops.iter().all(|op| op.condition() == &Condition::None));
    }

    #[test]
    fn test_create_classification_by_reason_index() {
        let circle = circle("Foo");

        let id_taken = classify_create_error(
            TableError::Cancelled {
                reasons: vec![ccf(Some("c1")), CancellationReason::None],
            },
            &circle,
        );
        let name_taken = classify_create_error(
            TableError::Cancelled {
                reasons: vec![CancellationReason::None, ccf(Some("circleName#Foo"))],
            },
            &circle,
        );
        let raced = classify_create_error(
            TableError::Cancelled {
                reasons: vec![
                    CancellationReason::TransactionConflict,
                    CancellationReason::None,
                ],
            },
            &circle,
        );

        assert!(matches!(id_taken, RepositoryError::AlreadyExists { .. }));
        assert_eq!(
            name_taken,
            RepositoryError::Duplicate {
                entity_type: "Circle",
                field: "circleName",
                value: "Foo".to_string(),
            }
        );
        assert!(matches!(raced, RepositoryError::Conflict { .. }));
    }

    #[test]
    fn test_create_indeterminate_is_preserved() {
        let err = classify_create_error(
            TableError::Indeterminate("timeout".to_string()),
            &circle("Foo"),
        );

        assert_eq!(err, RepositoryError::Indeterminate("timeout".to_string()));
    }

    #[test]
    fn test_update_classification() {
        let circle = circle("Bar");

        let deleted = classify_update_error(
            TableError::Cancelled {
                reasons: vec![ccf(None), CancellationReason::None, CancellationReason::None],
            },
            &circle,
        );
        let renamed = classify_update_error(
            TableError::Cancelled {
                reasons: vec![
                    ccf(Some("c1")),
                    CancellationReason::None,
                    CancellationReason::None,
                ],
            },
            &circle,
        );
        let name_taken = classify_update_error(
            TableError::Cancelled {
                reasons: vec![
                    CancellationReason::None,
                    CancellationReason::None,
                    ccf(Some("circleName#Bar")),
                ],
            },
            &circle,
        );
        let other = classify_update_error(
            TableError::Cancelled {
                reasons: vec![CancellationReason::Other("ValidationError".to_string())],
            },
            &circle,
        );

        assert!(matches!(deleted, RepositoryError::NotFound { .. }));
        assert!(matches!(renamed, RepositoryError::Conflict { .. }));
        assert!(matches!(name_taken, RepositoryError::Duplicate { .. }));
        assert!(matches!(other, RepositoryError::Unknown(_)));
    }
}

//! DynamoDB-backed [`Table`].

use async_trait::async_trait;
use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::types::{
    AttributeValue, Delete, Put, ReturnValuesOnConditionCheckFailure, TransactWriteItem, Update,
};
use aws_sdk_dynamodb::Client;

use crate::config::Config;
use crate::storage::keys;
use crate::storage::table::{Item, SecondaryIndex, Table, TableError, WriteOp};

use super::error::{map_get_item_error, map_query_error, map_scan_error, map_transact_write_error};
use super::expressions::{condition_expression, conditional_update};

/// Single DynamoDB table with its two secondary indexes.
#[derive(Debug, Clone)]
pub struct DynamoDbTable {
    client: Client,
    table_name: String,
    gsi1_name: String,
    gsi2_name: String,
}

impl DynamoDbTable {
    /// Creates a table handle with the default index names `gsi1` and `gsi2`.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            gsi1_name: "gsi1".to_string(),
            gsi2_name: "gsi2".to_string(),
        }
    }

    /// Creates a table handle using the names from `config`.
    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(client, config.table_name.clone())
            .with_index_names(config.gsi1_name.clone(), config.gsi2_name.clone())
    }

    pub fn with_index_names(mut self, gsi1: impl Into<String>, gsi2: impl Into<String>) -> Self {
        self.gsi1_name = gsi1.into();
        self.gsi2_name = gsi2.into();
        self
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn index_name(&self, index: SecondaryIndex) -> &str {
        match index {
            SecondaryIndex::Gsi1 => &self.gsi1_name,
            SecondaryIndex::Gsi2 => &self.gsi2_name,
        }
    }

    /// Converts one write into a transaction item.
    ///
    /// Conditioned writes ask for the current item back on failure so callers
    /// can tell a deleted record from a concurrently modified one.
    fn transact_item(&self, op: WriteOp) -> Result<TransactWriteItem, BuildError> {
        let item = match op {
            WriteOp::Put {
                item, condition, ..
            } => {
                let mut put = Put::builder().table_name(&self.table_name).set_item(Some(item));
                if let Some(mut expression) = condition_expression(&condition) {
                    put = put
                        .condition_expression(expression.text.clone())
                        .set_expression_attribute_values(expression.values_or_none())
                        .set_expression_attribute_names(Some(expression.names))
                        .return_values_on_condition_check_failure(
                            ReturnValuesOnConditionCheckFailure::AllOld,
                        );
                }
                TransactWriteItem::builder().put(put.build()?).build()
            }
            WriteOp::Update {
                key,
                set,
                condition,
            } => {
                let (mut expression, condition_text) = conditional_update(set, &condition);
                let mut update = Update::builder()
                    .table_name(&self.table_name)
                    .key(keys::PK, AttributeValue::S(key))
                    .update_expression(expression.text.clone())
                    .set_expression_attribute_values(expression.values_or_none())
                    .set_expression_attribute_names(Some(expression.names));
                if let Some(condition_text) = condition_text {
                    update = update
                        .condition_expression(condition_text)
                        .return_values_on_condition_check_failure(
                            ReturnValuesOnConditionCheckFailure::AllOld,
                        );
                }
                TransactWriteItem::builder().update(update.build()?).build()
            }
            WriteOp::Delete { key, condition } => {
                let mut delete = Delete::builder()
                    .table_name(&self.table_name)
                    .key(keys::PK, AttributeValue::S(key));
                if let Some(mut expression) = condition_expression(&condition) {
                    delete = delete
                        .condition_expression(expression.text.clone())
                        .set_expression_attribute_values(expression.values_or_none())
                        .set_expression_attribute_names(Some(expression.names))
                        .return_values_on_condition_check_failure(
                            ReturnValuesOnConditionCheckFailure::AllOld,
                        );
                }
                TransactWriteItem::builder().delete(delete.build()?).build()
            }
        };
        Ok(item)
    }
}

#[async_trait]
impl Table for DynamoDbTable {
    async fn get_item(&self, key: &str) -> Result<Option<Item>, TableError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(keys::PK, AttributeValue::S(key.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(map_get_item_error)?;

        Ok(result.item)
    }

    async fn query_index(
        &self,
        index: SecondaryIndex,
        value: &str,
    ) -> Result<Vec<Item>, TableError> {
        // Two results are enough to detect over-cardinality.
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(self.index_name(index))
            .key_condition_expression("#k = :v")
            .expression_attribute_names("#k", index.key_attribute())
            .expression_attribute_values(":v", AttributeValue::S(value.to_string()))
            .limit(2)
            .send()
            .await
            .map_err(map_query_error)?;

        Ok(result.items.unwrap_or_default())
    }

    async fn scan_entities(
        &self,
        entity_type: &str,
        limit: usize,
    ) -> Result<Vec<Item>, TableError> {
        let mut items = Vec::new();
        let mut exclusive_start_key = None;

        // A filtered scan page may hold fewer matches than requested, so keep
        // paging until the limit is reached or the table is exhausted.
        loop {
            let result = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression("#t = :t")
                .expression_attribute_names("#t", keys::ENTITY_TYPE)
                .expression_attribute_values(":t", AttributeValue::S(entity_type.to_string()))
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await
                .map_err(map_scan_error)?;

            items.extend(result.items.unwrap_or_default());
            if items.len() >= limit {
                items.truncate(limit);
                break;
            }

            match result.last_evaluated_key {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                _ => break,
            }
        }

        Ok(items)
    }

    async fn transact_write(&self, ops: Vec<WriteOp>) -> Result<(), TableError> {
        let transact_items = ops
            .into_iter()
            .map(|op| self.transact_item(op))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| TableError::Service(format!("Invalid transaction item: {err}")))?;

        self.client
            .transact_write_items()
            .set_transact_items(Some(transact_items))
            .send()
            .await
            .map_err(map_transact_write_error)?;

        Ok(())
    }
}

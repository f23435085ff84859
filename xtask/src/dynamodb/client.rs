//! Reads the live table description.

use aws_sdk_dynamodb::types::{IndexStatus, KeyType, TableStatus};
use aws_sdk_dynamodb::Client;

use super::error::{DynamodbError, Result};
use super::planning::{GsiState, Status, TableState};

/// Returns the current table state, or `None` when the table does not exist.
pub async fn get_table_state(client: &Client, table_name: &str) -> Result<Option<TableState>> {
    let response = match client.describe_table().table_name(table_name).send().await {
        Ok(response) => response,
        Err(err) => {
            let err = err.into_service_error();
            if err.is_resource_not_found_exception() {
                return Ok(None);
            }
            return Err(DynamodbError::sdk(err));
        }
    };

    let Some(table) = response.table() else {
        return Ok(None);
    };

    let partition_key = table
        .key_schema()
        .iter()
        .find(|element| element.key_type() == &KeyType::Hash)
        .map(|element| element.attribute_name().to_string());

    let gsis = table
        .global_secondary_indexes()
        .iter()
        .map(|gsi| GsiState {
            name: gsi.index_name().unwrap_or_default().to_string(),
            status: index_status(gsi.index_status()),
        })
        .collect();

    Ok(Some(TableState {
        status: table_status(table.table_status()),
        partition_key,
        gsis,
    }))
}

fn table_status(status: Option<&TableStatus>) -> Status {
    match status {
        Some(TableStatus::Creating) => Status::Creating,
        Some(TableStatus::Updating) => Status::Updating,
        Some(TableStatus::Deleting) => Status::Deleting,
        _ => Status::Active,
    }
}

fn index_status(status: Option<&IndexStatus>) -> Status {
    match status {
        Some(IndexStatus::Creating) => Status::Creating,
        Some(IndexStatus::Updating) => Status::Updating,
        Some(IndexStatus::Deleting) => Status::Deleting,
        _ => Status::Active,
    }
}

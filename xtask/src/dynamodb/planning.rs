//! Pure functions computing what a deploy or destroy has to do.

use super::config::{GsiConfig, TableConfig};
use super::error::{DynamodbError, Result};

/// Observed state of an existing table.
#[derive(Debug, Clone)]
pub struct TableState {
    pub status: Status,
    pub partition_key: Option<String>,
    pub gsis: Vec<GsiState>,
}

/// Lifecycle status shared by tables and indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Creating,
    Updating,
    Deleting,
}

#[derive(Debug, Clone)]
pub struct GsiState {
    pub name: String,
    pub status: Status,
}

impl TableState {
    /// True once the table and every index accept traffic.
    pub fn is_ready(&self) -> bool {
        self.status == Status::Active && self.gsis.iter().all(|gsi| gsi.status == Status::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployPlan {
    CreateTable { config: TableConfig },
    /// DynamoDB accepts one index creation per table update, so these are applied in order.
    AddGsis {
        table_name: String,
        gsis_to_add: Vec<GsiConfig>,
    },
    NoChanges { table_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyPlan {
    DeleteTable { table_name: String },
    AlreadyGone { table_name: String },
}

/// Compares the observed table with the desired layout.
///
/// A table keyed on another attribute cannot be migrated in place and is
/// reported as an error.
pub fn calculate_deploy_plan(
    current: Option<&TableState>,
    desired: &TableConfig,
) -> Result<DeployPlan> {
    let Some(state) = current else {
        return Ok(DeployPlan::CreateTable {
            config: desired.clone(),
        });
    };

    if state.partition_key.as_deref() != Some(desired.partition_key.as_str()) {
        return Err(DynamodbError::KeySchemaMismatch {
            table_name: desired.table_name.clone(),
            expected: desired.partition_key.clone(),
            found: state
                .partition_key
                .clone()
                .unwrap_or_else(|| "<none>".to_string()),
        });
    }

    let gsis_to_add: Vec<GsiConfig> = desired
        .gsis
        .iter()
        .filter(|gsi| !state.gsis.iter().any(|existing| existing.name == gsi.name))
        .cloned()
        .collect();

    if gsis_to_add.is_empty() {
        Ok(DeployPlan::NoChanges {
            table_name: desired.table_name.clone(),
        })
    } else {
        Ok(DeployPlan::AddGsis {
            table_name: desired.table_name.clone(),
            gsis_to_add,
        })
    }
}

pub fn calculate_destroy_plan(current: Option<&TableState>, table_name: &str) -> DestroyPlan {
    let table_name = table_name.to_string();
    match current {
        Some(_) => DestroyPlan::DeleteTable { table_name },
        None => DestroyPlan::AlreadyGone { table_name },
    }
}

pub fn format_deploy_plan(plan: &DeployPlan) -> Vec<String> {
    match plan {
        DeployPlan::CreateTable { config } => {
            let mut lines = vec![
                format!("+ Create table: {}", config.table_name),
                format!("  Partition key: {} (S)", config.partition_key),
            ];
            for gsi in &config.gsis {
                lines.push(format!(
                    "  + GSI: {} on {} (S), projection ALL",
                    gsi.name, gsi.partition_key
                ));
            }
            lines.push("  Billing: PAY_PER_REQUEST".to_string());
            lines
        }
        DeployPlan::AddGsis {
            table_name,
            gsis_to_add,
        } => std::iter::once(format!("~ Update table: {table_name}"))
            .chain(
                gsis_to_add
                    .iter()
                    .map(|gsi| format!("  + Add GSI: {} on {} (S)", gsi.name, gsi.partition_key)),
            )
            .collect(),
        DeployPlan::NoChanges { table_name } => {
            vec![format!("= Table '{table_name}' is up to date")]
        }
    }
}

pub fn format_destroy_plan(plan: &DestroyPlan) -> Vec<String> {
    match plan {
        DestroyPlan::DeleteTable { table_name } => {
            vec![format!("- Delete table: {table_name} (ALL DATA WILL BE LOST)")]
        }
        DestroyPlan::AlreadyGone { table_name } => {
            vec![format!("= Table '{table_name}' does not exist")]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desired() -> TableConfig {
        TableConfig {
            table_name: "circles".to_string(),
            partition_key: "pk".to_string(),
            gsis: vec![
                GsiConfig {
                    name: "gsi1".to_string(),
                    partition_key: "gsi1pk".to_string(),
                },
                GsiConfig {
                    name: "gsi2".to_string(),
                    partition_key: "gsi2pk".to_string(),
                },
            ],
        }
    }

    fn existing(partition_key: &str, gsis: &[&str]) -> TableState {
        TableState {
            status: Status::Active,
            partition_key: Some(partition_key.to_string()),
            gsis: gsis
                .iter()
                .map(|name| GsiState {
                    name: name.to_string(),
                    status: Status::Active,
                })
                .collect(),
        }
    }

    #[test]
    fn test_missing_table_is_created() {
        let plan = calculate_deploy_plan(None, &desired()).unwrap();

        assert_eq!(plan, DeployPlan::CreateTable { config: desired() });
        assert_eq!(
            format_deploy_plan(&plan),
            vec![
                "+ Create table: circles",
                "  Partition key: pk (S)",
                "  + GSI: gsi1 on gsi1pk (S), projection ALL",
                "  + GSI: gsi2 on gsi2pk (S), projection ALL",
                "  Billing: PAY_PER_REQUEST",
            ]
        );
    }

    #[test]
    fn test_only_missing_indexes_are_added() {
        let plan = calculate_deploy_plan(Some(&existing("pk", &["gsi1"])), &desired()).unwrap();

        match plan {
            DeployPlan::AddGsis { gsis_to_add, .. } => {
                assert_eq!(gsis_to_add.len(), 1);
                assert_eq!(gsis_to_add[0].name, "gsi2");
            }
            other => panic!("expected AddGsis, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_table_needs_nothing() {
        let plan =
            calculate_deploy_plan(Some(&existing("pk", &["gsi1", "gsi2"])), &desired()).unwrap();

        assert!(matches!(plan, DeployPlan::NoChanges { .. }));
    }

    #[test]
    fn test_foreign_key_schema_is_rejected() {
        let err = calculate_deploy_plan(Some(&existing("PK", &[])), &desired()).unwrap_err();

        assert!(matches!(err, DynamodbError::KeySchemaMismatch { .. }));
    }

    #[test]
    fn test_destroy_plans() {
        assert_eq!(
            calculate_destroy_plan(None, "circles"),
            DestroyPlan::AlreadyGone {
                table_name: "circles".to_string()
            }
        );
        assert_eq!(
            format_destroy_plan(&calculate_destroy_plan(Some(&existing("pk", &[])), "circles")),
            vec!["- Delete table: circles (ALL DATA WILL BE LOST)"]
        );
    }

    #[test]
    fn test_readiness_waits_for_indexes() {
        let mut state = existing("pk", &["gsi1"]);
        assert!(state.is_ready());

        state.gsis[0].status = Status::Creating;
        assert!(!state.is_ready());
    }
}

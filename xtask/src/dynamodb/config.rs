//! Desired table layout (pure data).

use circles::config::Config;
use circles::storage::keys;

/// Schema of the single table: a string partition key and string-keyed GSIs
/// projecting every attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: String,
    pub gsis: Vec<GsiConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsiConfig {
    pub name: String,
    pub partition_key: String,
}

impl TableConfig {
    pub fn with_table_name(mut self, name: &str) -> Self {
        self.table_name = name.to_string();
        self
    }

    /// Every key attribute the table and its indexes need defined.
    pub fn key_attributes(&self) -> Vec<&str> {
        let mut attributes = vec![self.partition_key.as_str()];
        for gsi in &self.gsis {
            if !attributes.contains(&gsi.partition_key.as_str()) {
                attributes.push(gsi.partition_key.as_str());
            }
        }
        attributes
    }
}

/// Table holding circles, users and their reservations.
///
/// `gsi1` resolves circle names and `gsi2` resolves mail addresses; index
/// names follow the runtime configuration.
pub fn circles_table_config(config: &Config) -> TableConfig {
    TableConfig {
        table_name: config.table_name.clone(),
        partition_key: keys::PK.to_string(),
        gsis: vec![
            GsiConfig {
                name: config.gsi1_name.clone(),
                partition_key: keys::GSI1_PK.to_string(),
            },
            GsiConfig {
                name: config.gsi2_name.clone(),
                partition_key: keys::GSI2_PK.to_string(),
            },
        ],
    }
}

//! YAML configuration for the generate command.
//!
//! Supports a default row count, a seed, and per-table row-count overrides.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Per-table settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Row count for this table (overrides the default)
    pub rows: Option<usize>,
}

/// Complete YAML configuration for the generate command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateYamlConfig {
    /// Random seed (the --seed flag wins when both are given)
    pub seed: Option<u64>,
    /// Default row count for every table
    pub rows: Option<usize>,
    /// Per-table settings
    #[serde(default)]
    pub tables: HashMap<String, TableConfig>,
}

impl GenerateYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: GenerateYamlConfig = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Get the row override for a specific table (case-insensitive)
    pub fn table_rows(&self, table_name: &str) -> Option<usize> {
        self.tables
            .get(table_name)
            .or_else(|| {
                let lower = table_name.to_lowercase();
                self.tables
                    .iter()
                    .find(|(k, _)| k.to_lowercase() == lower)
                    .map(|(_, v)| v)
            })
            .and_then(|t| t.rows)
    }
}

/// Resolved row counts: a uniform default plus per-table overrides
#[derive(Debug, Clone)]
pub struct RowCounts {
    default: usize,
    overrides: AHashMap<String, usize>,
}

impl RowCounts {
    /// Uniform count for every table
    pub fn uniform(default: usize) -> Self {
        Self {
            default,
            overrides: AHashMap::new(),
        }
    }

    /// Override the count for one table
    pub fn with_override(mut self, table_name: &str, rows: usize) -> Self {
        self.overrides.insert(table_name.to_string(), rows);
        self
    }

    /// Build counts from a default and the YAML config's per-table overrides
    pub fn from_config(default: usize, config: &GenerateYamlConfig) -> Self {
        let mut counts = Self::uniform(config.rows.unwrap_or(default));
        for table in crate::catalog::TABLES {
            if let Some(rows) = config.table_rows(table.name) {
                counts.overrides.insert(table.name.to_string(), rows);
            }
        }
        counts
    }

    /// Row count for a table
    pub fn rows_for(&self, table_name: &str) -> usize {
        self.overrides
            .get(table_name)
            .copied()
            .unwrap_or(self.default)
    }
}

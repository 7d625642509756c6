//! Referential integrity verification over written CSV tables.
//!
//! For every declared (parent table, parent key, child table, child key)
//! relationship, loads both key columns and checks that the child's value
//! set is a subset of the parent's. Failures are contained per relationship:
//! a missing file or missing column fails that relationship only, and every
//! relationship is always evaluated.

use crate::catalog;
use crate::csvio;
use ahash::AHashSet;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Maximum number of offending example keys reported per relationship
const MAX_EXAMPLES: usize = 5;

/// One verifiable FK relationship
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Relationship {
    pub parent_table: &'static str,
    pub parent_key: &'static str,
    pub child_table: &'static str,
    pub child_key: &'static str,
}

impl Relationship {
    /// All declared relationships, derived from the catalog's FK declarations
    pub fn all() -> Vec<Relationship> {
        catalog::TABLES
            .iter()
            .flat_map(|table| {
                table.foreign_keys.iter().map(|fk| Relationship {
                    parent_table: fk.parent,
                    parent_key: fk.parent_column,
                    child_table: table.name,
                    child_key: fk.column,
                })
            })
            .collect()
    }

    pub fn parent_file(&self) -> String {
        format!("{}.csv", self.parent_table)
    }

    pub fn child_file(&self) -> String {
        format!("{}.csv", self.child_table)
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) -> {} ({})",
            self.child_file(),
            self.child_key,
            self.parent_file(),
            self.parent_key
        )
    }
}

/// Outcome of checking one relationship
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    /// Every child key exists in the parent key set
    Passed,
    /// Child keys missing from the parent; count is distinct offending values
    InvalidKeys { count: usize, examples: Vec<String> },
    /// An artifact could not be read
    LoadFailed { message: String },
    /// A declared key column is absent from the loaded table
    MissingColumn { table: String, column: String },
}

impl CheckStatus {
    pub fn passed(&self) -> bool {
        matches!(self, CheckStatus::Passed)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Passed => write!(f, "PASSED: all foreign keys are valid"),
            CheckStatus::InvalidKeys { count, examples } => {
                write!(
                    f,
                    "FAILED: found {} invalid foreign key(s); examples: [{}]",
                    count,
                    examples.join(", ")
                )
            }
            CheckStatus::LoadFailed { message } => {
                write!(f, "FAILED: could not load artifact ({})", message)
            }
            CheckStatus::MissingColumn { table, column } => {
                write!(f, "FAILED: column {} not found in {}.csv", column, table)
            }
        }
    }
}

/// Result for one relationship
#[derive(Debug, Clone, Serialize)]
pub struct RelationshipReport {
    pub relationship: Relationship,
    #[serde(flatten)]
    pub status: CheckStatus,
}

/// Aggregate verification result
#[derive(Debug, Serialize)]
pub struct VerifySummary {
    pub reports: Vec<RelationshipReport>,
    pub checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub all_passed: bool,
}

impl VerifySummary {
    pub fn failures(&self) -> Vec<&RelationshipReport> {
        self.reports.iter().filter(|r| !r.status.passed()).collect()
    }
}

/// Verifier over one directory of CSV artifacts
pub struct Verifier {
    dir: PathBuf,
}

impl Verifier {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Check every declared relationship; failures never abort the pass
    pub fn verify(&self) -> VerifySummary {
        let mut reports = Vec::new();
        for relationship in Relationship::all() {
            let status = self.check(&relationship);
            reports.push(RelationshipReport {
                relationship,
                status,
            });
        }

        let checked = reports.len();
        let passed = reports.iter().filter(|r| r.status.passed()).count();
        VerifySummary {
            checked,
            passed,
            failed: checked - passed,
            all_passed: passed == checked,
            reports,
        }
    }

    fn check(&self, relationship: &Relationship) -> CheckStatus {
        let parent_keys: AHashSet<String> =
            match self.load_column(relationship.parent_table, relationship.parent_key) {
                Ok(values) => values.into_iter().collect(),
                Err(status) => return status,
            };
        let child_keys =
            match self.load_column(relationship.child_table, relationship.child_key) {
                Ok(values) => values,
                Err(status) => return status,
            };

        let mut invalid: AHashSet<String> = AHashSet::new();
        let mut examples = Vec::new();
        for key in child_keys {
            if !parent_keys.contains(&key) && invalid.insert(key.clone()) && examples.len() < MAX_EXAMPLES {
                examples.push(key);
            }
        }

        if invalid.is_empty() {
            CheckStatus::Passed
        } else {
            CheckStatus::InvalidKeys {
                count: invalid.len(),
                examples,
            }
        }
    }

    fn load_column(&self, table: &str, column: &str) -> Result<Vec<String>, CheckStatus> {
        let path = self.dir.join(format!("{}.csv", table));
        match csvio::read_column(&path, column) {
            Ok(Some(values)) => Ok(values),
            Ok(None) => Err(CheckStatus::MissingColumn {
                table: table.to_string(),
                column: column.to_string(),
            }),
            Err(e) => Err(CheckStatus::LoadFailed {
                message: format!("{}: {}", path.display(), e),
            }),
        }
    }
}

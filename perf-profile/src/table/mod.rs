//! Run table
//!
//! In-memory table of raw run outcomes, one row per
//! (instance, combo, repetition). Tables are usually loaded from a results
//! document shaped `{"results": [ <row>, ... ]}`.

pub mod record;

pub use record::{KeyTuple, RunRecord};

use crate::error::{ProfileError, ProfileResult};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

/// Ordered collection of run records plus the columns they expose
#[derive(Debug, Clone, Default)]
pub struct RunTable {
    rows: Vec<RunRecord>,
    columns: BTreeSet<String>,
}

impl RunTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from records
    pub fn from_records(records: impl IntoIterator<Item = RunRecord>) -> Self {
        let mut table = Self::new();
        for record in records {
            table.push(record);
        }
        table
    }

    /// Append a record
    pub fn push(&mut self, record: RunRecord) {
        self.columns.extend(record.columns().cloned());
        self.rows.push(record);
    }

    /// Parse a results document from a JSON string
    pub fn from_json_str(json: &str) -> ProfileResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// Build a table from `{"results": [...]}` or a bare array of rows
    pub fn from_json_value(value: Value) -> ProfileResult<Self> {
        let rows = match value {
            Value::Array(rows) => rows,
            Value::Object(mut doc) => match doc.remove("results") {
                Some(Value::Array(rows)) => rows,
                Some(_) => {
                    return Err(ProfileError::config(
                        "'results' must be an array of run records",
                    ))
                }
                None => {
                    return Err(ProfileError::config(
                        "results document has no 'results' array",
                    ))
                }
            },
            _ => {
                return Err(ProfileError::config(
                    "expected {\"results\": [...]} or an array of run records",
                ))
            }
        };

        let mut table = Self::new();
        let mut skipped = 0usize;
        for row in rows {
            match RunRecord::from_value(row) {
                Some(record) => table.push(record),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!(skipped, "Skipped run records that are not JSON objects");
        }
        debug!(
            rows = table.len(),
            columns = table.columns.len(),
            "Loaded run table"
        );
        Ok(table)
    }

    /// Load a results document from disk
    pub fn load(path: impl AsRef<Path>) -> ProfileResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Whether any row exposes `column`
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// Column names seen on any row, sorted
    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.columns.iter()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, RunRecord> {
        self.rows.iter()
    }

    /// All rows
    pub fn rows(&self) -> &[RunRecord] {
        &self.rows
    }
}

impl FromIterator<RunRecord> for RunTable {
    fn from_iter<I: IntoIterator<Item = RunRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

impl<'a> IntoIterator for &'a RunTable {
    type Item = &'a RunRecord;
    type IntoIter = std::slice::Iter<'a, RunRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

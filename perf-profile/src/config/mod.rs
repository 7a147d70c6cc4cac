//! Profile configuration
//!
//! A [`ProfileConfig`] is the static recipe for one kind of profile: which
//! columns identify an instance and a solver configuration, which criterion
//! is compared, which runs count, and how repetitions are reduced.
//!
//! # Usage
//!
//! ```rust,ignore
//! use perf_profile::config::{aggregate, ProfileConfig};
//! use perf_profile::criterion::Criterion;
//!
//! let config = ProfileConfig::new(Criterion::builtin("iterations").unwrap())
//!     .with_instance_keys(["problem"])
//!     .with_combo_keys(["solver", "preconditioner"])
//!     .with_aggregate(aggregate::median);
//! ```

pub mod aggregate;
pub mod settings;

pub use aggregate::Reducer;
pub use settings::{ProfileSettings, ProfileSpec};

use crate::criterion::Criterion;
use crate::error::{ColumnRole, ProfileError, ProfileResult};
use crate::table::{RunRecord, RunTable};
use std::sync::Arc;

/// Predicate over run records
pub type RowPredicate = Arc<dyn Fn(&RunRecord) -> bool + Send + Sync>;

/// Default instance key columns
pub const DEFAULT_INSTANCE_KEYS: &[&str] = &["problem", "size"];
/// Default combo key columns
pub const DEFAULT_COMBO_KEYS: &[&str] = &["solver"];
/// Default success column
pub const DEFAULT_SUCCESS_COLUMN: &str = "success";

/// Recipe combining a criterion with grouping, filtering and reduction rules
#[derive(Clone)]
pub struct ProfileConfig {
    pub instance_key_columns: Vec<String>,
    pub combo_key_columns: Vec<String>,
    pub criterion: Criterion,
    is_success: RowPredicate,
    is_included: RowPredicate,
    pub aggregate: Reducer,
}

impl ProfileConfig {
    /// Config with default keys, `success` column, no exclusions and mean reduction
    pub fn new(criterion: Criterion) -> Self {
        Self {
            instance_key_columns: to_strings(DEFAULT_INSTANCE_KEYS),
            combo_key_columns: to_strings(DEFAULT_COMBO_KEYS),
            criterion,
            is_success: success_column(DEFAULT_SUCCESS_COLUMN),
            is_included: Arc::new(|_| true),
            aggregate: aggregate::mean,
        }
    }

    pub fn with_instance_keys<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instance_key_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_combo_keys<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.combo_key_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the success predicate
    pub fn with_success<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&RunRecord) -> bool + Send + Sync + 'static,
    {
        self.is_success = Arc::new(predicate);
        self
    }

    /// Replace the success predicate with a shared one, e.g. [`success_column`]
    pub fn with_success_predicate(mut self, predicate: RowPredicate) -> Self {
        self.is_success = predicate;
        self
    }

    /// Replace the inclusion predicate
    pub fn with_inclusion<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&RunRecord) -> bool + Send + Sync + 'static,
    {
        self.is_included = Arc::new(predicate);
        self
    }

    pub fn with_aggregate(mut self, reducer: Reducer) -> Self {
        self.aggregate = reducer;
        self
    }

    pub fn is_success(&self, row: &RunRecord) -> bool {
        (self.is_success)(row)
    }

    pub fn is_included(&self, row: &RunRecord) -> bool {
        (self.is_included)(row)
    }

    /// Check that every configured key column exists in `table`
    pub fn validate(&self, table: &RunTable) -> ProfileResult<()> {
        let keys = self
            .instance_key_columns
            .iter()
            .map(|c| (c, ColumnRole::Instance))
            .chain(self.combo_key_columns.iter().map(|c| (c, ColumnRole::Combo)));
        for (column, role) in keys {
            if !table.has_column(column) {
                return Err(ProfileError::schema(column.clone(), role));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ProfileConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileConfig")
            .field("instance_key_columns", &self.instance_key_columns)
            .field("combo_key_columns", &self.combo_key_columns)
            .field("criterion", &self.criterion)
            .finish_non_exhaustive()
    }
}

/// Success predicate reading a boolean column
pub fn success_column(column: impl Into<String>) -> RowPredicate {
    let column = column.into();
    Arc::new(move |row| row.flag(&column))
}

fn to_strings(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(rows: serde_json::Value) -> RunTable {
        RunTable::from_json_value(rows).unwrap()
    }

    fn wall_time() -> Criterion {
        Criterion::builtin("wall_time").unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = ProfileConfig::new(wall_time());
        assert_eq!(config.instance_key_columns, vec!["problem", "size"]);
        assert_eq!(config.combo_key_columns, vec!["solver"]);

        let ok = RunRecord::from_value(json!({"success": true})).unwrap();
        let failed = RunRecord::from_value(json!({"success": false})).unwrap();
        let unknown = RunRecord::from_value(json!({})).unwrap();
        assert!(config.is_success(&ok));
        assert!(!config.is_success(&failed));
        assert!(!config.is_success(&unknown));
        assert!(config.is_included(&failed));
    }

    #[test]
    fn test_shared_success_predicate() {
        let config =
            ProfileConfig::new(wall_time()).with_success_predicate(success_column("converged"));
        let converged =
            RunRecord::from_value(json!({"converged": true, "success": false})).unwrap();
        let plain = RunRecord::from_value(json!({"success": true})).unwrap();
        assert!(config.is_success(&converged));
        assert!(!config.is_success(&plain));
    }

    #[test]
    fn test_validate_reports_missing_column_and_role() {
        let config = ProfileConfig::new(wall_time());
        let rows = table(json!([{"problem": "p", "size": 1, "success": true}]));

        match config.validate(&rows) {
            Err(ProfileError::Schema { column, role }) => {
                assert_eq!(column, "solver");
                assert_eq!(role, ColumnRole::Combo);
            }
            other => panic!("expected schema error, got {:?}", other),
        }

        let rows = table(json!([{"problem": "p", "solver": "a"}]));
        match config.validate(&rows) {
            Err(ProfileError::Schema { column, role }) => {
                assert_eq!(column, "size");
                assert_eq!(role, ColumnRole::Instance);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_passes() {
        let config = ProfileConfig::new(wall_time()).with_instance_keys(["problem"]);
        let rows = table(json!([{"problem": "p", "solver": "a"}]));
        assert!(config.validate(&rows).is_ok());
    }

    #[test]
    fn test_custom_predicates() {
        let config = ProfileConfig::new(wall_time())
            .with_success(|row| row.number_at("status") == 0.0)
            .with_inclusion(|row| row.key_value("precision").as_deref() == Some("double"));

        let row = RunRecord::from_value(json!({"status": 0, "precision": "single"})).unwrap();
        assert!(config.is_success(&row));
        assert!(!config.is_included(&row));
    }
}

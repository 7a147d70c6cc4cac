//! Profile settings file
//!
//! Declares profiles in TOML so a registry can be populated at startup
//! without code changes:
//!
//! ```toml
//! [profiles.wall_time]
//! criterion = "wall_time"
//! instance_keys = ["problem", "size"]
//! combo_keys = ["solver"]
//! aggregate = "median"
//!
//! [profiles.wall_time.include]
//! precision = "double"
//! threads = [1, 4]
//!
//! [profiles.score]
//! metric = "quality.score"
//! direction = "higher"
//! ```

use super::{aggregate, success_column, ProfileConfig, DEFAULT_COMBO_KEYS};
use super::{DEFAULT_INSTANCE_KEYS, DEFAULT_SUCCESS_COLUMN};
use crate::criterion::{Criterion, MetricDirection};
use crate::error::{ProfileError, ProfileResult};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Top-level settings document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileSettings {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileSpec>,
}

/// Declarative description of one profile
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileSpec {
    /// Built-in criterion name
    pub criterion: Option<String>,
    /// Dotted metric path, alternative to `criterion`
    pub metric: Option<String>,
    /// Direction for `metric` (defaults to lower)
    pub direction: Option<MetricDirection>,
    #[serde(default = "default_instance_keys")]
    pub instance_keys: Vec<String>,
    #[serde(default = "default_combo_keys")]
    pub combo_keys: Vec<String>,
    #[serde(default = "default_aggregate")]
    pub aggregate: String,
    #[serde(default = "default_success_column")]
    pub success_column: String,
    /// Equality filters; an array value matches any of its elements
    #[serde(default)]
    pub include: BTreeMap<String, toml::Value>,
}

fn default_instance_keys() -> Vec<String> {
    DEFAULT_INSTANCE_KEYS.iter().map(|s| s.to_string()).collect()
}

fn default_combo_keys() -> Vec<String> {
    DEFAULT_COMBO_KEYS.iter().map(|s| s.to_string()).collect()
}

fn default_aggregate() -> String {
    "mean".to_string()
}

fn default_success_column() -> String {
    DEFAULT_SUCCESS_COLUMN.to_string()
}

impl ProfileSettings {
    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> ProfileResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> ProfileResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Convert every declared profile into a config, sorted by name
    pub fn into_configs(self) -> ProfileResult<Vec<(String, ProfileConfig)>> {
        self.profiles
            .into_iter()
            .map(|(name, spec)| {
                let config = spec.into_config(&name)?;
                Ok((name, config))
            })
            .collect()
    }
}

impl ProfileSpec {
    /// Resolve names and filters into a runnable config
    pub fn into_config(self, name: &str) -> ProfileResult<ProfileConfig> {
        let criterion = match (&self.criterion, &self.metric) {
            (Some(builtin), None) => {
                if self.direction.is_some() {
                    return Err(ProfileError::config(format!(
                        "profile '{}': 'direction' only applies to 'metric'",
                        name
                    )));
                }
                Criterion::builtin(builtin).ok_or_else(|| {
                    ProfileError::config(format!(
                        "profile '{}': unknown criterion '{}' (expected one of: {})",
                        name,
                        builtin,
                        Criterion::builtin_names().join(", ")
                    ))
                })?
            }
            (None, Some(path)) => Criterion::from_path(
                name,
                path.clone(),
                self.direction.unwrap_or(MetricDirection::LowerIsBetter),
            ),
            _ => {
                return Err(ProfileError::config(format!(
                    "profile '{}': set exactly one of 'criterion' or 'metric'",
                    name
                )))
            }
        };

        let reducer = aggregate::reducer_by_name(&self.aggregate).ok_or_else(|| {
            ProfileError::config(format!(
                "profile '{}': unknown aggregate '{}' (expected one of: {})",
                name,
                self.aggregate,
                aggregate::REDUCER_NAMES.join(", ")
            ))
        })?;

        if self.instance_keys.is_empty() || self.combo_keys.is_empty() {
            return Err(ProfileError::config(format!(
                "profile '{}': instance_keys and combo_keys must not be empty",
                name
            )));
        }

        let filters = self
            .include
            .into_iter()
            .map(|(column, value)| {
                let allowed = match serde_json::to_value(value).map_err(ProfileError::Json)? {
                    Value::Array(values) => values,
                    single => vec![single],
                };
                Ok((column, allowed))
            })
            .collect::<ProfileResult<Vec<_>>>()?;

        Ok(ProfileConfig::new(criterion)
            .with_instance_keys(self.instance_keys)
            .with_combo_keys(self.combo_keys)
            .with_aggregate(reducer)
            .with_success_predicate(success_column(self.success_column))
            .with_inclusion(move |row| {
                filters.iter().all(|(column, allowed)| {
                    row.get(column).is_some_and(|value| {
                        allowed.iter().any(|a| filter_matches(a, value))
                    })
                })
            }))
    }
}

/// Filter equality; numbers compare by value so `1` matches `1.0`
fn filter_matches(allowed: &Value, value: &Value) -> bool {
    match (allowed.as_f64(), value.as_f64()) {
        (Some(a), Some(v)) => a == v,
        _ => allowed == value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RunRecord;
    use serde_json::json;
    use std::io::Write;

    fn row(value: Value) -> RunRecord {
        RunRecord::from_value(value).unwrap()
    }

    #[test]
    fn test_builtin_profile_with_filters() {
        let settings = ProfileSettings::from_toml_str(
            r#"
            [profiles.wall_time]
            criterion = "wall_time"
            instance_keys = ["problem"]
            combo_keys = ["solver", "linsolve"]
            aggregate = "median"

            [profiles.wall_time.include]
            precision = "double"
            threads = [1, 4]
            "#,
        )
        .unwrap();

        let configs = settings.into_configs().unwrap();
        assert_eq!(configs.len(), 1);
        let (name, config) = &configs[0];
        assert_eq!(name, "wall_time");
        assert_eq!(config.instance_key_columns, vec!["problem"]);
        assert_eq!(config.combo_key_columns, vec!["solver", "linsolve"]);
        assert_eq!((config.aggregate)(&[1.0, 2.0, 10.0]), 2.0);

        assert!(config.is_included(&row(json!({"precision": "double", "threads": 4}))));
        assert!(!config.is_included(&row(json!({"precision": "double", "threads": 2}))));
        assert!(!config.is_included(&row(json!({"precision": "single", "threads": 1}))));
        assert!(!config.is_included(&row(json!({"threads": 1}))));
    }

    #[test]
    fn test_numeric_filters_ignore_representation() {
        let settings = ProfileSettings::from_toml_str(
            r#"
            [profiles.threads]
            criterion = "cpu_time"

            [profiles.threads.include]
            threads = 1
            tolerance = [1.0e-6, 0.5]
            "#,
        )
        .unwrap();
        let (_, config) = settings.into_configs().unwrap().remove(0);

        assert!(config.is_included(&row(json!({"threads": 1.0, "tolerance": 0.5}))));
        assert!(config.is_included(&row(json!({"threads": 1, "tolerance": 1e-6}))));
        assert!(!config.is_included(&row(json!({"threads": 1.5, "tolerance": 0.5}))));
        assert!(!config.is_included(&row(json!({"threads": "1", "tolerance": 0.5}))));
    }

    #[test]
    fn test_metric_profile_defaults() {
        let settings = ProfileSettings::from_toml_str(
            r#"
            [profiles.score]
            metric = "quality.score"
            direction = "higher"
            success_column = "converged"
            "#,
        )
        .unwrap();

        let (name, config) = settings.into_configs().unwrap().remove(0);
        assert_eq!(name, "score");
        assert_eq!(config.criterion.name(), "score");
        assert_eq!(config.criterion.direction(), MetricDirection::HigherIsBetter);
        assert_eq!(config.instance_key_columns, vec!["problem", "size"]);
        assert_eq!(config.combo_key_columns, vec!["solver"]);
        assert!(config.is_success(&row(json!({"converged": true}))));
        assert!(!config.is_success(&row(json!({"success": true}))));
        assert_eq!(
            config
                .criterion
                .value_of(&row(json!({"quality": {"score": 0.75}}))),
            0.75
        );
    }

    #[test]
    fn test_invalid_specs_rejected() {
        let cases = [
            "[profiles.a]\n",
            "[profiles.a]\ncriterion = \"wall_time\"\nmetric = \"time.wall\"\n",
            "[profiles.a]\ncriterion = \"memory\"\n",
            "[profiles.a]\ncriterion = \"wall_time\"\naggregate = \"sum\"\n",
            "[profiles.a]\ncriterion = \"wall_time\"\ndirection = \"higher\"\n",
            "[profiles.a]\ncriterion = \"wall_time\"\ncombo_keys = []\n",
        ];
        for case in cases {
            let settings = ProfileSettings::from_toml_str(case).unwrap();
            let err = settings.into_configs().unwrap_err();
            assert!(
                matches!(err, ProfileError::Config { .. }),
                "case {:?} gave {:?}",
                case,
                err
            );
        }
    }

    #[test]
    fn test_unknown_field_is_toml_error() {
        let err = ProfileSettings::from_toml_str("[profiles.a]\ncritrion = \"wall_time\"\n")
            .unwrap_err();
        assert!(matches!(err, ProfileError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[profiles.iters]\ncriterion = \"iterations\"").unwrap();

        let settings = ProfileSettings::load(file.path()).unwrap();
        assert!(settings.profiles.contains_key("iters"));
    }
}

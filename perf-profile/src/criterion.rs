//! Comparison criteria
//!
//! A criterion names the scalar a profile compares (wall time, iteration
//! count, ...), knows how to read it from a run record, and knows which
//! direction is better.
//!
//! | Built-in | Metric path | Direction |
//! |---|---|---|
//! | `wall_time` | `time.wall` | Lower is better |
//! | `cpu_time` | `time.cpu` | Lower is better |
//! | `iterations` | `iterations.total` | Lower is better |
//! | `evaluations` | `evaluations.total` | Lower is better |

use crate::table::RunRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Direction of a metric (whether higher or lower is better).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricDirection {
    /// Lower values are better (time, iterations).
    #[serde(rename = "lower", alias = "lower_is_better")]
    LowerIsBetter,
    /// Higher values are better (throughput, score).
    #[serde(rename = "higher", alias = "higher_is_better")]
    HigherIsBetter,
}

impl MetricDirection {
    /// Whether `a` is strictly better than `b`. NaN is never better.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Self::LowerIsBetter => a < b,
            Self::HigherIsBetter => a > b,
        }
    }
}

impl std::fmt::Display for MetricDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LowerIsBetter => write!(f, "lower is better"),
            Self::HigherIsBetter => write!(f, "higher is better"),
        }
    }
}

/// Extraction rule from a run record to a scalar; must be total.
pub type Extractor = Arc<dyn Fn(&RunRecord) -> f64 + Send + Sync>;

const BUILTINS: &[(&str, &str)] = &[
    ("wall_time", "time.wall"),
    ("cpu_time", "time.cpu"),
    ("iterations", "iterations.total"),
    ("evaluations", "evaluations.total"),
];

/// Named scalar-extraction rule plus its preference direction
#[derive(Clone)]
pub struct Criterion {
    name: String,
    direction: MetricDirection,
    extractor: Extractor,
}

impl Criterion {
    /// Create a criterion from an arbitrary extraction closure
    pub fn new<F>(name: impl Into<String>, direction: MetricDirection, extract: F) -> Self
    where
        F: Fn(&RunRecord) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            direction,
            extractor: Arc::new(extract),
        }
    }

    /// Criterion reading a (possibly nested) numeric field such as `time.wall`
    pub fn from_path(
        name: impl Into<String>,
        path: impl Into<String>,
        direction: MetricDirection,
    ) -> Self {
        let path = path.into();
        Self::new(name, direction, move |row| row.number_at(&path))
    }

    /// Look up a built-in criterion by name
    pub fn builtin(name: &str) -> Option<Self> {
        BUILTINS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(n, path)| Self::from_path(*n, *path, MetricDirection::LowerIsBetter))
    }

    /// Names of the built-in criteria
    pub fn builtin_names() -> Vec<&'static str> {
        BUILTINS.iter().map(|(n, _)| *n).collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> MetricDirection {
        self.direction
    }

    /// Metric value of a row; NaN for unavailable data
    pub fn value_of(&self, row: &RunRecord) -> f64 {
        (self.extractor)(row)
    }

    /// Whether `a` is strictly better than `b` under this criterion
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        self.direction.is_better(a, b)
    }
}

impl std::fmt::Debug for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Criterion")
            .field("name", &self.name)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

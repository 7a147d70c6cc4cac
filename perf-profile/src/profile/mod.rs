//! Performance profiles
//!
//! Provides the profile builder pipeline and the immutable
//! [`PerformanceProfile`] value it produces.
//!
//! # Architecture
//!
//! ```text
//! RunTable → validate → filter → extract → aggregate → ratios → metadata
//!                                                          ↓
//!                                               PerformanceProfile
//!                                                          ↓
//!                                          ┌───────────────┴───────────────┐
//!                                          ↓                               ↓
//!                                     ProfileStats                   ProfileCurves
//! ```

pub mod builder;
pub mod ratio;

pub use builder::build;

use crate::config::ProfileConfig;
use crate::table::KeyTuple;
use serde::Serialize;
use std::collections::BTreeSet;

/// One aggregated row per surviving (instance, combo) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub instance: KeyTuple,
    pub combo: KeyTuple,
    pub metric: f64,
}

/// Aggregated row extended with the instance's best metric and the ratio
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioRow {
    pub instance: KeyTuple,
    pub combo: KeyTuple,
    pub metric: f64,
    /// NaN when no combo produced a finite metric on this instance
    pub best_metric: f64,
    /// NaN for total failure, Inf for a non-zero metric against a zero best
    pub ratio: f64,
}

impl RatioRow {
    /// Whether this combo solved the instance within some finite factor
    pub fn solved(&self) -> bool {
        self.ratio.is_finite()
    }
}

/// Immutable result of building a profile from one table snapshot
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceProfile {
    bench_id: String,
    instances: BTreeSet<KeyTuple>,
    ratios: Vec<RatioRow>,
    combos: Vec<String>,
    total_instances: usize,
    min_ratio: f64,
    max_ratio: f64,
    total_runs: usize,
    successful_runs: usize,
    #[serde(skip)]
    config: ProfileConfig,
}

impl PerformanceProfile {
    pub fn bench_id(&self) -> &str {
        &self.bench_id
    }

    /// Every distinct instance of the unfiltered table
    pub fn instances(&self) -> &BTreeSet<KeyTuple> {
        &self.instances
    }

    pub fn ratios(&self) -> &[RatioRow] {
        &self.ratios
    }

    /// Sorted distinct combo labels present in the ratio table
    pub fn combos(&self) -> &[String] {
        &self.combos
    }

    /// Denominator for robustness and curve fractions
    pub fn total_instances(&self) -> usize {
        self.total_instances
    }

    pub fn min_ratio(&self) -> f64 {
        self.min_ratio
    }

    pub fn max_ratio(&self) -> f64 {
        self.max_ratio
    }

    /// Rows in the unfiltered table
    pub fn total_runs(&self) -> usize {
        self.total_runs
    }

    /// Rows in the unfiltered table that satisfied the success predicate
    pub fn successful_runs(&self) -> usize {
        self.successful_runs
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// Ratio rows of one combo
    pub fn rows_for_combo<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a RatioRow> {
        self.ratios
            .iter()
            .filter(move |r| r.combo.label() == label)
    }

    /// Finite ratios of one combo, in table order
    pub fn ratios_for_combo(&self, label: &str) -> Vec<f64> {
        self.rows_for_combo(label)
            .map(|r| r.ratio)
            .filter(|r| r.is_finite())
            .collect()
    }

    /// Best metric recorded for `instance`, `None` if absent or total failure
    pub fn best_metric(&self, instance: &KeyTuple) -> Option<f64> {
        self.ratios
            .iter()
            .find(|r| &r.instance == instance)
            .map(|r| r.best_metric)
            .filter(|b| !b.is_nan())
    }

    /// Instances on which no combo has a finite ratio, including instances
    /// whose runs were all filtered out
    pub fn unsolved_instances(&self) -> Vec<&KeyTuple> {
        let solved: BTreeSet<&KeyTuple> = self
            .ratios
            .iter()
            .filter(|r| r.solved())
            .map(|r| &r.instance)
            .collect();
        self.instances
            .iter()
            .filter(|i| !solved.contains(i))
            .collect()
    }

    /// Distinct values of the first instance key column
    pub fn problem_count(&self) -> usize {
        self.instances
            .iter()
            .filter_map(KeyTuple::head)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

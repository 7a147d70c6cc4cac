//! Profile statistics
//!
//! Robustness and efficiency per combo:
//!
//! | Statistic | Numerator | Denominator |
//! |---|---|---|
//! | Robustness | instances with a finite ratio | all instances |
//! | Efficiency | instances with ratio exactly 1.0 | all instances |
//!
//! Ties at 1.0 are not split: every tied combo gets full credit.

pub mod report;

pub use report::{Leader, ProfileReport};

use crate::profile::PerformanceProfile;
use crate::table::KeyTuple;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Summary of one combo, percentages in `[0, 100]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboPerformance {
    pub combo: String,
    pub robustness: f64,
    pub efficiency: f64,
}

/// Statistics for every combo of a profile, in combo order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub performances: Vec<ComboPerformance>,
}

impl ProfileStats {
    pub fn get(&self, combo: &str) -> Option<&ComboPerformance> {
        self.performances.iter().find(|p| p.combo == combo)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Compute robustness and efficiency for each combo of `profile`
pub fn compute_stats(profile: &PerformanceProfile) -> ProfileStats {
    let total = profile.total_instances();
    let percent = |count: usize| {
        if total > 0 {
            count as f64 / total as f64 * 100.0
        } else {
            0.0
        }
    };

    let performances = profile
        .combos()
        .iter()
        .map(|combo| {
            let solved: BTreeSet<&KeyTuple> = profile
                .rows_for_combo(combo)
                .filter(|r| r.ratio.is_finite())
                .map(|r| &r.instance)
                .collect();
            let best: BTreeSet<&KeyTuple> = profile
                .rows_for_combo(combo)
                .filter(|r| r.ratio == 1.0)
                .map(|r| &r.instance)
                .collect();

            ComboPerformance {
                combo: combo.clone(),
                robustness: percent(solved.len()),
                efficiency: percent(best.len()),
            }
        })
        .collect();

    ProfileStats { performances }
}

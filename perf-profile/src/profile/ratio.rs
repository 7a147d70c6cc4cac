//! Performance ratios
//!
//! Per instance, the best metric is the best usable value over all combos
//! (minimum when lower is better, maximum when higher is better). Each
//! combo's ratio expresses how far it is from that best, always >= 1.0.
//! Metrics are quantities such as time or counts, so a negative value is
//! unusable and counts as a failure just like NaN.

use super::{MetricRow, RatioRow};
use crate::criterion::{Criterion, MetricDirection};
use std::collections::BTreeMap;

fn is_usable(metric: f64) -> bool {
    metric.is_finite() && metric >= 0.0
}

/// Best usable metric in `metrics`, `None` when nothing is usable
pub fn best_metric(
    metrics: impl IntoIterator<Item = f64>,
    criterion: &Criterion,
) -> Option<f64> {
    metrics
        .into_iter()
        .filter(|m| is_usable(*m))
        .reduce(|best, m| if criterion.is_better(m, best) { m } else { best })
}

/// Ratio of `metric` against the instance's best.
///
/// - no usable best (total failure): NaN
/// - best of exactly zero: 1.0 for zero metrics, Inf for everything else
/// - negative metric: NaN
/// - otherwise `metric / best` (lower) or `best / metric` (higher)
pub fn performance_ratio(metric: f64, best: Option<f64>, direction: MetricDirection) -> f64 {
    let Some(best) = best.filter(|b| is_usable(*b)) else {
        return f64::NAN;
    };
    if best == 0.0 {
        return if metric == 0.0 { 1.0 } else { f64::INFINITY };
    }
    if metric < 0.0 {
        return f64::NAN;
    }
    match direction {
        MetricDirection::LowerIsBetter => metric / best,
        MetricDirection::HigherIsBetter if metric == 0.0 => f64::INFINITY,
        MetricDirection::HigherIsBetter => best / metric,
    }
}

/// Attach `best_metric` and `ratio` to every aggregated row.
///
/// Rows are grouped by instance first so each best sees every combo.
pub fn compute_ratios(rows: Vec<MetricRow>, criterion: &Criterion) -> Vec<RatioRow> {
    let direction = criterion.direction();
    let mut by_instance: BTreeMap<_, Vec<MetricRow>> = BTreeMap::new();
    for row in rows {
        by_instance.entry(row.instance.clone()).or_default().push(row);
    }

    by_instance
        .into_values()
        .flat_map(|group| {
            let best = best_metric(group.iter().map(|r| r.metric), criterion);
            group.into_iter().map(move |row| RatioRow {
                ratio: performance_ratio(row.metric, best, direction),
                best_metric: best.unwrap_or(f64::NAN),
                instance: row.instance,
                combo: row.combo,
                metric: row.metric,
            })
        })
        .collect()
}

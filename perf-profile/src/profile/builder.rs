//! Profile builder pipeline
//!
//! Pure transformation of a run table into a [`PerformanceProfile`]. The
//! source table is never mutated; every stage produces a new value.

use super::ratio::compute_ratios;
use super::{MetricRow, PerformanceProfile, RatioRow};
use crate::config::ProfileConfig;
use crate::error::ProfileResult;
use crate::table::{KeyTuple, RunRecord, RunTable};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Surviving run with its extracted metric
#[derive(Debug, Clone)]
struct ExtractedRun {
    instance: KeyTuple,
    combo: KeyTuple,
    metric: f64,
}

/// Build a profile for `bench_id` from `table`.
///
/// Returns `Ok(None)` when there is nothing to profile: an empty table or
/// no run surviving the filters. Missing key columns are a schema error.
/// `allowed_combos` restricts the profile to those combo labels.
pub fn build(
    table: &RunTable,
    bench_id: &str,
    config: &ProfileConfig,
    allowed_combos: Option<&[String]>,
) -> ProfileResult<Option<PerformanceProfile>> {
    if table.is_empty() {
        warn!(bench = %bench_id, "No runs recorded, skipping profile");
        return Ok(None);
    }

    config.validate(table)?;

    let instances: BTreeSet<KeyTuple> = table
        .iter()
        .filter_map(|row| row.key_tuple(&config.instance_key_columns))
        .collect();
    let successful_runs = table.iter().filter(|row| config.is_success(row)).count();

    let survivors = filter_runs(table, config, allowed_combos);
    if survivors.is_empty() {
        warn!(
            bench = %bench_id,
            runs = table.len(),
            "No successful runs left after filtering, skipping profile"
        );
        return Ok(None);
    }

    let extracted = extract_metrics(&survivors, config);
    let aggregated = aggregate_metrics(extracted, config);
    debug!(
        bench = %bench_id,
        survivors = survivors.len(),
        groups = aggregated.len(),
        "Aggregated repeated runs"
    );

    let ratios = compute_ratios(aggregated, &config.criterion);
    let profile = assemble(bench_id, instances, ratios, table.len(), successful_runs, config);
    debug!(
        bench = %bench_id,
        combos = profile.combos.len(),
        instances = profile.total_instances,
        min_ratio = profile.min_ratio,
        max_ratio = profile.max_ratio,
        "Built performance profile"
    );
    Ok(Some(profile))
}

/// Keep successful, included runs (and allowed combos), with their keys
fn filter_runs<'a>(
    table: &'a RunTable,
    config: &ProfileConfig,
    allowed_combos: Option<&[String]>,
) -> Vec<(KeyTuple, KeyTuple, &'a RunRecord)> {
    let allowed: Option<BTreeSet<&str>> =
        allowed_combos.map(|labels| labels.iter().map(String::as_str).collect());

    let mut missing_keys = 0usize;
    let survivors: Vec<_> = table
        .iter()
        .filter(|row| config.is_success(row) && config.is_included(row))
        .filter_map(|row| {
            let instance = row.key_tuple(&config.instance_key_columns);
            let combo = row.key_tuple(&config.combo_key_columns);
            match (instance, combo) {
                (Some(instance), Some(combo)) => Some((instance, combo, row)),
                _ => {
                    missing_keys += 1;
                    None
                }
            }
        })
        .filter(|(_, combo, _)| {
            allowed
                .as_ref()
                .map_or(true, |allowed| allowed.contains(combo.label().as_str()))
        })
        .collect();

    if missing_keys > 0 {
        debug!(missing_keys, "Skipped runs with null key values");
    }
    survivors
}

/// Augmented copy of the survivors carrying the criterion value
fn extract_metrics(
    survivors: &[(KeyTuple, KeyTuple, &RunRecord)],
    config: &ProfileConfig,
) -> Vec<ExtractedRun> {
    survivors
        .iter()
        .map(|(instance, combo, row)| ExtractedRun {
            instance: instance.clone(),
            combo: combo.clone(),
            metric: config.criterion.value_of(row),
        })
        .collect()
}

/// One row per (instance, combo), reduced with the configured aggregate
fn aggregate_metrics(runs: Vec<ExtractedRun>, config: &ProfileConfig) -> Vec<MetricRow> {
    let mut groups: BTreeMap<(KeyTuple, KeyTuple), Vec<f64>> = BTreeMap::new();
    for run in runs {
        groups
            .entry((run.instance, run.combo))
            .or_default()
            .push(run.metric);
    }

    groups
        .into_iter()
        .map(|((instance, combo), values)| MetricRow {
            instance,
            combo,
            metric: (config.aggregate)(&values),
        })
        .collect()
}

fn assemble(
    bench_id: &str,
    instances: BTreeSet<KeyTuple>,
    ratios: Vec<RatioRow>,
    total_runs: usize,
    successful_runs: usize,
    config: &ProfileConfig,
) -> PerformanceProfile {
    let combos: Vec<String> = ratios
        .iter()
        .map(|r| r.combo.label())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let finite = || ratios.iter().map(|r| r.ratio).filter(|r| r.is_finite());
    let min_ratio = finite().reduce(f64::min).unwrap_or(1.0);
    let max_ratio = finite().reduce(f64::max).unwrap_or(1.0);

    PerformanceProfile {
        bench_id: bench_id.to_string(),
        total_instances: instances.len(),
        instances,
        combos,
        min_ratio,
        max_ratio,
        total_runs,
        successful_runs,
        config: config.clone(),
        ratios,
    }
}

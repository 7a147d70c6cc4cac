//! Textual profile report

use super::{compute_stats, ComboPerformance, ProfileStats};
use crate::profile::PerformanceProfile;
use serde::Serialize;

/// Combo(s) holding the best value of a statistic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leader {
    pub combos: Vec<String>,
    pub value: f64,
}

impl Leader {
    fn best_of(
        performances: &[ComboPerformance],
        value: impl Fn(&ComboPerformance) -> f64,
    ) -> Self {
        let best = performances
            .iter()
            .map(&value)
            .reduce(f64::max)
            .unwrap_or(0.0);
        let combos = performances
            .iter()
            .filter(|p| value(p) == best)
            .map(|p| p.combo.clone())
            .collect();
        Self {
            combos,
            value: best,
        }
    }

    pub fn is_tie(&self) -> bool {
        self.combos.len() > 1
    }
}

impl std::fmt::Display for Leader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.combos.as_slice() {
            [] => write!(f, "none"),
            [only] => write!(f, "{} ({:.1}%)", only, self.value),
            many => write!(
                f,
                "{} combinations tied ({:.1}%): {}",
                many.len(),
                self.value,
                many.join(", ")
            ),
        }
    }
}

/// Everything the reporting collaborator renders for one profile
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub bench_id: String,
    pub criterion: String,
    pub instance_count: usize,
    pub problem_count: usize,
    pub total_runs: usize,
    pub successful_runs: usize,
    /// Successful runs over all runs (%)
    pub run_success_rate: f64,
    pub unsolved_instances: Vec<String>,
    pub stats: ProfileStats,
    pub most_robust: Leader,
    pub most_efficient: Leader,
}

impl ProfileReport {
    /// Collect statistics and counts for `profile`
    pub fn from_profile(profile: &PerformanceProfile) -> Self {
        let stats = compute_stats(profile);
        let most_robust = Leader::best_of(&stats.performances, |p| p.robustness);
        let most_efficient = Leader::best_of(&stats.performances, |p| p.efficiency);

        let run_success_rate = if profile.total_runs() > 0 {
            profile.successful_runs() as f64 / profile.total_runs() as f64 * 100.0
        } else {
            0.0
        };

        Self {
            bench_id: profile.bench_id().to_string(),
            criterion: profile.config().criterion.name().to_string(),
            instance_count: profile.total_instances(),
            problem_count: profile.problem_count(),
            total_runs: profile.total_runs(),
            successful_runs: profile.successful_runs(),
            run_success_rate,
            unsolved_instances: profile
                .unsolved_instances()
                .into_iter()
                .map(|i| i.to_string())
                .collect(),
            stats,
            most_robust,
            most_efficient,
        }
    }

    /// Format as a markdown report
    pub fn format_report(&self) -> String {
        let mut report = String::new();

        report.push_str(&format!(
            "# Performance Profile: {} ({})\n\n",
            self.bench_id, self.criterion
        ));

        report.push_str("## Summary\n\n");
        report.push_str(&format!(
            "| Metric | Value |\n\
             |--------|-------|\n\
             | Instances | {} |\n\
             | Problems | {} |\n\
             | Runs | {} |\n\
             | Successful Runs | {} ({:.1}%) |\n\n",
            self.instance_count,
            self.problem_count,
            self.total_runs,
            self.successful_runs,
            self.run_success_rate
        ));

        report.push_str("## Combinations\n\n");
        report.push_str("| Combination | Robustness | Efficiency |\n");
        report.push_str("|-------------|------------|------------|\n");
        for p in &self.stats.performances {
            report.push_str(&format!(
                "| {} | {:.1}% | {:.1}% |\n",
                p.combo, p.robustness, p.efficiency
            ));
        }
        report.push('\n');

        report.push_str("## Unsolved Instances\n\n");
        if self.unsolved_instances.is_empty() {
            report.push_str("Every instance was solved by at least one combination.\n\n");
        } else {
            report.push_str(&format!(
                "{} instance(s) without any successful combination:\n\n",
                self.unsolved_instances.len()
            ));
            for instance in &self.unsolved_instances {
                report.push_str(&format!("- {}\n", instance));
            }
            report.push('\n');
        }

        report.push_str("## Leaders\n\n");
        report.push_str(&format!("- Most robust: {}\n", self.most_robust));
        report.push_str(&format!("- Most efficient: {}\n", self.most_efficient));

        report
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

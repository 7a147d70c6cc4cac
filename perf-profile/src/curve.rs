//! Curve generation
//!
//! Turns a profile's ratio table into one empirical step function per
//! combo: `y(x)` is the fraction of all instances the combo solves within
//! a factor `x` of the best combo.
//!
//! `y` is deliberately not clamped to `[0, 1]`. If a combo contributes more
//! ratio entries than there are instances (grouping keys finer than the
//! instance keys), `y` exceeds 1.

use crate::profile::PerformanceProfile;
use serde::Serialize;

/// Parallel x/y points of one step function
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl StepCurve {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Step function value at `tau`: the last `y` whose `x <= tau`
    pub fn fraction_within(&self, tau: f64) -> f64 {
        let steps = self.x.partition_point(|&x| x <= tau);
        if steps == 0 {
            0.0
        } else {
            self.y[steps - 1]
        }
    }
}

/// Step-function points for one combo's ratios.
///
/// NaN ratios must be removed by the caller. Duplicates are kept; for each
/// sorted ratio `r_i`, `y_i` counts every entry `<= r_i`.
pub fn curve_points(ratios: &[f64], total_instances: usize) -> StepCurve {
    if total_instances == 0 {
        return StepCurve::default();
    }

    let mut x = ratios.to_vec();
    x.sort_by(f64::total_cmp);

    let n = total_instances as f64;
    let y = x
        .iter()
        .map(|r| x.partition_point(|v| v <= r) as f64 / n)
        .collect();
    StepCurve { x, y }
}

/// Curve of one combo
#[derive(Debug, Clone, Serialize)]
pub struct ComboCurve {
    pub combo: String,
    #[serde(flatten)]
    pub curve: StepCurve,
}

/// Everything the plotting collaborator needs for one profile
#[derive(Debug, Clone, Serialize)]
pub struct ProfileCurves {
    pub bench_id: String,
    pub criterion: String,
    pub total_instances: usize,
    /// Shared bounds of the log-scaled x axis
    pub x_min: f64,
    pub x_max: f64,
    pub curves: Vec<ComboCurve>,
}

impl ProfileCurves {
    /// One curve per combo, in the profile's combo order.
    /// Only finite ratios enter the curves.
    pub fn from_profile(profile: &PerformanceProfile) -> Self {
        let curves = profile
            .combos()
            .iter()
            .map(|combo| ComboCurve {
                combo: combo.clone(),
                curve: curve_points(
                    &profile.ratios_for_combo(combo),
                    profile.total_instances(),
                ),
            })
            .collect();

        Self {
            bench_id: profile.bench_id().to_string(),
            criterion: profile.config().criterion.name().to_string(),
            total_instances: profile.total_instances(),
            x_min: profile.min_ratio(),
            x_max: profile.max_ratio(),
            curves,
        }
    }

    /// Curve for a combo label
    pub fn get(&self, combo: &str) -> Option<&StepCurve> {
        self.curves
            .iter()
            .find(|c| c.combo == combo)
            .map(|c| &c.curve)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

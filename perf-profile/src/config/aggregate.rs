//! Reducers for repeated runs of the same (instance, combo) pair.
//!
//! Every reducer skips NaN inputs and yields NaN when nothing is left.

/// Reducer over the metric values of one group
pub type Reducer = fn(&[f64]) -> f64;

fn present(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> f64 {
    let values = present(values);
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median; the mean of the two middle values for even lengths
pub fn median(values: &[f64]) -> f64 {
    let mut values = present(values);
    if values.is_empty() {
        return f64::NAN;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Smallest value
pub fn min(values: &[f64]) -> f64 {
    present(values)
        .into_iter()
        .reduce(f64::min)
        .unwrap_or(f64::NAN)
}

/// Largest value
pub fn max(values: &[f64]) -> f64 {
    present(values)
        .into_iter()
        .reduce(f64::max)
        .unwrap_or(f64::NAN)
}

/// Names accepted by [`reducer_by_name`]
pub const REDUCER_NAMES: &[&str] = &["mean", "median", "min", "max"];

/// Resolve a reducer from its settings-file name
pub fn reducer_by_name(name: &str) -> Option<Reducer> {
    match name {
        "mean" => Some(mean),
        "median" => Some(median),
        "min" => Some(min),
        "max" => Some(max),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_repetitions() {
        assert!((mean(&[1.0, 1.2]) - 1.1).abs() < 1e-12);
        assert_eq!(mean(&[2.0, f64::NAN, 4.0]), 3.0);
    }

    #[test]
    fn test_empty_and_all_missing_yield_nan() {
        for reducer in [mean, median, min, max] {
            assert!(reducer(&[]).is_nan());
            assert!(reducer(&[f64::NAN, f64::NAN]).is_nan());
        }
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_min_max_skip_nan() {
        assert_eq!(min(&[f64::NAN, 3.0, 1.0]), 1.0);
        assert_eq!(max(&[2.0, f64::NAN, 5.0]), 5.0);
        assert_eq!(max(&[1.0, f64::INFINITY]), f64::INFINITY);
    }

    #[test]
    fn test_reducer_lookup() {
        for name in REDUCER_NAMES {
            assert!(reducer_by_name(name).is_some());
        }
        assert!(reducer_by_name("sum").is_none());
    }
}

use itertools::{Itertools, MinMaxResult};

use crate::time_series::TrendPoint;

/// X (attempts) and Y (value) upper bounds for the trend chart. Y never
/// drops below 100 so accuracy and wpm share a readable scale.
pub fn compute_chart_params(wpm: &[TrendPoint], accuracy: &[TrendPoint]) -> (f64, f64) {
    let attempts = wpm.len().max(accuracy.len()).max(2) as f64;

    let highest = match wpm.iter().chain(accuracy).map(|p| p.value).minmax_by(|a, b| {
        a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
    }) {
        MinMaxResult::NoElements => 0.0,
        MinMaxResult::OneElement(v) => v,
        MinMaxResult::MinMax(_, max) => max,
    };

    (attempts, highest.max(100.0).ceil())
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

//! Normalization and convergence helpers shared by both ranking modes.

/// Rescale non-negative values in place so they sum to `target`.
///
/// A zero (or non-positive) sum leaves every value at zero instead of
/// producing NaN.
pub fn normalize_to_sum(values: &mut [f64], target: f64) {
    let sum: f64 = values.iter().sum();
    if sum > 0.0 {
        let scale = target / sum;
        for v in values.iter_mut() {
            *v *= scale;
        }
    } else {
        values.fill(0.0);
    }
}

/// Largest elementwise `|old - new|`; zero for empty input.
pub fn max_absolute_delta(old: &[f64], new: &[f64]) -> f64 {
    old.iter()
        .zip(new.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max)
}

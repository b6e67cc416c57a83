//! Cross-sectional standardization.

use ndarray::Array1;

/// Population z-score of `values`.
///
/// Mean and standard deviation are taken over the finite entries only.
/// Non-finite entries map to `0`. When fewer than two finite values exist,
/// or their standard deviation is zero, every entry maps to `0`.
pub fn zscore(values: &[f64]) -> Array1<f64> {
    let valid: Array1<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if valid.len() < 2 || valid.iter().all(|v| *v == valid[0]) {
        return Array1::zeros(values.len());
    }

    let Some(mean) = valid.mean() else {
        return Array1::zeros(values.len());
    };
    let std = valid.std(0.0);
    if !std.is_finite() || std <= f64::EPSILON * mean.abs().max(1.0) {
        return Array1::zeros(values.len());
    }

    values
        .iter()
        .map(|v| if v.is_finite() { (v - mean) / std } else { 0.0 })
        .collect()
}

//! Evaluation of fitted calibration polynomials for chart overlays.

/// Evaluate a polynomial at `x`.
///
/// `coeffs` are ordered from highest degree to degree zero, the layout
/// `numpy.polyfit` produces. An empty slice evaluates to 0.
pub fn evaluate(coeffs: &[f64], x: f64) -> f64 {
    let degree = coeffs.len().saturating_sub(1);
    coeffs
        .iter()
        .enumerate()
        .map(|(i, c)| c * x.powi((degree - i) as i32))
        .sum()
}

/// Evaluate at every sample, preserving gaps.
pub fn evaluate_at(coeffs: &[f64], xs: &[Option<f64>]) -> Vec<Option<f64>> {
    xs.iter().map(|x| x.map(|x| evaluate(coeffs, x))).collect()
}

//! Ordinary least squares slope of a log-log point series.

use crate::errors::{HurstError, HurstResult};

/// Denominators this close to zero mean every x coordinate is (nearly) equal.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Least squares slope of `points`, given as `(x, y)` pairs.
///
/// Uses the closed form
/// `slope = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)`
/// accumulated in input order, so identical inputs give identical bits.
/// The intercept is not computed.
///
/// # Errors
/// - `InsufficientData` for an empty series
/// - `NumericalError` when the design is singular (fewer than two distinct
///   x values) or the slope comes out non-finite
///
/// # Example
/// ```rust
/// use incremental_hurst::linear_fit::ols_slope;
///
/// let points = [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)];
/// assert!((ols_slope(&points).unwrap() - 2.0).abs() < 1e-12);
/// assert!(ols_slope(&[(1.0, 5.0)]).is_err());
/// ```
pub fn ols_slope(points: &[(f64, f64)]) -> HurstResult<f64> {
    if points.is_empty() {
        return Err(HurstError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }

    let n = points.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_x2, mut sum_xy) = (0.0, 0.0, 0.0, 0.0);
    for &(x, y) in points {
        sum_x += x;
        sum_y += y;
        sum_x2 += x * x;
        sum_xy += x * y;
    }

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator.abs() < SINGULAR_EPSILON {
        return Err(HurstError::NumericalError {
            reason: format!(
                "Regression undetermined: {} point(s) with no spread in x (denominator {:.3e})",
                points.len(),
                denominator
            ),
            operation: Some("ols_slope".to_string()),
        });
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    if !slope.is_finite() {
        return Err(HurstError::NumericalError {
            reason: format!("Regression produced a non-finite slope: {}", slope),
            operation: Some("ols_slope".to_string()),
        });
    }
    Ok(slope)
}

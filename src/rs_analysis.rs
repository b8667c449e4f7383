//! Rescaled range (R/S) analysis over a sample snapshot.
//!
//! The snapshot is cut into non-overlapping blocks at a geometric series of
//! block sizes `2^i · base`, where the base division size depends on how many
//! samples there are. Each block contributes `range / stddev`; the block
//! ratios are averaged per scale and the scales are regressed in log2-log2
//! space. The slope of that fit is the Hurst exponent estimate.
//!
//! ## Scale schedule
//!
//! | samples `N`      | base division size |
//! |------------------|--------------------|
//! | `N < 64`         | 2                  |
//! | `64 ≤ N < 128`   | 4                  |
//! | `128 ≤ N < 256`  | 6                  |
//! | `N ≥ 256`        | 8                  |
//!
//! Scales continue while `2^i · base ≤ N`.
//!
//! ## Boundary handling
//!
//! Under [`BlockBoundary::Compatible`] the end of every block is clamped to
//! `N - 1`, so the block that would end exactly at `N` loses its final sample.
//! [`BlockBoundary::Exact`] clamps to `N` instead. Both are deterministic; the
//! compatible policy is the default because it reproduces established
//! estimates.

use crate::{
    block_statistics::BlockRange,
    config::BlockBoundary,
    errors::{validate_all_finite, validate_data_length, HurstError, HurstResult},
    linear_fit::ols_slope,
};

/// Fewest samples that can produce an estimate.
pub const MIN_ANALYSIS_LENGTH: usize = 16;

/// One scale of the analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalePoint {
    /// Block width at this scale
    pub block_size: usize,
    /// Number of non-overlapping blocks, `floor(N / block_size)`
    pub block_count: usize,
    /// Mean R/S over the blocks
    pub average_rs: f64,
    /// `log2(block_size)`, the regression x coordinate
    pub log_size: f64,
    /// `log2(average_rs)`, the regression y coordinate
    pub log_rs: f64,
}

/// Full result of one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct RsAnalysis {
    /// Number of samples analysed
    pub sample_count: usize,
    /// Smallest block size of the schedule
    pub base_division_size: usize,
    /// Scales in increasing block size
    pub points: Vec<ScalePoint>,
    /// Regression slope
    pub hurst: f64,
}

impl RsAnalysis {
    /// Number of scales that entered the regression
    pub fn layer_count(&self) -> usize {
        self.points.len()
    }

    /// `(log2 size, log2 R/S)` pairs in scale order
    pub fn log_points(&self) -> Vec<(f64, f64)> {
        log_coordinates(&self.points)
    }
}

fn log_coordinates(points: &[ScalePoint]) -> Vec<(f64, f64)> {
    points.iter().map(|p| (p.log_size, p.log_rs)).collect()
}

/// Base division size for `n` samples.
pub fn base_division_size(n: usize) -> usize {
    if n < 64 {
        2
    } else if n < 128 {
        4
    } else if n < 256 {
        6
    } else {
        8
    }
}

/// Block sizes `2^i · base` not exceeding `n`, smallest first.
pub fn block_sizes(n: usize, base: usize) -> Vec<usize> {
    (0..usize::BITS)
        .map_while(|i| 1usize.checked_shl(i).and_then(|p| p.checked_mul(base)))
        .take_while(|&size| size <= n)
        .collect()
}

/// Average R/S of `samples` at one block size.
pub fn scale_point(
    samples: &[f64],
    block_size: usize,
    boundary: BlockBoundary,
) -> HurstResult<ScalePoint> {
    let n = samples.len();
    let block_count = n / block_size;

    let mut rs_sum = 0.0;
    for j in 0..block_count {
        let start = j * block_size;
        let end = boundary.block_end(j, block_size, n);
        let stats = BlockRange::new(samples, start, end)?.statistics();
        let rs = stats.rescaled_range();
        log::trace!(
            "block {} of size {}: [{}, {}) mean={} stddev={} range={} rs={}",
            j,
            block_size,
            start,
            end,
            stats.mean,
            stats.stddev,
            stats.range,
            rs
        );
        rs_sum += rs;
    }

    let average_rs = rs_sum / block_count.max(1) as f64;
    if !(average_rs > 0.0 && average_rs.is_finite()) {
        return Err(HurstError::NumericalError {
            reason: format!(
                "Average R/S at block size {} is {}; series has no variation at this scale",
                block_size, average_rs
            ),
            operation: Some("scale_point".to_string()),
        });
    }

    let point = ScalePoint {
        block_size,
        block_count,
        average_rs,
        log_size: (block_size as f64).log2(),
        log_rs: average_rs.log2(),
    };
    log::trace!(
        "scale {}: log2rs={} log2size={}",
        block_size,
        point.log_rs,
        point.log_size
    );
    Ok(point)
}

/// Run the full R/S pipeline on `samples`.
///
/// # Errors
/// - `InsufficientData` below [`MIN_ANALYSIS_LENGTH`] samples or with no scale
/// - `NonFiniteInput` if a sample is NaN or infinite
/// - `NumericalError` for a zero R/S average or a singular regression
pub fn analyze(samples: &[f64], boundary: BlockBoundary) -> HurstResult<RsAnalysis> {
    validate_data_length(samples, MIN_ANALYSIS_LENGTH)?;
    validate_all_finite(samples)?;

    let n = samples.len();
    let base = base_division_size(n);
    let sizes = block_sizes(n, base);
    if sizes.is_empty() {
        return Err(HurstError::InsufficientData {
            required: base,
            actual: n,
        });
    }

    let points = sizes
        .iter()
        .map(|&size| scale_point(samples, size, boundary))
        .collect::<HurstResult<Vec<_>>>()?;

    let hurst = ols_slope(&log_coordinates(&points))?;

    log::debug!(
        "R/S analysis: n={} base={} layers={} hurst={}",
        n,
        base,
        points.len(),
        hurst
    );

    Ok(RsAnalysis {
        sample_count: n,
        base_division_size: base,
        points,
        hurst,
    })
}

/// Hurst exponent of `samples` with the compatible boundary policy.
///
/// # Example
/// ```rust
/// use incremental_hurst::estimate_hurst;
///
/// let ramp: Vec<f64> = (1..=64).map(f64::from).collect();
/// let h = estimate_hurst(&ramp).unwrap();
/// assert!(h > 0.9);
///
/// assert!(estimate_hurst(&ramp[..15]).is_err());
/// ```
pub fn estimate_hurst(samples: &[f64]) -> HurstResult<f64> {
    analyze(samples, BlockBoundary::Compatible).map(|analysis| analysis.hurst)
}

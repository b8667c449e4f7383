//! Per-block statistics for rescaled range analysis.
//!
//! A block is a half-open index range `[start, end)` into a sample snapshot.
//! For each block we need its mean, its population standard deviation and the
//! range of its cumulative mean-centred sum; the ratio range / stddev is the
//! block's R/S value.

use crate::errors::{HurstError, HurstResult};

/// Standard deviation substituted for zero-variance blocks.
///
/// A constant block has range 0, so with this floor its R/S is 0 rather than
/// 0/0. The constant is part of the estimator's numerical contract and changing
/// it changes estimates on data containing flat stretches.
pub const STDDEV_FLOOR: f64 = 0.0001;

/// Mean, deviation and range of one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStatistics {
    /// Arithmetic mean of the block
    pub mean: f64,
    /// Population standard deviation, floored at [`STDDEV_FLOOR`]
    pub stddev: f64,
    /// max - min of the cumulative mean-centred sum
    pub range: f64,
}

impl BlockStatistics {
    /// R/S ratio of the block.
    #[inline]
    pub fn rescaled_range(&self) -> f64 {
        self.range / self.stddev
    }
}

/// A validated `[start, end)` view into a snapshot with its mean precomputed.
#[derive(Debug, Clone, Copy)]
pub struct BlockRange<'a> {
    samples: &'a [f64],
    start: usize,
    end: usize,
    mean: f64,
}

impl<'a> BlockRange<'a> {
    /// Create a block view. Requires `start < end <= samples.len()`.
    pub fn new(samples: &'a [f64], start: usize, end: usize) -> HurstResult<Self> {
        if start >= end || end > samples.len() {
            return Err(HurstError::NumericalError {
                reason: format!(
                    "Invalid block range [{}, {}) over {} samples",
                    start,
                    end,
                    samples.len()
                ),
                operation: Some("BlockRange::new".to_string()),
            });
        }
        let mean = block_mean(&samples[start..end]);
        Ok(Self {
            samples,
            start,
            end,
            mean,
        })
    }

    /// First index of the block
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last index of the block
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of samples in the block
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false; empty ranges are rejected on construction
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Precomputed block mean
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// The block's samples
    pub fn values(&self) -> &'a [f64] {
        &self.samples[self.start..self.end]
    }

    /// Mean, floored standard deviation and cumulative range.
    pub fn statistics(&self) -> BlockStatistics {
        let values = self.values();
        let stddev = population_stddev(values, self.mean);
        BlockStatistics {
            mean: self.mean,
            stddev: if stddev > 0.0 { stddev } else { STDDEV_FLOOR },
            range: cumulative_range(values, self.mean),
        }
    }
}

/// Arithmetic mean. Caller guarantees a non-empty block.
#[inline]
pub fn block_mean(block: &[f64]) -> f64 {
    block.iter().sum::<f64>() / block.len() as f64
}

/// Population standard deviation around `mean` (divides by n, not n - 1).
pub fn population_stddev(block: &[f64], mean: f64) -> f64 {
    let sum_sq: f64 = block
        .iter()
        .map(|&x| {
            let d = x - mean;
            d * d
        })
        .sum();
    (sum_sq * (1.0 / block.len() as f64)).sqrt()
}

/// Range of the cumulative mean-centred sum `t(i) = sum_{k<=i} (x_k - mean)`.
///
/// Min and max start at `t(start)`, so a single-sample block has range 0.
pub fn cumulative_range(block: &[f64], mean: f64) -> f64 {
    let Some(&first) = block.first() else {
        return 0.0;
    };
    let mut min = first - mean;
    let mut max = min;
    let mut t = 0.0;
    for &x in block {
        t += x - mean;
        if t > max {
            max = t;
        } else if t < min {
            min = t;
        }
    }
    max - min
}

/// Statistics for `samples[start..end]`.
pub fn block_statistics(samples: &[f64], start: usize, end: usize) -> HurstResult<BlockStatistics> {
    BlockRange::new(samples, start, end).map(|block| block.statistics())
}

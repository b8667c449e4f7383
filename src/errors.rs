//! Error types and validation functions for Hurst estimation.
//!
//! Every failure the estimator can report is a [`HurstError`]. None of them are
//! fatal: the estimator recovers at the operation boundary, reports the error on
//! its diagnostic channel and leaves the sample buffer untouched.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest capacity a sample buffer may be created with or resized to.
pub const MIN_CAPACITY: usize = 16;

/// How loudly a diagnostic should be reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Severity {
    /// Recoverable condition, typically bad input or nothing to compute yet
    Warning,
    /// Rejected configuration change
    Error,
}

/// Error types for buffer, analysis and configuration operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum HurstError {
    /// Capacity below the allowed floor.
    #[error("Bad value for max_length: {requested}. Expected a positive integer >= {minimum}")]
    InvalidCapacity {
        /// Capacity that was asked for
        requested: i64,
        /// Smallest capacity accepted
        minimum: usize,
    },

    /// Invalid or non-numeric value for a configuration parameter.
    #[error("bad value received for {parameter}: {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Rendered value that was rejected
        value: String,
        /// Valid range or constraint description
        constraint: String,
    },

    /// A batch element that is not a number.
    #[error("Received non-numeric input at index {index}: {found}")]
    NonNumericInput {
        /// Position of the offending element in the batch
        index: usize,
        /// Rendered offending element
        found: String,
    },

    /// A sample that is NaN or infinite.
    #[error("Received non-finite input at index {index}: {value}")]
    NonFiniteInput {
        /// Position of the offending element (0 for single samples)
        index: usize,
        /// The offending value
        value: f64,
    },

    /// Not enough samples to run the analysis.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required data points
        required: usize,
        /// Actual number of data points available
        actual: usize,
    },

    /// Numerical degeneracy: zero R/S average, singular regression, non-finite slope.
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for numerical failure
        reason: String,
        /// Operation that failed
        operation: Option<String>,
    },

    /// Message selector the estimator does not understand.
    #[error("Unknown message: {selector}")]
    UnknownMessage {
        /// The selector that was received
        selector: String,
    },

    /// Attempt to write an attribute that can only be read.
    #[error("Attribute {name} is read-only")]
    ReadOnlyAttribute {
        /// Attribute name
        name: String,
    },
}

impl HurstError {
    /// Severity used when this error is reported on the diagnostic channel.
    pub fn severity(&self) -> Severity {
        match self {
            HurstError::InvalidCapacity { .. }
            | HurstError::InvalidParameter { .. }
            | HurstError::UnknownMessage { .. }
            | HurstError::ReadOnlyAttribute { .. } => Severity::Error,
            HurstError::NonNumericInput { .. }
            | HurstError::NonFiniteInput { .. }
            | HurstError::InsufficientData { .. }
            | HurstError::NumericalError { .. } => Severity::Warning,
        }
    }

    /// True when the error only means "no estimate this round".
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            HurstError::InsufficientData { .. } | HurstError::NumericalError { .. }
        )
    }
}

/// Result type for Hurst estimation operations.
pub type HurstResult<T> = Result<T, HurstError>;

/// Validates that data has sufficient length for analysis.
///
/// # Example
/// ```rust
/// use incremental_hurst::errors::validate_data_length;
///
/// let data = vec![1.0, 2.0, 3.0];
/// assert!(validate_data_length(&data, 2).is_ok());
/// assert!(validate_data_length(&data, 5).is_err());
/// ```
pub fn validate_data_length(data: &[f64], min_required: usize) -> HurstResult<()> {
    if data.len() < min_required {
        Err(HurstError::InsufficientData {
            required: min_required,
            actual: data.len(),
        })
    } else {
        Ok(())
    }
}

/// Validates that a capacity is at least `floor`.
pub fn validate_capacity(requested: i64, floor: usize) -> HurstResult<usize> {
    match usize::try_from(requested) {
        Ok(capacity) if capacity >= floor => Ok(capacity),
        _ => Err(HurstError::InvalidCapacity {
            requested,
            minimum: floor,
        }),
    }
}

/// Capacity as requested by a `usize` caller; values beyond `i64::MAX` saturate.
pub(crate) fn capacity_request(capacity: usize) -> i64 {
    i64::try_from(capacity).unwrap_or(i64::MAX)
}

/// Validates that a single sample is finite and not NaN.
///
/// # Example
/// ```rust
/// use incremental_hurst::errors::validate_finite;
///
/// assert!(validate_finite(1.0).is_ok());
/// assert!(validate_finite(f64::NAN).is_err());
/// assert!(validate_finite(f64::INFINITY).is_err());
/// ```
pub fn validate_finite(value: f64) -> HurstResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(HurstError::NonFiniteInput { index: 0, value })
    }
}

/// Validates that all samples in a slice are finite.
///
/// Returns on the first non-finite value with its index.
pub fn validate_all_finite(data: &[f64]) -> HurstResult<()> {
    match data.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(HurstError::NonFiniteInput {
            index,
            value: data[index],
        }),
        None => Ok(()),
    }
}

//! # Estimator Configuration
//!
//! Settings an estimator is created with: initial buffer capacity, whether
//! every pushed sample triggers a calculation, whether short-buffer warnings are
//! reported, and how the last block of each scale is bounded.

use crate::atoms::Atom;
use crate::errors::{capacity_request, validate_capacity, HurstError, HurstResult, MIN_CAPACITY};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default buffer capacity.
pub const DEFAULT_MAX_LENGTH: usize = 256;

/// Upper bound on the last block of every scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BlockBoundary {
    /// Clamp the block end to `N - 1`, dropping the final sample from the
    /// block that would otherwise end exactly at `N`. Matches estimates
    /// produced by existing deployments.
    #[default]
    Compatible,
    /// Clamp the block end to `N`.
    Exact,
}

impl BlockBoundary {
    /// Exclusive end index of block `j` of width `block_size` over `n` samples.
    #[inline]
    pub fn block_end(self, j: usize, block_size: usize, n: usize) -> usize {
        let end = (j + 1) * block_size;
        match self {
            BlockBoundary::Compatible => {
                if end < n {
                    end
                } else {
                    n - 1
                }
            }
            BlockBoundary::Exact => end.min(n),
        }
    }
}

/// Configuration for a [`HurstEstimator`](crate::estimator::HurstEstimator).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EstimatorConfig {
    /// Initial buffer capacity (at least 16)
    pub max_length: usize,
    /// Run a calculation after every single-sample push
    pub calc_on_input: bool,
    /// Report a warning when there are too few samples to calculate
    pub size_warning: bool,
    /// Last-block boundary policy
    pub boundary: BlockBoundary,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self::compatible()
    }
}

impl EstimatorConfig {
    /// Default settings with the compatible boundary policy.
    pub fn compatible() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            calc_on_input: true,
            size_warning: true,
            boundary: BlockBoundary::Compatible,
        }
    }

    /// Uses every sample of the final block at each scale.
    pub fn exact() -> Self {
        Self {
            boundary: BlockBoundary::Exact,
            ..Self::compatible()
        }
    }

    /// Set the initial capacity
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set the calc-on-input flag
    pub fn with_calc_on_input(mut self, enabled: bool) -> Self {
        self.calc_on_input = enabled;
        self
    }

    /// Set the size-warning flag
    pub fn with_size_warning(mut self, enabled: bool) -> Self {
        self.size_warning = enabled;
        self
    }

    /// Set the block boundary policy
    pub fn with_boundary(mut self, boundary: BlockBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Check the capacity floor.
    pub fn validate(&self) -> HurstResult<()> {
        validate_capacity(capacity_request(self.max_length), MIN_CAPACITY).map(|_| ())
    }

    /// Build a configuration from creation arguments.
    ///
    /// Arguments come in `@name value` pairs, e.g. `@max_length 512 @calc_on_input 0`.
    /// Flag values are clamped to 0/1 and floats truncated, as for runtime
    /// attribute changes.
    pub fn from_args(args: &[Atom]) -> HurstResult<Self> {
        let mut config = Self::default();
        let mut iter = args.iter();
        while let Some(atom) = iter.next() {
            let name = match atom {
                Atom::Symbol(s) if s.starts_with('@') => &s[1..],
                other => {
                    return Err(HurstError::InvalidParameter {
                        parameter: "arguments".to_string(),
                        value: other.to_string(),
                        constraint: "@attribute value pairs".to_string(),
                    })
                }
            };
            let value = iter.next().ok_or_else(|| HurstError::InvalidParameter {
                parameter: name.to_string(),
                value: "<missing>".to_string(),
                constraint: "a numeric value".to_string(),
            })?;
            match name {
                "max_length" => {
                    let requested = numeric_arg(name, value)?;
                    config.max_length = validate_capacity(requested, MIN_CAPACITY)?;
                }
                "calc_on_input" => config.calc_on_input = flag_arg(name, value)?,
                "size_warning" => config.size_warning = flag_arg(name, value)?,
                "boundary" => {
                    config.boundary = match value {
                        Atom::Symbol(s) if s == "compatible" => BlockBoundary::Compatible,
                        Atom::Symbol(s) if s == "exact" => BlockBoundary::Exact,
                        other => {
                            return Err(HurstError::InvalidParameter {
                                parameter: name.to_string(),
                                value: other.to_string(),
                                constraint: "compatible or exact".to_string(),
                            })
                        }
                    }
                }
                _ => {
                    return Err(HurstError::InvalidParameter {
                        parameter: name.to_string(),
                        value: value.to_string(),
                        constraint: "a known attribute".to_string(),
                    })
                }
            }
        }
        Ok(config)
    }
}

/// Integer argument, floats truncated toward zero.
pub(crate) fn numeric_arg(name: &str, value: &Atom) -> HurstResult<i64> {
    value.as_i64().ok_or_else(|| HurstError::InvalidParameter {
        parameter: name.to_string(),
        value: value.to_string(),
        constraint: "a number".to_string(),
    })
}

/// Boolean-like argument clamped to {0, 1}.
pub(crate) fn flag_arg(name: &str, value: &Atom) -> HurstResult<bool> {
    numeric_arg(name, value).map(|v| v.clamp(0, 1) == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EstimatorConfig::default();
        assert_eq!(config.max_length, 256);
        assert!(config.calc_on_input);
        assert!(config.size_warning);
        assert_eq!(config.boundary, BlockBoundary::Compatible);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_block_end_policies() {
        // Interior blocks are unaffected
        assert_eq!(BlockBoundary::Compatible.block_end(0, 4, 16), 4);
        assert_eq!(BlockBoundary::Exact.block_end(0, 4, 16), 4);
        // The block reaching the end loses its last sample only when compatible
        assert_eq!(BlockBoundary::Compatible.block_end(3, 4, 16), 15);
        assert_eq!(BlockBoundary::Exact.block_end(3, 4, 16), 16);
    }

    #[test]
    fn test_from_args() {
        let args = vec![
            Atom::from("@max_length"),
            Atom::Int(512),
            Atom::from("@calc_on_input"),
            Atom::Int(0),
            Atom::from("@size_warning"),
            Atom::Float(7.0),
            Atom::from("@boundary"),
            Atom::from("exact"),
        ];
        let config = EstimatorConfig::from_args(&args).unwrap();
        assert_eq!(config.max_length, 512);
        assert!(!config.calc_on_input);
        assert!(config.size_warning);
        assert_eq!(config.boundary, BlockBoundary::Exact);
    }

    #[test]
    fn test_from_args_rejections() {
        let too_small = vec![Atom::from("@max_length"), Atom::Int(8)];
        assert!(matches!(
            EstimatorConfig::from_args(&too_small),
            Err(HurstError::InvalidCapacity { requested: 8, .. })
        ));

        let missing = vec![Atom::from("@size_warning")];
        assert!(EstimatorConfig::from_args(&missing).is_err());

        let unknown = vec![Atom::from("@threads"), Atom::Int(4)];
        assert!(EstimatorConfig::from_args(&unknown).is_err());

        let symbol = vec![Atom::from("@calc_on_input"), Atom::from("yes")];
        assert!(matches!(
            EstimatorConfig::from_args(&symbol),
            Err(HurstError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_max_length_beyond_i64_reports_saturated() {
        // Any usize past the floor is valid; the error path must not wrap negative
        assert!(EstimatorConfig::default().with_max_length(usize::MAX).validate().is_ok());
        assert!(matches!(
            EstimatorConfig::default().with_max_length(3).validate(),
            Err(HurstError::InvalidCapacity { requested: 3, .. })
        ));
        let args = vec![Atom::from("@max_length"), Atom::Float(1e300)];
        assert_eq!(EstimatorConfig::from_args(&args).unwrap().max_length, i64::MAX as usize);
    }

    #[test]
    fn test_flag_clamping() {
        assert!(!flag_arg("f", &Atom::Int(-5)).unwrap());
        assert!(flag_arg("f", &Atom::Int(99)).unwrap());
        assert!(!flag_arg("f", &Atom::Float(0.9)).unwrap());
    }
}

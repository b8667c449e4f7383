//! # Incremental Hurst Estimator
//!
//! [`HurstEstimator`] owns one sample buffer and turns pushes into estimates.
//! All mutations of the buffer happen inside a short critical section; the
//! analysis only ever sees an owned snapshot taken inside that same section,
//! so a concurrent push or resize can never produce a torn read.
//!
//! Failures are recovered here: each public operation both returns a
//! [`HurstResult`] and reports the failure on the estimator's [`Outlet`]. A
//! rejected operation leaves the buffer exactly as it was.
//!
//! ## Usage Example
//!
//! ```rust
//! use incremental_hurst::{EstimatorConfig, HurstEstimator, RecordingOutlet};
//!
//! # fn main() -> Result<(), incremental_hurst::HurstError> {
//! let estimator = HurstEstimator::new(EstimatorConfig::default(), RecordingOutlet::new())?;
//! for i in 1..=64 {
//!     estimator.push_sample(i as f64)?;
//! }
//! // One estimate per push once 16 samples are buffered
//! assert_eq!(estimator.outlet().estimates().len(), 49);
//! # Ok(())
//! # }
//! ```

use crate::{
    atoms::{numeric_batch, Atom},
    config::{flag_arg, numeric_arg, BlockBoundary, EstimatorConfig},
    errors::{capacity_request, validate_all_finite, validate_finite, HurstError, HurstResult, Severity},
    outlet::{Attribute, Emission, LogOutlet, Outlet},
    rs_analysis::{analyze, RsAnalysis, MIN_ANALYSIS_LENGTH},
    series_buffer::SeriesBuffer,
};
use parking_lot::{Mutex, RwLock};

/// Runtime switches, read on every calculation.
#[derive(Debug, Clone, Copy)]
struct Settings {
    calc_on_input: bool,
    size_warning: bool,
    boundary: BlockBoundary,
}

/// Incremental R/S Hurst exponent estimator over a bounded sample buffer.
pub struct HurstEstimator<O: Outlet = LogOutlet> {
    /// Sample storage; the only shared mutable state
    buffer: Mutex<SeriesBuffer>,
    /// Flags and boundary policy
    settings: RwLock<Settings>,
    /// Receiver of estimates, dumps and diagnostics
    outlet: O,
}

impl<O: Outlet> HurstEstimator<O> {
    /// Create an estimator.
    ///
    /// # Errors
    /// `InvalidCapacity` when `config.max_length` is below 16
    pub fn new(config: EstimatorConfig, outlet: O) -> HurstResult<Self> {
        config.validate()?;
        let buffer = SeriesBuffer::new(config.max_length)?;
        log::debug!(
            "creating estimator: max_length={} calc_on_input={} size_warning={} boundary={:?}",
            config.max_length,
            config.calc_on_input,
            config.size_warning,
            config.boundary
        );
        Ok(Self {
            buffer: Mutex::new(buffer),
            settings: RwLock::new(Settings {
                calc_on_input: config.calc_on_input,
                size_warning: config.size_warning,
                boundary: config.boundary,
            }),
            outlet,
        })
    }

    /// The outlet emissions are sent to
    pub fn outlet(&self) -> &O {
        &self.outlet
    }

    /// Current configuration, including the live capacity
    pub fn config(&self) -> EstimatorConfig {
        let settings = *self.settings.read();
        EstimatorConfig {
            max_length: self.max_length(),
            calc_on_input: settings.calc_on_input,
            size_warning: settings.size_warning,
            boundary: settings.boundary,
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Append one sample; calculates afterwards when calc-on-input is set.
    ///
    /// Returns the new estimate if one was produced. Non-finite samples are
    /// rejected before the buffer is touched.
    pub fn push_sample(&self, value: f64) -> HurstResult<Option<f64>> {
        validate_finite(value).map_err(|e| self.report(e))?;
        {
            let mut buffer = self.buffer.lock();
            buffer.push(value);
            log::trace!("pushed {} (length {})", value, buffer.len());
        }
        if self.settings.read().calc_on_input {
            Ok(self.calculate().ok())
        } else {
            Ok(None)
        }
    }

    /// Append one integer sample, widened to double.
    pub fn push_int(&self, value: i64) -> HurstResult<Option<f64>> {
        self.push_sample(value as f64)
    }

    /// Append a batch of host values, all or nothing.
    ///
    /// Every element is validated before the buffer is locked; one symbol or
    /// non-finite number rejects the whole batch. A batch never triggers a
    /// calculation. Returns the number of samples retained from the batch.
    pub fn push_batch(&self, atoms: &[Atom]) -> HurstResult<usize> {
        let values = numeric_batch(atoms).map_err(|e| self.report(e))?;
        Ok(self.append_validated(&values))
    }

    /// Append already-numeric samples, all or nothing.
    pub fn push_values(&self, values: &[f64]) -> HurstResult<usize> {
        validate_all_finite(values).map_err(|e| self.report(e))?;
        Ok(self.append_validated(values))
    }

    fn append_validated(&self, values: &[f64]) -> usize {
        let mut buffer = self.buffer.lock();
        let retained = buffer.extend_from_slice(values);
        log::trace!(
            "appended {} of {} samples (length {})",
            retained,
            values.len(),
            buffer.len()
        );
        retained
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Resize the buffer from a host value (floats truncate toward zero).
    ///
    /// # Errors
    /// - `InvalidParameter` for a symbol
    /// - `InvalidCapacity` below 16
    pub fn set_capacity(&self, value: &Atom) -> HurstResult<()> {
        let requested = numeric_arg(Attribute::MaxLength.label(), value).map_err(|_| {
            self.report(HurstError::InvalidParameter {
                parameter: Attribute::MaxLength.label().to_string(),
                value: value.to_string(),
                constraint: "a positive integer".to_string(),
            })
        })?;
        if requested < 0 {
            let minimum = self.buffer.lock().floor();
            return Err(self.report(HurstError::InvalidCapacity { requested, minimum }));
        }
        self.set_max_length(requested as usize)
    }

    /// Resize the buffer.
    pub fn set_max_length(&self, capacity: usize) -> HurstResult<()> {
        let result = {
            let mut buffer = self.buffer.lock();
            let before = buffer.capacity();
            buffer.resize(capacity).map(|()| {
                log::debug!(
                    "max_length {} -> {} (length {})",
                    before,
                    capacity,
                    buffer.len()
                )
            })
        };
        result.map_err(|e| self.report(e))
    }

    /// Set calc-on-input from a boolean-like host value clamped to {0, 1}.
    pub fn set_calc_on_input(&self, value: &Atom) -> HurstResult<bool> {
        let flag = flag_arg(Attribute::CalcOnInput.label(), value).map_err(|e| self.report(e))?;
        self.settings.write().calc_on_input = flag;
        Ok(flag)
    }

    /// Set the size-warning flag from a boolean-like host value clamped to {0, 1}.
    pub fn set_size_warning(&self, value: &Atom) -> HurstResult<bool> {
        let flag = flag_arg(Attribute::SizeWarning.label(), value).map_err(|e| self.report(e))?;
        self.settings.write().size_warning = flag;
        Ok(flag)
    }

    /// Change the last-block boundary policy.
    pub fn set_boundary(&self, boundary: BlockBoundary) {
        self.settings.write().boundary = boundary;
    }

    /// Write an attribute from host values. `length` is read-only.
    pub fn set_attribute(&self, attribute: Attribute, args: &[Atom]) -> HurstResult<()> {
        let Some(value) = args.first() else {
            return Err(self.report(HurstError::InvalidParameter {
                parameter: attribute.label().to_string(),
                value: "<missing>".to_string(),
                constraint: "a value".to_string(),
            }));
        };
        match attribute {
            Attribute::MaxLength => self.set_capacity(value),
            Attribute::CalcOnInput => self.set_calc_on_input(value).map(|_| ()),
            Attribute::SizeWarning => self.set_size_warning(value).map(|_| ()),
            Attribute::Length => Err(self.report(HurstError::ReadOnlyAttribute {
                name: attribute.label().to_string(),
            })),
        }
    }

    /// Read an attribute; flags as 0/1.
    pub fn attribute(&self, attribute: Attribute) -> i64 {
        match attribute {
            Attribute::MaxLength => capacity_request(self.max_length()),
            Attribute::Length => self.len() as i64,
            Attribute::CalcOnInput => self.calc_on_input() as i64,
            Attribute::SizeWarning => self.size_warning() as i64,
        }
    }

    /// Calc-on-input flag
    pub fn calc_on_input(&self) -> bool {
        self.settings.read().calc_on_input
    }

    /// Size-warning flag
    pub fn size_warning(&self) -> bool {
        self.settings.read().size_warning
    }

    /// Current buffer capacity
    pub fn max_length(&self) -> usize {
        self.buffer.lock().capacity()
    }

    /// Current number of samples
    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    /// True when no samples are buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    // ------------------------------------------------------------------
    // Calculation and output
    // ------------------------------------------------------------------

    /// Copy of the buffered samples, oldest first.
    pub fn snapshot(&self) -> Vec<f64> {
        self.buffer.lock().snapshot()
    }

    /// Run the analysis on a snapshot without emitting anything.
    pub fn analysis(&self) -> HurstResult<RsAnalysis> {
        let samples = self.snapshot();
        let boundary = self.settings.read().boundary;
        analyze(&samples, boundary)
    }

    /// Estimate the Hurst exponent and emit it.
    ///
    /// With fewer than 16 samples nothing is emitted except, when size warnings
    /// are enabled, two warnings. Degenerate series are reported as warnings
    /// and produce no estimate.
    pub fn calculate(&self) -> HurstResult<f64> {
        let samples = self.snapshot();
        let settings = *self.settings.read();

        if samples.len() < MIN_ANALYSIS_LENGTH {
            if settings.size_warning {
                self.outlet
                    .send(Emission::warning("Too few values to calculate Hurst Exponent."));
                self.outlet.send(Emission::warning(format!(
                    "Requires {} values, currently have {}.",
                    MIN_ANALYSIS_LENGTH,
                    samples.len()
                )));
            }
            return Err(HurstError::InsufficientData {
                required: MIN_ANALYSIS_LENGTH,
                actual: samples.len(),
            });
        }

        match analyze(&samples, settings.boundary) {
            Ok(analysis) => {
                self.outlet.send(Emission::Estimate(analysis.hurst));
                Ok(analysis.hurst)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Emit the buffered samples as a `values` list (empty when cleared).
    pub fn dump(&self) {
        let samples = self.snapshot();
        self.outlet.send(Emission::Values(samples));
    }

    /// Emit the four state pairs, then [`dump`](Self::dump).
    pub fn get_state(&self) {
        let settings = *self.settings.read();
        let (max_length, length) = {
            let buffer = self.buffer.lock();
            (buffer.capacity(), buffer.len())
        };
        let pairs = [
            (Attribute::CalcOnInput, settings.calc_on_input as i64),
            (Attribute::MaxLength, capacity_request(max_length)),
            (Attribute::Length, length as i64),
            (Attribute::SizeWarning, settings.size_warning as i64),
        ];
        for (key, value) in pairs {
            self.outlet.send(Emission::State { key, value });
        }
        self.dump();
    }

    /// Emit a single attribute's state pair.
    pub fn report_attribute(&self, attribute: Attribute) {
        self.outlet.send(Emission::State {
            key: attribute,
            value: self.attribute(attribute),
        });
    }

    /// Drop every buffered sample. Capacity is unchanged.
    pub fn clear(&self) {
        self.buffer.lock().clear();
        log::trace!("cleared samples");
    }

    /// Log and emit `error` as a diagnostic, handing it back for propagation.
    pub(crate) fn report(&self, error: HurstError) -> HurstError {
        let message = error.to_string();
        match error.severity() {
            Severity::Warning => log::warn!("{}", message),
            Severity::Error => log::error!("{}", message),
        }
        self.outlet.send(Emission::Diagnostic {
            severity: error.severity(),
            message,
        });
        error
    }
}

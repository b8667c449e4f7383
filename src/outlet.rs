//! Emissions and the sinks that receive them.
//!
//! The estimator never formats host messages itself. Everything it reports
//! (estimates, sample dumps, state pairs and diagnostics) is an [`Emission`]
//! handed to an [`Outlet`]; the host decides how to serialise it.

use crate::errors::{HurstError, Severity};
use parking_lot::Mutex;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Estimator attribute, also the label of each state pair reported by `get_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Attribute {
    /// Calc-on-input flag
    CalcOnInput,
    /// Buffer capacity
    MaxLength,
    /// Current number of samples
    Length,
    /// Size-warning flag
    SizeWarning,
}

impl Attribute {
    /// Host-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::CalcOnInput => "calc_on_input",
            Attribute::MaxLength => "max_length",
            Attribute::Length => "length",
            Attribute::SizeWarning => "size_warning",
        }
    }
}

impl FromStr for Attribute {
    type Err = HurstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calc_on_input" => Ok(Attribute::CalcOnInput),
            "max_length" => Ok(Attribute::MaxLength),
            "length" => Ok(Attribute::Length),
            "size_warning" => Ok(Attribute::SizeWarning),
            other => Err(HurstError::UnknownMessage {
                selector: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Something the estimator reports.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Emission {
    /// A Hurst exponent estimate (result channel)
    Estimate(f64),
    /// Current samples, oldest first, labelled `values` (dump channel)
    Values(Vec<f64>),
    /// One labelled state pair (dump channel)
    State {
        /// Which value this is
        key: Attribute,
        /// Value, flags as 0/1
        value: i64,
    },
    /// Human-readable warning or error (diagnostic channel)
    Diagnostic {
        /// Warning or error
        severity: Severity,
        /// Message text
        message: String,
    },
}

impl Emission {
    /// Warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Emission::Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Emission::Diagnostic {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// The estimate, if this is one.
    pub fn as_estimate(&self) -> Option<f64> {
        match self {
            Emission::Estimate(h) => Some(*h),
            _ => None,
        }
    }
}

/// Receiver of estimator emissions.
///
/// Outlets are called from whichever thread drives the estimator, and never
/// while the sample buffer lock is held.
pub trait Outlet: Send + Sync {
    /// Deliver one emission.
    fn send(&self, emission: Emission);
}

impl<F> Outlet for F
where
    F: Fn(Emission) + Send + Sync,
{
    fn send(&self, emission: Emission) {
        self(emission)
    }
}

/// Forwards emissions to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOutlet;

impl Outlet for LogOutlet {
    fn send(&self, emission: Emission) {
        match emission {
            Emission::Estimate(h) => log::info!("hurst exponent: {}", h),
            Emission::Values(values) => log::info!("values ({}): {:?}", values.len(), values),
            Emission::State { key, value } => log::info!("{} {}", key, value),
            Emission::Diagnostic {
                severity: Severity::Warning,
                message,
            } => log::warn!("{}", message),
            Emission::Diagnostic {
                severity: Severity::Error,
                message,
            } => log::error!("{}", message),
        }
    }
}

/// Collects emissions in arrival order.
#[derive(Debug, Default)]
pub struct RecordingOutlet {
    emissions: Mutex<Vec<Emission>>,
}

impl RecordingOutlet {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything received so far
    pub fn emissions(&self) -> Vec<Emission> {
        self.emissions.lock().clone()
    }

    /// Remove and return everything received so far
    pub fn take(&self) -> Vec<Emission> {
        std::mem::take(&mut *self.emissions.lock())
    }

    /// Estimates received so far, in order
    pub fn estimates(&self) -> Vec<f64> {
        self.emissions
            .lock()
            .iter()
            .filter_map(Emission::as_estimate)
            .collect()
    }

    /// Diagnostic messages received so far, in order
    pub fn diagnostics(&self) -> Vec<(Severity, String)> {
        self.emissions
            .lock()
            .iter()
            .filter_map(|e| match e {
                Emission::Diagnostic { severity, message } => Some((*severity, message.clone())),
                _ => None,
            })
            .collect()
    }

    /// Most recent `Values` dump, if any
    pub fn last_values(&self) -> Option<Vec<f64>> {
        self.emissions.lock().iter().rev().find_map(|e| match e {
            Emission::Values(values) => Some(values.clone()),
            _ => None,
        })
    }

    /// Number of emissions received
    pub fn len(&self) -> usize {
        self.emissions.lock().len()
    }

    /// True if nothing was received
    pub fn is_empty(&self) -> bool {
        self.emissions.lock().is_empty()
    }
}

impl Outlet for RecordingOutlet {
    fn send(&self, emission: Emission) {
        self.emissions.lock().push(emission);
    }
}

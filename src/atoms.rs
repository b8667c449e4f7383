//! Untyped message arguments.
//!
//! Hosts hand the estimator loosely typed values: integers, floats and
//! symbols mixed in one list. [`Atom`] carries them until the estimator decides
//! which ones are acceptable samples or attribute values.

use crate::errors::{HurstError, HurstResult};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single host value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Atom {
    /// Integer value
    Int(i64),
    /// Double-precision value
    Float(f64),
    /// Anything that is not a number
    Symbol(String),
}

impl Atom {
    /// Parse host text: integers first, then floats, otherwise a symbol.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if let Ok(i) = text.parse::<i64>() {
            Atom::Int(i)
        } else if let Some(f) = parse_float(text) {
            Atom::Float(f)
        } else {
            Atom::Symbol(text.to_string())
        }
    }

    /// Numeric value widened to double; `None` for symbols.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Atom::Int(i) => Some(*i as f64),
            Atom::Float(f) => Some(*f),
            Atom::Symbol(_) => None,
        }
    }

    /// Numeric value as an integer, floats truncated toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Atom::Int(i) => Some(*i),
            Atom::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            _ => None,
        }
    }

    /// True for `Int` and `Float`.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Atom::Symbol(_))
    }
}

// `f64::from_str` accepts "nan", "inf" and "infinity"; keep those as symbols.
fn parse_float(text: &str) -> Option<f64> {
    let looks_numeric = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if looks_numeric {
        text.parse::<f64>().ok()
    } else {
        None
    }
}

impl FromStr for Atom {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Atom::parse(s))
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Int(i) => write!(f, "{}", i),
            Atom::Float(x) => write!(f, "{}", x),
            Atom::Symbol(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Atom {
    fn from(value: i64) -> Self {
        Atom::Int(value)
    }
}

impl From<f64> for Atom {
    fn from(value: f64) -> Self {
        Atom::Float(value)
    }
}

impl From<&str> for Atom {
    fn from(value: &str) -> Self {
        Atom::Symbol(value.to_string())
    }
}

/// Convert a batch of atoms into samples, all or nothing.
///
/// The whole batch is checked before anything is returned, so a caller that
/// mutates only on `Ok` never applies part of a bad batch.
pub fn numeric_batch(atoms: &[Atom]) -> HurstResult<Vec<f64>> {
    atoms
        .iter()
        .enumerate()
        .map(|(index, atom)| match atom.as_f64() {
            Some(value) if value.is_finite() => Ok(value),
            Some(value) => Err(HurstError::NonFiniteInput { index, value }),
            None => Err(HurstError::NonNumericInput {
                index,
                found: atom.to_string(),
            }),
        })
        .collect()
}

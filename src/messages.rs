//! Host messages and their dispatch onto an estimator.
//!
//! A message is one line of host text: a selector followed by arguments, or a
//! bare number / number list. Parsing produces a [`Message`];
//! [`HurstEstimator::dispatch`] applies it.
//!
//! | text                    | message                      |
//! |-------------------------|------------------------------|
//! | `bang`                  | calculate now                |
//! | `3`, `int 3`            | push an integer sample       |
//! | `2.5`, `float 2.5`      | push a float sample          |
//! | `1 2 3`, `list 1 2 3`   | batch push, no calculation   |
//! | `dump`                  | emit the samples             |
//! | `clear`                 | drop the samples             |
//! | `getstate`              | emit state pairs, then dump  |
//! | `max_length 512`        | set an attribute             |
//! | `max_length`            | report an attribute          |

use crate::{
    atoms::Atom,
    errors::{HurstError, HurstResult},
    estimator::HurstEstimator,
    outlet::{Attribute, Outlet},
};

/// One parsed host message.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Run a calculation
    Bang,
    /// Push one integer sample
    Int(i64),
    /// Push one float sample
    Float(f64),
    /// Push a batch of values
    List(Vec<Atom>),
    /// Emit the samples
    Dump,
    /// Drop the samples
    Clear,
    /// Emit every state pair, then the samples
    GetState,
    /// Read (no args) or write an attribute
    Attribute {
        /// Target attribute
        name: Attribute,
        /// New value; empty for a query
        args: Vec<Atom>,
    },
}

impl Message {
    /// Parse one line of host text.
    ///
    /// # Errors
    /// - `UnknownMessage` for an empty line or an unrecognised selector
    /// - `InvalidParameter` when `int` / `float` lack a numeric argument
    pub fn parse(text: &str) -> HurstResult<Self> {
        let atoms: Vec<Atom> = text.split_whitespace().map(Atom::parse).collect();
        let Some((head, rest)) = atoms.split_first() else {
            return Err(HurstError::UnknownMessage {
                selector: String::new(),
            });
        };

        let selector = match head {
            Atom::Int(i) if rest.is_empty() => return Ok(Message::Int(*i)),
            Atom::Float(f) if rest.is_empty() => return Ok(Message::Float(*f)),
            Atom::Int(_) | Atom::Float(_) => return Ok(Message::List(atoms)),
            Atom::Symbol(s) => s.as_str(),
        };

        match selector {
            "bang" => Ok(Message::Bang),
            "int" => single_number(selector, rest)
                .and_then(|a| numeric(selector, a.as_i64()))
                .map(Message::Int),
            "float" => single_number(selector, rest)
                .and_then(|a| numeric(selector, a.as_f64()))
                .map(Message::Float),
            "list" => Ok(Message::List(rest.to_vec())),
            "dump" => Ok(Message::Dump),
            "clear" => Ok(Message::Clear),
            "getstate" => Ok(Message::GetState),
            other => other.parse::<Attribute>().map(|name| Message::Attribute {
                name,
                args: rest.to_vec(),
            }),
        }
    }
}

fn single_number<'a>(selector: &str, rest: &'a [Atom]) -> HurstResult<&'a Atom> {
    rest.first().ok_or_else(|| HurstError::InvalidParameter {
        parameter: selector.to_string(),
        value: "<missing>".to_string(),
        constraint: "a number".to_string(),
    })
}

fn numeric<T>(selector: &str, value: Option<T>) -> HurstResult<T> {
    value.ok_or_else(|| HurstError::InvalidParameter {
        parameter: selector.to_string(),
        value: "<symbol>".to_string(),
        constraint: "a number".to_string(),
    })
}

impl<O: Outlet> HurstEstimator<O> {
    /// Apply one message.
    ///
    /// Returns the estimate when the message produced one. Calculations that
    /// are skipped for lack of data or numerical degeneracy yield `Ok(None)`;
    /// their diagnostics have already been emitted.
    pub fn dispatch(&self, message: Message) -> HurstResult<Option<f64>> {
        log::trace!("dispatch {:?}", message);
        match message {
            Message::Bang => match self.calculate() {
                Ok(h) => Ok(Some(h)),
                Err(e) if e.is_skip() => Ok(None),
                Err(e) => Err(e),
            },
            Message::Int(i) => self.push_int(i),
            Message::Float(f) => self.push_sample(f),
            Message::List(atoms) => self.push_batch(&atoms).map(|_| None),
            Message::Dump => {
                self.dump();
                Ok(None)
            }
            Message::Clear => {
                self.clear();
                Ok(None)
            }
            Message::GetState => {
                self.get_state();
                Ok(None)
            }
            Message::Attribute { name, args } if args.is_empty() => {
                self.report_attribute(name);
                Ok(None)
            }
            Message::Attribute { name, args } => self.set_attribute(name, &args).map(|()| None),
        }
    }

    /// Parse and apply one line of host text, reporting parse failures.
    pub fn handle_line(&self, line: &str) -> HurstResult<Option<f64>> {
        let message = Message::parse(line).map_err(|e| self.report(e))?;
        self.dispatch(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EstimatorConfig;
    use crate::errors::Severity;
    use crate::outlet::{Emission, RecordingOutlet};

    #[test]
    fn test_parse_selectors() {
        assert_eq!(Message::parse("bang").unwrap(), Message::Bang);
        assert_eq!(Message::parse("  dump ").unwrap(), Message::Dump);
        assert_eq!(Message::parse("clear").unwrap(), Message::Clear);
        assert_eq!(Message::parse("getstate").unwrap(), Message::GetState);
        assert_eq!(Message::parse("int 7").unwrap(), Message::Int(7));
        assert_eq!(Message::parse("int 7.9").unwrap(), Message::Int(7));
        assert_eq!(Message::parse("float 3").unwrap(), Message::Float(3.0));
        assert_eq!(
            Message::parse("list 1 x").unwrap(),
            Message::List(vec![Atom::Int(1), Atom::from("x")])
        );
    }

    #[test]
    fn test_parse_bare_numbers() {
        assert_eq!(Message::parse("42").unwrap(), Message::Int(42));
        assert_eq!(Message::parse("-0.25").unwrap(), Message::Float(-0.25));
        assert_eq!(
            Message::parse("1 2.5 3").unwrap(),
            Message::List(vec![Atom::Int(1), Atom::Float(2.5), Atom::Int(3)])
        );
    }

    #[test]
    fn test_parse_attributes() {
        assert_eq!(
            Message::parse("max_length 512").unwrap(),
            Message::Attribute {
                name: Attribute::MaxLength,
                args: vec![Atom::Int(512)],
            }
        );
        assert_eq!(
            Message::parse("length").unwrap(),
            Message::Attribute {
                name: Attribute::Length,
                args: vec![],
            }
        );
    }

    #[test]
    fn test_parse_rejections() {
        assert!(matches!(
            Message::parse(""),
            Err(HurstError::UnknownMessage { .. })
        ));
        assert!(matches!(
            Message::parse("threads 4"),
            Err(HurstError::UnknownMessage { selector }) if selector == "threads"
        ));
        assert!(matches!(
            Message::parse("int"),
            Err(HurstError::InvalidParameter { .. })
        ));
        assert!(Message::parse("float abc").is_err());
    }

    #[test]
    fn test_line_session() {
        let est = HurstEstimator::new(
            EstimatorConfig::default().with_calc_on_input(false),
            RecordingOutlet::new(),
        )
        .unwrap();

        let values: Vec<String> = (1..=64).map(|i| i.to_string()).collect();
        assert_eq!(est.handle_line(&values.join(" ")).unwrap(), None);
        assert_eq!(est.len(), 64);

        let h = est.handle_line("bang").unwrap().unwrap();
        assert!((h - 0.9910043451977322).abs() < 1e-9);

        est.handle_line("calc_on_input 1").unwrap();
        assert!(est.handle_line("65").unwrap().is_some());

        est.outlet().take();
        est.handle_line("max_length").unwrap();
        assert_eq!(
            est.outlet().emissions(),
            vec![Emission::State {
                key: Attribute::MaxLength,
                value: 256
            }]
        );
    }

    #[test]
    fn test_bang_on_short_buffer_is_skipped() {
        let est = HurstEstimator::new(EstimatorConfig::default(), RecordingOutlet::new()).unwrap();
        est.handle_line("list 1 2 3").unwrap();
        assert_eq!(est.dispatch(Message::Bang).unwrap(), None);
        assert_eq!(est.outlet().diagnostics().len(), 2);
    }

    #[test]
    fn test_unknown_line_is_reported() {
        let est = HurstEstimator::new(EstimatorConfig::default(), RecordingOutlet::new()).unwrap();
        assert!(est.handle_line("frobnicate").is_err());
        let diagnostics = est.outlet().diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].0, Severity::Error);
    }

    #[test]
    fn test_float_capacity_saturates() {
        let est = HurstEstimator::new(EstimatorConfig::default(), RecordingOutlet::new()).unwrap();
        est.handle_line("max_length 1e300").unwrap();
        assert_eq!(est.attribute(Attribute::MaxLength), i64::MAX);
        est.handle_line("max_length 64.7").unwrap();
        assert_eq!(est.max_length(), 64);
    }

    #[test]
    fn test_length_write_rejected() {
        let est = HurstEstimator::new(EstimatorConfig::default(), RecordingOutlet::new()).unwrap();
        assert!(matches!(
            est.handle_line("length 3"),
            Err(HurstError::ReadOnlyAttribute { .. })
        ));
    }
}

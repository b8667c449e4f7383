//! # Incremental Hurst Estimation
//!
//! Streaming estimation of the Hurst exponent of a numeric time series using
//! rescaled range (R/S) analysis.
//!
//! Samples are pushed one at a time or in batches into a bounded FIFO buffer.
//! On every push (or on demand) the buffer is snapshotted, cut into blocks on a
//! power-of-two scale schedule, and the per-scale average R/S ratios are
//! regressed in log2-log2 space. The slope is the estimate: around 0.5 for a
//! random walk, above 0.5 for persistent series, below for mean-reverting ones.
//!
//! ## Key Features
//!
//! - **Bounded buffer**: oldest samples are evicted once the capacity is reached
//! - **Atomic batches**: one non-numeric or non-finite element rejects the whole batch
//! - **Deterministic**: identical buffers give bit-identical estimates
//! - **Thread-safe**: pushes, resizes and calculations may come from any thread
//! - **Typed output**: estimates, dumps, state and diagnostics arrive as [`Emission`]s
//!
//! ## Quick Start
//!
//! ```rust
//! use incremental_hurst::{Emission, EstimatorConfig, HurstEstimator, RecordingOutlet};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EstimatorConfig::default().with_max_length(128);
//!     let estimator = HurstEstimator::new(config, RecordingOutlet::new())?;
//!
//!     // A persistent series: a slowly drifting sine
//!     for i in 0..200 {
//!         let x = i as f64;
//!         estimator.push_sample(0.05 * x + (x * 0.3).sin())?;
//!     }
//!     assert_eq!(estimator.len(), 128);
//!
//!     let h = estimator.calculate()?;
//!     println!("H = {:.3}", h);
//!
//!     estimator.dump();
//!     match estimator.outlet().emissions().last() {
//!         Some(Emission::Values(values)) => assert_eq!(values.len(), 128),
//!         other => panic!("unexpected emission {:?}", other),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! [`HurstEstimator`] owns a [`SeriesBuffer`] behind a lock and reports through
//! an [`Outlet`]. The analysis itself is a set of pure functions over a sample
//! slice ([`analyze`], [`estimate_hurst`]) that can be used without an estimator.
//! Host text is parsed into [`Message`]s and applied with
//! [`HurstEstimator::dispatch`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod atoms;
pub mod config;
pub mod errors;
pub mod series_buffer;

// Analysis
pub mod block_statistics;
pub mod linear_fit;
pub mod rs_analysis;

// Estimator and host interface
pub mod estimator;
pub mod messages;
pub mod outlet;

// Re-exports for convenience - main public API
pub use atoms::Atom;
pub use config::{BlockBoundary, EstimatorConfig, DEFAULT_MAX_LENGTH};
pub use errors::{HurstError, HurstResult, Severity, MIN_CAPACITY};
pub use estimator::HurstEstimator;
pub use messages::Message;
pub use outlet::{Attribute, Emission, LogOutlet, Outlet, RecordingOutlet};
pub use series_buffer::SeriesBuffer;

// Analysis exports
pub use block_statistics::{BlockRange, BlockStatistics, STDDEV_FLOOR};
pub use linear_fit::ols_slope;
pub use rs_analysis::{analyze, estimate_hurst, RsAnalysis, ScalePoint, MIN_ANALYSIS_LENGTH};

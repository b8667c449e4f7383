//! Integration tests for the push / calculate / dump workflow
//!
//! These tests drive a HurstEstimator the way a host would and check what
//! arrives on the outlet.

use incremental_hurst::{
    Atom, Attribute, Emission, EstimatorConfig, HurstError, HurstEstimator, RecordingOutlet,
};
use std::sync::Arc;

fn recording(config: EstimatorConfig) -> HurstEstimator<RecordingOutlet> {
    HurstEstimator::new(config, RecordingOutlet::new()).unwrap()
}

/// Test scenario: sustained streaming into a full buffer
///
/// 300 pushes into capacity 256: length stabilizes, the oldest values are
/// evicted and every push from the 16th on produces an estimate.
#[test]
fn test_streaming_past_capacity() {
    let estimator = recording(EstimatorConfig::default());

    for i in 1..=300 {
        estimator.push_int(i).unwrap();
        assert!(estimator.len() <= 256);

        if i == 257 {
            estimator.dump();
            let values = estimator.outlet().last_values().unwrap();
            assert_eq!(values.len(), 256);
            assert!(!values.contains(&1.0), "1 must be evicted by the 257th push");
            assert_eq!(values[0], 2.0);
        }
    }

    assert_eq!(estimator.len(), 256);
    assert_eq!(estimator.outlet().estimates().len(), 300 - 15);

    estimator.dump();
    let values = estimator.outlet().last_values().unwrap();
    let expected: Vec<f64> = (45..=300).map(|i| i as f64).collect();
    assert_eq!(values, expected);
}

/// Test scenario: clear keeps configuration
#[test]
fn test_clear_then_state() {
    let estimator = recording(EstimatorConfig::default().with_max_length(100));
    estimator
        .push_values(&(0..80).map(|i| i as f64).collect::<Vec<_>>())
        .unwrap();
    estimator.clear();
    estimator.outlet().take();

    estimator.get_state();
    let emissions = estimator.outlet().emissions();
    assert_eq!(emissions.len(), 5);
    assert!(emissions.contains(&Emission::State {
        key: Attribute::Length,
        value: 0
    }));
    assert!(emissions.contains(&Emission::State {
        key: Attribute::MaxLength,
        value: 100
    }));
    assert_eq!(emissions[4], Emission::Values(vec![]));
}

/// Test scenario: short buffers never produce an estimate
#[test]
fn test_short_buffer_never_estimates() {
    for size_warning in [true, false] {
        let estimator = recording(EstimatorConfig::default().with_size_warning(size_warning));
        for i in 0..15 {
            assert_eq!(estimator.push_sample(i as f64 * 0.5).unwrap(), None);
        }
        assert!(matches!(
            estimator.calculate(),
            Err(HurstError::InsufficientData { actual: 15, .. })
        ));
        assert!(estimator.outlet().estimates().is_empty());

        let warnings = estimator.outlet().diagnostics().len();
        if size_warning {
            // Two warnings per attempt: 15 pushes plus the explicit calculate
            assert_eq!(warnings, 32);
        } else {
            assert_eq!(warnings, 0);
        }
    }
}

/// Test scenario: a rejected batch leaves no trace in the buffer
#[test]
fn test_batch_is_all_or_nothing() {
    let estimator = recording(EstimatorConfig::default().with_calc_on_input(false));
    estimator.push_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();

    let mut atoms: Vec<Atom> = (0..50).map(|i| Atom::Float(i as f64 * 0.1)).collect();
    atoms[49] = Atom::from("oops");
    let result = estimator.push_batch(&atoms);
    assert!(matches!(
        result,
        Err(HurstError::NonNumericInput { index: 49, .. })
    ));
    assert_eq!(estimator.snapshot(), vec![1.0, 2.0, 3.0, 4.0]);

    atoms[49] = Atom::Float(f64::NAN);
    assert!(estimator.push_batch(&atoms).is_err());
    assert_eq!(estimator.len(), 4);

    atoms[49] = Atom::Int(7);
    assert_eq!(estimator.push_batch(&atoms).unwrap(), 50);
    assert_eq!(estimator.len(), 54);
}

/// Test scenario: oversized batch keeps only its newest values
#[test]
fn test_oversized_batch() {
    let estimator = recording(EstimatorConfig::default().with_max_length(16));
    estimator.push_values(&[-1.0; 10]).unwrap();
    let batch: Vec<f64> = (0..40).map(|i| i as f64).collect();
    assert_eq!(estimator.push_values(&batch).unwrap(), 16);
    assert_eq!(estimator.snapshot(), batch[24..].to_vec());
}

/// Test scenario: capacity changes keep the newest samples
#[test]
fn test_resize_retention() {
    let estimator = recording(EstimatorConfig::default().with_calc_on_input(false));
    let samples: Vec<f64> = (0..100).map(|i| i as f64).collect();
    estimator.push_values(&samples).unwrap();

    estimator.set_max_length(32).unwrap();
    assert_eq!(estimator.snapshot(), samples[68..].to_vec());

    estimator.set_max_length(512).unwrap();
    assert_eq!(estimator.len(), 32);
    assert_eq!(estimator.max_length(), 512);

    // Rejections leave everything unchanged
    assert!(estimator.set_capacity(&Atom::Int(15)).is_err());
    assert!(estimator.set_capacity(&Atom::from("huge")).is_err());
    assert_eq!(estimator.max_length(), 512);
    assert_eq!(estimator.snapshot(), samples[68..].to_vec());
}

/// Test scenario: the ramp 1..=64 gives the same bits every time
#[test]
fn test_ramp_estimate_is_reproducible() {
    let ramp: Vec<f64> = (1..=64).map(|i| i as f64).collect();
    let mut estimates = Vec::new();
    for _ in 0..3 {
        let estimator = recording(EstimatorConfig::default().with_calc_on_input(false));
        estimator.push_values(&ramp).unwrap();
        let analysis = estimator.analysis().unwrap();
        assert_eq!(analysis.base_division_size, 4);
        assert_eq!(analysis.layer_count(), 5);
        estimates.push(estimator.calculate().unwrap().to_bits());
    }
    assert!(estimates.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(
        f64::from_bits(estimates[0]),
        incremental_hurst::estimate_hurst(&ramp).unwrap()
    );
}

/// Test scenario: concurrent producers and readers
///
/// Every snapshot must be a contiguous, ordered run of one producer's values
/// and never exceed the capacity.
#[test]
fn test_concurrent_pushes_and_calculations() {
    let estimator = Arc::new(recording(
        EstimatorConfig::default()
            .with_max_length(64)
            .with_calc_on_input(false)
            .with_size_warning(false),
    ));

    std::thread::scope(|scope| {
        for producer in 0..4 {
            let estimator = Arc::clone(&estimator);
            scope.spawn(move || {
                for i in 0..500 {
                    let value = (producer * 1000 + i) as f64;
                    estimator.push_sample(value).unwrap();
                }
            });
        }
        let reader = Arc::clone(&estimator);
        scope.spawn(move || {
            for _ in 0..200 {
                let snapshot = reader.snapshot();
                assert!(snapshot.len() <= 64);
                for producer in 0..4 {
                    let own: Vec<f64> = snapshot
                        .iter()
                        .copied()
                        .filter(|v| (*v / 1000.0).floor() as usize == producer)
                        .collect();
                    assert!(own.windows(2).all(|w| w[0] < w[1]));
                }
                let _ = reader.calculate();
                if reader.len() % 2 == 0 {
                    let _ = reader.set_max_length(48 + reader.len() % 32);
                }
            }
        });
    });

    assert!(estimator.len() <= estimator.max_length());
    for h in estimator.outlet().estimates() {
        assert!(h.is_finite());
    }
}

//! Bounded FIFO storage for time-series samples.
//!
//! [`SeriesBuffer`] keeps at most `capacity` samples, most recent last. Pushing
//! into a full buffer evicts from the front, so the buffer always holds the
//! newest `capacity` values in the order they arrived.
//!
//! The buffer itself is not synchronised; the estimator wraps it in a lock and
//! hands analysis code a [`snapshot`](SeriesBuffer::snapshot) instead of a
//! reference to the live storage.

use crate::errors::{capacity_request, validate_capacity, HurstResult, MIN_CAPACITY};

/// Fixed-capacity FIFO over `f64` samples.
///
/// # Invariants
/// - `len() <= capacity()` after every operation
/// - samples are stored oldest first
/// - `capacity() >= floor()`
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBuffer {
    data: Vec<f64>,
    capacity: usize,
    floor: usize,
}

impl SeriesBuffer {
    /// Create an empty buffer.
    pub fn new(capacity: usize) -> HurstResult<Self> {
        Self::with_floor(capacity, MIN_CAPACITY)
    }

    /// Create an empty buffer whose capacity may never drop below `floor`.
    ///
    /// A floor smaller than 16 is raised to 16.
    pub fn with_floor(capacity: usize, floor: usize) -> HurstResult<Self> {
        let floor = floor.max(MIN_CAPACITY);
        let capacity = validate_capacity(capacity_request(capacity), floor)?;
        // Storage grows with the samples; `capacity` is only the logical bound
        Ok(Self {
            data: Vec::new(),
            capacity,
            floor,
        })
    }

    /// Append one sample, evicting the oldest when full.
    pub fn push(&mut self, value: f64) {
        if self.data.len() == self.capacity {
            // Shift left by one and overwrite the freed last slot
            self.data.copy_within(1.., 0);
            if let Some(last) = self.data.last_mut() {
                *last = value;
            }
        } else {
            self.data.push(value);
        }
    }

    /// Append samples in order, evicting as needed.
    ///
    /// When `values` alone exceeds the capacity only its newest `capacity`
    /// entries are kept. Returns how many incoming samples were retained.
    pub fn extend_from_slice(&mut self, values: &[f64]) -> usize {
        let skip = values.len().saturating_sub(self.capacity);
        let retained = &values[skip..];

        let total = self.data.len() + retained.len();
        if total > self.capacity {
            let evict = (total - self.capacity).min(self.data.len());
            self.data.drain(..evict);
        }
        self.data.extend_from_slice(retained);

        debug_assert!(self.data.len() <= self.capacity);
        retained.len()
    }

    /// Change the capacity.
    ///
    /// Shrinking keeps the newest `min(len, new_capacity)` samples; growing keeps
    /// everything. Capacities below the floor are rejected and leave the buffer
    /// untouched.
    pub fn resize(&mut self, new_capacity: usize) -> HurstResult<()> {
        let new_capacity = validate_capacity(capacity_request(new_capacity), self.floor)?;
        if new_capacity < self.capacity {
            let excess = self.data.len().saturating_sub(new_capacity);
            self.data.drain(..excess);
            self.data.shrink_to(new_capacity);
        }
        self.capacity = new_capacity;
        Ok(())
    }

    /// Logically empty the buffer. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Owned copy of the current samples, oldest first.
    pub fn snapshot(&self) -> Vec<f64> {
        self.data.clone()
    }

    /// Read-only view of the current samples.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Current number of samples.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True when the next push evicts.
    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// Maximum number of samples retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Smallest capacity this buffer accepts.
    pub fn floor(&self) -> usize {
        self.floor
    }
}

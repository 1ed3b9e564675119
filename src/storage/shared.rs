//! Aggregator shared between the sampling and render tasks
//!
//! Each monitored quantity gets its own lock, so sampling one quantity never
//! waits on another. The render task only holds the lock long enough to copy
//! a [`SeriesSnapshot`] out.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use super::{Aggregator, AggregatorError, SeriesSnapshot};

/// An [`Aggregator`] behind a critical-section mutex
pub struct SharedAggregator {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Aggregator>>,
}

impl SharedAggregator {
    /// Create a shared aggregator with the given history capacity
    pub fn new(capacity: usize) -> Self {
        Self::from_aggregator(Aggregator::new(capacity))
    }

    /// Wrap an existing aggregator
    pub fn from_aggregator(aggregator: Aggregator) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(aggregator)),
        }
    }

    /// Run `f` with exclusive access to the aggregator
    pub fn with<R>(&self, f: impl FnOnce(&mut Aggregator) -> R) -> R {
        self.inner.lock(|cell| f(&mut *cell.borrow_mut()))
    }

    /// See [`Aggregator::add`]
    pub fn add(&self, value: f32) -> Result<(), AggregatorError> {
        self.with(|aggregator| aggregator.add(value))
    }

    /// See [`Aggregator::commit`]
    pub fn commit(&self) -> f32 {
        self.with(|aggregator| aggregator.commit())
    }

    /// Copy the committed state out for rendering
    pub fn snapshot(&self) -> SeriesSnapshot {
        self.with(|aggregator| aggregator.snapshot())
    }
}

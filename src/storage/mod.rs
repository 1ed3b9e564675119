//! Aggregated sensor history
//!
//! - [`aggregator`] - window mean, lifetime extrema and the bounded history
//! - [`shared`] - the lock-guarded handle shared by sampling and rendering

pub mod aggregator;
pub mod shared;

pub use aggregator::{Aggregator, AggregatorError};
pub use shared::SharedAggregator;

extern crate alloc;
use alloc::vec::Vec;

/// Default number of committed averages kept per quantity
///
/// At one commit every 10 minutes this covers ~16.7 hours.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Lifetime minimum and maximum of a quantity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrema {
    /// Smallest sample seen
    pub min: f32,
    /// Largest sample seen
    pub max: f32,
}

/// Immutable copy of an aggregator's committed state, taken for one render.
///
/// Rendering works exclusively from snapshots so the sampling task is never
/// blocked for the duration of a panel refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSnapshot {
    /// Committed averages, oldest first
    pub history: Vec<f32>,
    /// Lifetime extrema, `None` before the first sample
    pub extrema: Option<Extrema>,
    /// Most recent raw sample
    pub last_value: Option<f32>,
    /// History-length-weighted mean of the committed averages
    pub overall_average: f32,
    /// Order of magnitude of `overall_average`
    pub magnitude_scale: i32,
}

impl SeriesSnapshot {
    /// Committed value `index` steps back from the newest entry
    ///
    /// `from_newest(0)` is the most recent commit. Returns `None` when the
    /// history is not that long.
    pub fn from_newest(&self, index: usize) -> Option<f32> {
        let len = self.history.len();
        if index < len {
            Some(self.history[len - 1 - index])
        } else {
            None
        }
    }
}

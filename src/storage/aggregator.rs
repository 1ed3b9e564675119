//! Rolling aggregation of raw sensor samples into a bounded history.
//!
//! Samples arrive at a fast cadence (every ~20 s) and are folded into a
//! running window average. On a slower cadence (every ~10 min) the window is
//! committed: its average is appended to the history ring, which is the only
//! time series the display ever plots.

extern crate alloc;
use alloc::collections::VecDeque;
use alloc::vec::Vec;

use log::debug;
use thiserror_no_std::Error;

use super::{DEFAULT_HISTORY_CAPACITY, Extrema, SeriesSnapshot};

/// Errors raised while feeding the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AggregatorError {
    /// The sample was NaN or infinite and was discarded
    #[error("Invalid sample: {value} is not a finite number")]
    InvalidSample {
        /// The rejected value
        value: f32,
    },
}

/// Order of magnitude of a value, used to pick display precision.
///
/// Positive values round the exponent up, everything else rounds it down.
/// Zero (and non-finite input) has scale 0.
pub fn magnitude_scale(value: f32) -> i32 {
    if value == 0.0 || !value.is_finite() {
        return 0;
    }

    let log = libm::log10f(libm::fabsf(value));
    if value > 0.0 {
        libm::ceilf(log) as i32
    } else {
        libm::floorf(log) as i32
    }
}

/// Running statistics for one monitored quantity.
///
/// ## Window vs. history
///
/// - `add` folds a sample into the *window* (mean + count) and the lifetime
///   extrema.
/// - `commit` moves the window mean into the *history* ring and restarts the
///   window count. The stale mean is left in place; it is only meaningful
///   while the count is non-zero and is overwritten by the next sample.
///
/// The history is pre-allocated to its capacity and evicts its oldest entry
/// once full.
#[derive(Debug, Clone)]
pub struct Aggregator {
    window_average: f32,
    window_count: u32,
    running_max: f32,
    running_min: f32,
    last_value: Option<f32>,
    history: VecDeque<f32>,
    capacity: usize,
    overall_average: f32,
    magnitude_scale: i32,
    lifetime_average: f32,
    lifetime_commits: u64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl Aggregator {
    /// Create an aggregator keeping at most `capacity` committed averages.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window_average: 0.0,
            window_count: 0,
            running_max: f32::NEG_INFINITY,
            running_min: f32::INFINITY,
            last_value: None,
            history: VecDeque::with_capacity(capacity),
            capacity,
            overall_average: 0.0,
            magnitude_scale: 0,
            lifetime_average: 0.0,
            lifetime_commits: 0,
        }
    }

    /// Fold a raw sample into the current window.
    pub fn add(&mut self, value: f32) -> Result<(), AggregatorError> {
        if !value.is_finite() {
            return Err(AggregatorError::InvalidSample { value });
        }

        let count = self.window_count as f32;
        self.window_average = (count * self.window_average + value) / (count + 1.0);
        self.window_count += 1;
        self.running_max = self.running_max.max(value);
        self.running_min = self.running_min.min(value);
        self.last_value = Some(value);
        Ok(())
    }

    /// Commit the pending window average into the history.
    ///
    /// Returns the committed value.
    pub fn commit(&mut self) -> f32 {
        let committed = self.window_average;
        self.window_count = 0;

        if self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(committed);

        // Weighted by the current history length, so the weighting shifts once
        // the ring starts evicting.
        let len = self.history.len() as f32;
        self.overall_average = ((len - 1.0) * self.overall_average + committed) / len;
        self.magnitude_scale = magnitude_scale(self.overall_average);

        self.lifetime_commits += 1;
        let commits = self.lifetime_commits as f64;
        self.lifetime_average =
            (((commits - 1.0) * self.lifetime_average as f64 + committed as f64) / commits) as f32;

        debug!(
            "Committed {} (history {}/{}, overall {}, scale {})",
            committed,
            self.history.len(),
            self.capacity,
            self.overall_average,
            self.magnitude_scale
        );

        committed
    }

    /// Committed averages, oldest first
    pub fn history(&self) -> &VecDeque<f32> {
        &self.history
    }

    /// Maximum number of committed averages retained
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples in the uncommitted window
    pub fn window_count(&self) -> u32 {
        self.window_count
    }

    /// Mean of the uncommitted window, `None` while it is empty
    pub fn window_average(&self) -> Option<f32> {
        (self.window_count > 0).then_some(self.window_average)
    }

    /// Largest sample ever added (`-inf` before the first sample)
    pub fn running_max(&self) -> f32 {
        self.running_max
    }

    /// Smallest sample ever added (`+inf` before the first sample)
    pub fn running_min(&self) -> f32 {
        self.running_min
    }

    /// Lifetime extrema, `None` before the first sample
    pub fn extrema(&self) -> Option<Extrema> {
        (self.running_max >= self.running_min).then_some(Extrema {
            min: self.running_min,
            max: self.running_max,
        })
    }

    /// Most recent accepted sample
    pub fn last_value(&self) -> Option<f32> {
        self.last_value
    }

    /// History-length-weighted running mean of the committed averages
    pub fn overall_average(&self) -> f32 {
        self.overall_average
    }

    /// Order of magnitude of [`Self::overall_average`]
    pub fn magnitude_scale(&self) -> i32 {
        self.magnitude_scale
    }

    /// Plain mean of every average ever committed, evicted ones included
    pub fn lifetime_average(&self) -> f32 {
        self.lifetime_average
    }

    /// Owned copy of everything the render path needs
    pub fn snapshot(&self) -> SeriesSnapshot {
        SeriesSnapshot {
            history: self.history.iter().copied().collect::<Vec<f32>>(),
            extrema: self.extrema(),
            last_value: self.last_value,
            overall_average: self.overall_average,
            magnitude_scale: self.magnitude_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn history_of(aggregator: &Aggregator) -> Vec<f32> {
        aggregator.history().iter().copied().collect()
    }

    #[test]
    fn test_window_average_is_arithmetic_mean() {
        let mut aggregator = Aggregator::new(10);
        let values = [21.5, 22.0, 23.5, 24.0, 27.0, 30.0, 28.0];

        for value in values {
            aggregator.add(value).unwrap();
        }

        let mean = values.iter().sum::<f32>() / values.len() as f32;
        assert_eq!(aggregator.window_count(), values.len() as u32);
        assert!((aggregator.window_average().unwrap() - mean).abs() < 1e-4);
    }

    #[test]
    fn test_counter_grouped_in_threes() {
        let mut aggregator = Aggregator::new(100);
        let mut counter = 0.0;

        for _ in 0..3 {
            for _ in 0..3 {
                counter += 1.0;
                aggregator.add(counter).unwrap();
            }
            aggregator.commit();
        }

        assert_eq!(history_of(&aggregator), vec![2.0, 5.0, 8.0]);
        assert_eq!(aggregator.overall_average(), 5.0);
        assert_eq!(aggregator.magnitude_scale(), 1);
        assert_eq!(aggregator.window_count(), 0);
        assert_eq!(aggregator.window_average(), None);
    }

    #[test]
    fn test_history_evicts_oldest_at_capacity() {
        let capacity = 5;
        let mut aggregator = Aggregator::new(capacity);

        for i in 0..=capacity {
            aggregator.add(i as f32).unwrap();
            aggregator.commit();
            assert!(aggregator.history().len() <= capacity);
        }

        assert_eq!(aggregator.history().len(), capacity);
        assert_eq!(history_of(&aggregator), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_extrema_are_monotonic() {
        let mut aggregator = Aggregator::new(10);
        let values = [3.0, -1.0, 7.5, 2.0, 7.5, -4.25, 0.0];
        let mut previous_max = f32::NEG_INFINITY;
        let mut previous_min = f32::INFINITY;

        for value in values {
            aggregator.add(value).unwrap();
            assert!(aggregator.running_max() >= previous_max);
            assert!(aggregator.running_min() <= previous_min);
            assert!(aggregator.running_max() >= aggregator.running_min());
            previous_max = aggregator.running_max();
            previous_min = aggregator.running_min();
        }

        assert_eq!(
            aggregator.extrema(),
            Some(Extrema {
                min: -4.25,
                max: 7.5
            })
        );
        assert_eq!(aggregator.last_value(), Some(0.0));
    }

    #[test]
    fn test_invalid_sample_leaves_state_untouched() {
        let mut aggregator = Aggregator::new(10);
        aggregator.add(4.0).unwrap();
        aggregator.commit();
        aggregator.add(6.0).unwrap();

        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let err = aggregator.add(bad).unwrap_err();
            assert!(matches!(err, AggregatorError::InvalidSample { .. }));
        }

        assert_eq!(history_of(&aggregator), vec![4.0]);
        assert_eq!(aggregator.window_count(), 1);
        assert_eq!(aggregator.window_average(), Some(6.0));
        assert_eq!(aggregator.last_value(), Some(6.0));
        assert_eq!(aggregator.running_max(), 6.0);
    }

    #[test]
    fn test_commit_without_samples_duplicates_pending_average() {
        let mut aggregator = Aggregator::new(10);
        aggregator.add(3.0).unwrap();
        aggregator.add(5.0).unwrap();
        aggregator.commit();
        aggregator.commit();

        assert_eq!(history_of(&aggregator), vec![4.0, 4.0]);

        // The stale average does not leak into the next window
        aggregator.add(10.0).unwrap();
        assert_eq!(aggregator.window_average(), Some(10.0));
    }

    #[test]
    fn test_commit_on_fresh_aggregator_does_not_panic() {
        let mut aggregator = Aggregator::new(3);
        assert_eq!(aggregator.commit(), 0.0);
        assert_eq!(aggregator.magnitude_scale(), 0);
        assert_eq!(aggregator.extrema(), None);
    }

    #[test]
    fn test_overall_average_is_weighted_by_history_length() {
        // Capacity 2: the third commit evicts, so the buffer-weighted mean
        // drifts away from the true all-time mean.
        let mut aggregator = Aggregator::new(2);
        for value in [10.0, 20.0, 30.0] {
            aggregator.add(value).unwrap();
            aggregator.commit();
        }

        // 10 -> (1*10 + 20)/2 = 15 -> (1*15 + 30)/2 = 22.5
        assert_eq!(aggregator.overall_average(), 22.5);
        // (10 + 20 + 30) / 3
        assert!((aggregator.lifetime_average() - 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_magnitude_scale() {
        assert_eq!(magnitude_scale(0.0), 0);
        assert_eq!(magnitude_scale(22.4), 2);
        assert_eq!(magnitude_scale(3.7), 1);
        assert_eq!(magnitude_scale(0.5), 0);
        assert_eq!(magnitude_scale(-5.0), 0);
        assert_eq!(magnitude_scale(-0.05), -2);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut aggregator = Aggregator::new(0);
        for value in [1.0, 2.0] {
            aggregator.add(value).unwrap();
            aggregator.commit();
        }
        assert_eq!(aggregator.capacity(), 1);
        assert_eq!(history_of(&aggregator), vec![2.0]);
    }

    #[test]
    fn test_snapshot_copies_committed_state() {
        let mut aggregator = Aggregator::new(4);
        aggregator.add(1.0).unwrap();
        aggregator.add(3.0).unwrap();
        aggregator.commit();

        let snapshot = aggregator.snapshot();
        aggregator.add(50.0).unwrap();
        aggregator.commit();

        assert_eq!(snapshot.history, vec![2.0]);
        assert_eq!(snapshot.extrema, Some(Extrema { min: 1.0, max: 3.0 }));
        assert_eq!(snapshot.last_value, Some(3.0));
        assert_eq!(snapshot.magnitude_scale, 1);
    }
}

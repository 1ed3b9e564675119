//! Sampling task: fast reads, slow commits
//!
//! Every tick reads one sample per channel into its aggregator. Once the
//! commit interval has elapsed since the previous commit, every channel's
//! window average is committed to its history. Read failures and rejected
//! samples are logged and counted; they never reach the render path.

use alloc::boxed::Box;
use alloc::vec::Vec;

use log::{debug, info, warn};

use crate::sensors::{SampleSource, SensorType};
use crate::storage::SharedAggregator;

/// One monitored quantity: where samples come from and where they go
pub struct SamplingChannel<'a> {
    sensor: SensorType,
    source: Box<dyn SampleSource + Send + 'a>,
    aggregator: &'a SharedAggregator,
}

impl<'a> SamplingChannel<'a> {
    pub fn new(
        sensor: SensorType,
        source: impl SampleSource + Send + 'a,
        aggregator: &'a SharedAggregator,
    ) -> Self {
        Self {
            sensor,
            source: Box::new(source),
            aggregator,
        }
    }

    pub fn sensor(&self) -> SensorType {
        self.sensor
    }

    /// Read once and fold the value in. Returns whether it was accepted.
    fn sample(&mut self) -> bool {
        let value = match self.source.read() {
            Ok(value) => value,
            Err(e) => {
                warn!("{}", e);
                return false;
            }
        };

        match self.aggregator.add(value) {
            Ok(()) => true,
            Err(e) => {
                warn!("Discarding {} sample: {}", self.sensor.name(), e);
                false
            }
        }
    }

    fn commit(&self) {
        let committed = self.aggregator.commit();
        let (extrema, count) = self
            .aggregator
            .with(|a| (a.extrema(), a.history().len()));

        match extrema {
            Some(extrema) => info!(
                "{} committed {:.3}{} (min {:.3}, max {:.3}, {} in history)",
                self.sensor.name(),
                committed,
                self.sensor.unit(),
                extrema.min,
                extrema.max,
                count
            ),
            None => info!(
                "{} committed with no samples yet ({} in history)",
                self.sensor.name(),
                count
            ),
        }
    }
}

/// Counters for one [`SamplingTask::tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Samples folded into an aggregator
    pub accepted: usize,
    /// Samples that could not be read or were not finite
    pub rejected: usize,
    /// Whether this tick committed every channel
    pub committed: bool,
}

/// Drives all sampling channels from a caller-supplied clock
pub struct SamplingTask<'a> {
    channels: Vec<SamplingChannel<'a>>,
    commit_interval_secs: u64,
    last_commit_secs: Option<u64>,
}

impl<'a> SamplingTask<'a> {
    /// Create a task committing every `commit_interval_secs` seconds.
    ///
    /// The first tick starts the commit clock; it does not commit.
    pub fn new(commit_interval_secs: u32) -> Self {
        Self {
            channels: Vec::new(),
            commit_interval_secs: commit_interval_secs.max(1) as u64,
            last_commit_secs: None,
        }
    }

    pub fn with_channel(mut self, channel: SamplingChannel<'a>) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn add_channel(&mut self, channel: SamplingChannel<'a>) {
        self.channels.push(channel);
    }

    pub fn channels(&self) -> &[SamplingChannel<'a>] {
        &self.channels
    }

    /// Sample every channel, then commit if the interval has elapsed
    pub fn tick(&mut self, now_secs: u64) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        for channel in &mut self.channels {
            if channel.sample() {
                outcome.accepted += 1;
            } else {
                outcome.rejected += 1;
            }
        }

        let last = *self.last_commit_secs.get_or_insert(now_secs);
        if now_secs.saturating_sub(last) >= self.commit_interval_secs {
            for channel in &self.channels {
                channel.commit();
            }
            self.last_commit_secs = Some(now_secs);
            outcome.committed = true;
        }

        debug!(
            "Sampling tick at {}s: {} accepted, {} rejected",
            now_secs, outcome.accepted, outcome.rejected
        );

        outcome
    }
}

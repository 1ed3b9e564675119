//! Monitor configuration
//!
//! All intervals are in seconds. Defaults match the stock device:
//! sample every 20 s, commit every 10 min, refresh the panel every 20 min.

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::storage::DEFAULT_HISTORY_CAPACITY;
use crate::ui::components::graph::GraphLayout;

/// Default seconds between raw samples
pub const DEFAULT_SAMPLE_INTERVAL_SECS: u32 = 20;

/// Default seconds between commits into the history
pub const DEFAULT_COMMIT_INTERVAL_SECS: u32 = 60 * 10;

/// Default seconds between panel refreshes
pub const DEFAULT_RENDER_INTERVAL_SECS: u32 = 60 * 20;

/// Configuration errors, all fatal at start-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An interval was zero
    #[error("Interval `{name}` must be greater than zero")]
    ZeroInterval {
        /// Field name
        name: &'static str,
    },

    /// Commits happen more often than samples are taken
    #[error("Commit interval ({commit}s) is shorter than the sample interval ({sample}s)")]
    CommitFasterThanSampling {
        /// Commit interval in seconds
        commit: u32,
        /// Sample interval in seconds
        sample: u32,
    },

    /// History capacity was zero
    #[error("History capacity must be at least 1")]
    ZeroHistoryCapacity,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between raw samples
    pub sample_interval_secs: u32,
    /// Seconds between commits of the window average
    pub commit_interval_secs: u32,
    /// Seconds between panel refreshes
    pub render_interval_secs: u32,
    /// Committed averages kept per quantity
    pub history_capacity: usize,
    /// Draw the previous day's values in the alternate color
    pub show_previous_day: bool,
    /// Graph geometry
    pub graph: GraphLayout,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sample_interval_secs: DEFAULT_SAMPLE_INTERVAL_SECS,
            commit_interval_secs: DEFAULT_COMMIT_INTERVAL_SECS,
            render_interval_secs: DEFAULT_RENDER_INTERVAL_SECS,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            show_previous_day: true,
            graph: GraphLayout::default(),
        }
    }
}

impl MonitorConfig {
    /// Check the timing and capacity settings.
    ///
    /// Graph geometry is checked separately against the target surface when
    /// the renderer is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("sample_interval_secs", self.sample_interval_secs),
            ("commit_interval_secs", self.commit_interval_secs),
            ("render_interval_secs", self.render_interval_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroInterval { name });
            }
        }

        if self.commit_interval_secs < self.sample_interval_secs {
            return Err(ConfigError::CommitFasterThanSampling {
                commit: self.commit_interval_secs,
                sample: self.sample_interval_secs,
            });
        }

        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MonitorConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.history_capacity, 100);
        assert_eq!(config.commit_interval_secs, 600);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = MonitorConfig {
            render_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroInterval {
                name: "render_interval_secs"
            })
        );
    }

    #[test]
    fn test_commit_faster_than_sampling_rejected() {
        let config = MonitorConfig {
            sample_interval_secs: 60,
            commit_interval_secs: 30,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CommitFasterThanSampling { .. })
        ));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = MonitorConfig {
            history_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroHistoryCapacity));
    }
}

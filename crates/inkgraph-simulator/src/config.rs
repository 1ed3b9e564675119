//! Simulator configuration file
//!
//! ```toml
//! [monitor]
//! commit_interval_secs = 600
//! history_capacity = 240
//!
//! [monitor.graph]
//! hours_per_column = 2
//!
//! [simulator]
//! output_dir = "frames"
//! frames = 6
//! time_scale = 600.0
//! ```
//!
//! Every field is optional.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use inkgraph::MonitorConfig;
use log::warn;
use serde::Deserialize;

/// Settings that only exist on the desktop
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Where `frame_NNNN.png` files are written
    pub output_dir: PathBuf,
    /// Number of panel refreshes before exiting
    pub frames: u32,
    /// Simulated seconds per real second
    pub time_scale: f64,
    /// Commits of synthetic history loaded before the first frame
    pub warmup_commits: u32,
    /// Every n-th live reading fails or is NaN (0 disables)
    pub dropout_every: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("frames"),
            frames: 6,
            time_scale: 600.0,
            warmup_commits: 96,
            dropout_every: 0,
        }
    }
}

/// Whole configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub monitor: MonitorConfig,
    pub simulator: SimulatorConfig,
}

impl ConfigFile {
    /// Parse and validate TOML text
    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("TOML parse error")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.monitor.validate().map_err(|e| anyhow!("{e}"))?;

        if self.simulator.frames == 0 {
            bail!("simulator.frames must be at least 1");
        }
        if !(self.simulator.time_scale.is_finite() && self.simulator.time_scale > 0.0) {
            bail!(
                "simulator.time_scale must be a positive number, got {}",
                self.simulator.time_scale
            );
        }

        Ok(())
    }
}

/// Load configuration from `path`, or the defaults if no path was given or
/// the file does not exist.
pub fn load(path: Option<&Path>) -> Result<ConfigFile> {
    let Some(path) = path else {
        return Ok(ConfigFile::default());
    };

    if !path.exists() {
        warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(ConfigFile::default());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read '{}'", path.display()))?;
    ConfigFile::parse(&raw).with_context(|| format!("invalid config '{}'", path.display()))
}

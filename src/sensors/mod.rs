//! Sensor boundary: where raw readings enter the pipeline
//!
//! The actual ADC / voltage-divider conversions live with the hardware
//! bring-up code. This module only defines what the sampling task needs from
//! them.

use thiserror_no_std::Error;

/// Failure reported by a sample source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SensorError {
    /// The underlying hardware read failed
    #[error("Failed to read {sensor}: {details}")]
    ReadFailed {
        /// Sensor name
        sensor: &'static str,
        /// What went wrong
        details: &'static str,
    },
}

/// Anything that can produce one instantaneous reading on demand.
pub trait SampleSource {
    /// Take a single reading
    fn read(&mut self) -> Result<f32, SensorError>;
}

impl<F> SampleSource for F
where
    F: FnMut() -> f32,
{
    fn read(&mut self) -> Result<f32, SensorError> {
        Ok(self())
    }
}

/// Quantities the monitor knows how to label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorType {
    /// On-die temperature in °C
    Temperature,
    /// Battery / system input voltage in V
    BatteryVoltage,
}

impl SensorType {
    /// Short name for logs
    pub const fn name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::BatteryVoltage => "battery",
        }
    }

    /// Unit suffix shown next to the latest reading
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::BatteryVoltage => "V",
        }
    }
}

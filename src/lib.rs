#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod config;
pub mod display_manager;
pub mod framebuffer;
pub mod sampling;
pub mod sensors;
pub mod storage;
pub mod ui;

pub use config::{ConfigError, MonitorConfig};
pub use display_manager::{DisplayDriver, DisplayError, DisplayManager};
pub use framebuffer::MonoFrameBuffer;
pub use sampling::{SamplingChannel, SamplingTask, TickOutcome};
pub use sensors::{SampleSource, SensorError, SensorType};
pub use storage::{Aggregator, AggregatorError, SeriesSnapshot, SharedAggregator};

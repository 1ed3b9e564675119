//! Desktop simulator for the inkgraph e-paper monitor.
//!
//! Runs the sampling task and the render task on two threads against
//! synthetic temperature and battery signals, on an accelerated clock. Each
//! panel refresh is written out as a PNG (black and red ink on white).
//!
//! ```text
//! RUST_LOG=info inkgraph-simulator [config.toml]
//! ```

mod config;

use std::f64::consts::TAU;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Datelike, Local, TimeDelta, Timelike};
use embedded_graphics::pixelcolor::{BinaryColor, Rgb888};
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use log::{debug, error, info};

use inkgraph::sensors::{SampleSource, SensorError};
use inkgraph::storage::SharedAggregator;
use inkgraph::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, LocalTime};
use inkgraph::{
    DisplayDriver, DisplayManager, MonoFrameBuffer, SamplingChannel, SamplingTask, SensorType,
};

use crate::config::ConfigFile;

// ---------------------------------------------------------------------------
// Simulated clock
// ---------------------------------------------------------------------------

/// Wall clock running `time_scale` times faster than real time.
struct SimClock {
    start_local: DateTime<Local>,
    start: Instant,
    time_scale: f64,
}

impl SimClock {
    fn new(time_scale: f64) -> Self {
        Self {
            start_local: Local::now(),
            start: Instant::now(),
            time_scale,
        }
    }

    /// Simulated seconds since start
    fn elapsed_secs_f64(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * self.time_scale
    }

    fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs_f64() as u64
    }

    fn now(&self) -> DateTime<Local> {
        let elapsed = TimeDelta::milliseconds((self.elapsed_secs_f64() * 1000.0) as i64);
        self.start_local + elapsed
    }

    /// Simulated seconds since local midnight of the start day, at `offset`
    /// simulated seconds from start (negative for the past)
    fn day_secs_at(&self, offset: f64) -> f64 {
        self.start_local.num_seconds_from_midnight() as f64 + offset
    }

    fn local_time(&self) -> LocalTime {
        let now = self.now();
        LocalTime::new(
            now.year().clamp(0, u16::MAX as i32) as u16,
            now.month() as u8,
            now.day() as u8,
            now.hour() as u8,
            now.minute() as u8,
            now.second() as u8,
        )
    }

    /// Sleep for `secs` simulated seconds
    fn pause(&self, secs: u32) {
        std::thread::sleep(Duration::from_secs_f64(secs as f64 / self.time_scale));
    }
}

// ---------------------------------------------------------------------------
// Mock data generation
// ---------------------------------------------------------------------------

/// Room temperature: daily swing peaking mid-afternoon, plus a little noise.
fn temperature_at(day_secs: f64) -> f32 {
    let daily = (TAU * (day_secs - 9.0 * 3600.0) / 86_400.0).sin();
    (19.0 + 3.5 * daily + 0.3 * (day_secs / 731.0).sin()) as f32
}

/// Battery voltage: slow three-day cycle with ripple.
fn battery_at(day_secs: f64) -> f32 {
    let cycle = (TAU * day_secs / (3.0 * 86_400.0)).cos();
    (3.95 + 0.2 * cycle + 0.004 * (day_secs / 311.0).sin()) as f32
}

/// Live reading from a synthetic signal, with optional periodic dropouts.
struct SyntheticSensor<'a> {
    sensor: SensorType,
    signal: fn(f64) -> f32,
    clock: &'a SimClock,
    dropout_every: u32,
    reads: u32,
}

impl<'a> SyntheticSensor<'a> {
    fn new(
        sensor: SensorType,
        signal: fn(f64) -> f32,
        clock: &'a SimClock,
        dropout_every: u32,
    ) -> Self {
        Self {
            sensor,
            signal,
            clock,
            dropout_every,
            reads: 0,
        }
    }
}

impl SampleSource for SyntheticSensor<'_> {
    fn read(&mut self) -> Result<f32, SensorError> {
        self.reads = self.reads.wrapping_add(1);
        if self.dropout_every > 0 && self.reads % self.dropout_every == 0 {
            // Alternate between a failed read and a garbage value
            if (self.reads / self.dropout_every) % 2 == 0 {
                return Err(SensorError::ReadFailed {
                    sensor: self.sensor.name(),
                    details: "simulated dropout",
                });
            }
            return Ok(f32::NAN);
        }

        let day_secs = self.clock.day_secs_at(self.clock.elapsed_secs_f64());
        Ok((self.signal)(day_secs))
    }
}

/// Fill an aggregator with `commits` windows of synthetic history ending at
/// the simulator start.
fn warm_up(
    aggregator: &SharedAggregator,
    signal: fn(f64) -> f32,
    clock: &SimClock,
    commits: u32,
    sample_interval_secs: u32,
    commit_interval_secs: u32,
) {
    let samples_per_commit = (commit_interval_secs / sample_interval_secs).max(1);

    for commit in 0..commits {
        let window_start = -(((commits - commit) as f64) * commit_interval_secs as f64);
        for sample in 0..samples_per_commit {
            let offset = window_start + (sample * sample_interval_secs) as f64;
            // Synthetic signals are always finite
            let _ = aggregator.add(signal(clock.day_secs_at(offset)));
        }
        aggregator.commit();
    }
}

// ---------------------------------------------------------------------------
// PNG panel
// ---------------------------------------------------------------------------

/// Display driver that composites both ink layers and saves a PNG per refresh.
struct PngPanel {
    output_dir: PathBuf,
    display: SimulatorDisplay<Rgb888>,
    frame: u32,
}

impl PngPanel {
    fn new(output_dir: &Path, size: Size) -> Result<Self> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("cannot create '{}'", output_dir.display()))?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            display: SimulatorDisplay::new(size),
            frame: 0,
        })
    }
}

impl DisplayDriver for PngPanel {
    type Error = anyhow::Error;

    fn refresh(&mut self, black: &MonoFrameBuffer, red: &MonoFrameBuffer) -> Result<()> {
        self.display.clear(Rgb888::WHITE)?;

        let size = black.size();
        let pixels = (0..size.height as i32)
            .flat_map(|y| (0..size.width as i32).map(move |x| Point::new(x, y)))
            .filter_map(|point| {
                // Red ink wins where both layers are set
                if red.pixel(point) == Some(BinaryColor::On) {
                    Some(Pixel(point, Rgb888::RED))
                } else if black.pixel(point) == Some(BinaryColor::On) {
                    Some(Pixel(point, Rgb888::BLACK))
                } else {
                    None
                }
            });
        self.display.draw_iter(pixels)?;

        let path = self.output_dir.join(format!("frame_{:04}.png", self.frame));
        self.display
            .to_rgb_output_image(&OutputSettingsBuilder::new().build())
            .save_png(&path)
            .with_context(|| format!("cannot write '{}'", path.display()))?;

        info!("Wrote {}", path.display());
        self.frame += 1;
        Ok(())
    }

    fn sleep(&mut self) -> Result<()> {
        debug!("Panel asleep");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let ConfigFile { monitor, simulator } = config::load(config_path.as_deref())?;

    info!("Starting inkgraph simulator");
    info!(
        "Panel {}x{}, {}x time, {} frames into '{}'",
        DISPLAY_WIDTH_PX,
        DISPLAY_HEIGHT_PX,
        simulator.time_scale,
        simulator.frames,
        simulator.output_dir.display()
    );

    let panel_size = Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX);
    let panel = PngPanel::new(&simulator.output_dir, panel_size)?;
    let mut manager = DisplayManager::from_config(
        panel,
        &monitor,
        panel_size,
        [SensorType::Temperature, SensorType::BatteryVoltage],
    )
    .map_err(|e| anyhow!("{e}"))?;

    let clock = SimClock::new(simulator.time_scale);
    let temperature = SharedAggregator::new(monitor.history_capacity);
    let battery = SharedAggregator::new(monitor.history_capacity);

    for (aggregator, signal) in [
        (&temperature, temperature_at as fn(f64) -> f32),
        (&battery, battery_at as fn(f64) -> f32),
    ] {
        warm_up(
            aggregator,
            signal,
            &clock,
            simulator.warmup_commits,
            monitor.sample_interval_secs,
            monitor.commit_interval_secs,
        );
    }
    info!("Loaded {} commits of history", simulator.warmup_commits);

    let stop = AtomicBool::new(false);

    std::thread::scope(|scope| {
        scope.spawn(|| {
            let mut task = SamplingTask::new(monitor.commit_interval_secs)
                .with_channel(SamplingChannel::new(
                    SensorType::Temperature,
                    SyntheticSensor::new(
                        SensorType::Temperature,
                        temperature_at,
                        &clock,
                        simulator.dropout_every,
                    ),
                    &temperature,
                ))
                .with_channel(SamplingChannel::new(
                    SensorType::BatteryVoltage,
                    SyntheticSensor::new(
                        SensorType::BatteryVoltage,
                        battery_at,
                        &clock,
                        simulator.dropout_every,
                    ),
                    &battery,
                ));

            info!("Sampling task started");
            while !stop.load(Ordering::Relaxed) {
                task.tick(clock.elapsed_secs());
                clock.pause(monitor.sample_interval_secs);
            }
            info!("Sampling task stopped");
        });

        info!("Render task started");
        for frame in 0..simulator.frames {
            if frame > 0 {
                clock.pause(monitor.render_interval_secs);
            }

            // A failed frame is logged; sampling keeps running
            match manager.render(&temperature, &battery, &clock.local_time()) {
                Ok(stats) => debug!("Frame stats: {:?}", stats),
                Err(e) => error!("Render failed: {e}"),
            }
        }

        stop.store(true, Ordering::Relaxed);
    });

    info!(
        "Simulator exiting after {} frames",
        manager.frames_rendered()
    );
    Ok(())
}

//! Display manager: one full render pass per call
//!
//! A render pass:
//! - copies a snapshot out of each shared aggregator (lock held only for the copy)
//! - clears both ink layers and draws header and graph into RAM
//! - hands both layers to the panel driver, then puts the panel to sleep
//!
//! The pass always runs to completion; partial frames are never sent.

use core::convert::Infallible;
use core::fmt::Debug;

use embedded_graphics::prelude::*;
use log::{debug, info};
use thiserror_no_std::Error;

use crate::config::MonitorConfig;
use crate::framebuffer::MonoFrameBuffer;
use crate::sensors::SensorType;
use crate::storage::{SeriesSnapshot, SharedAggregator};
use crate::ui::components::graph::{FrameStats, GraphRenderer, GraphResult};
use crate::ui::components::{Header, Reading};
use crate::ui::core::{LocalTime, Surfaces};
use crate::ui::styling::ColorChannel;

/// The panel hardware, seen from the render task.
///
/// Both calls block until the panel is done.
pub trait DisplayDriver {
    /// Driver-specific failure
    type Error: Debug;

    /// Send both layers and trigger a full refresh
    fn refresh(&mut self, black: &MonoFrameBuffer, red: &MonoFrameBuffer)
    -> Result<(), Self::Error>;

    /// Enter low-power mode until the next refresh
    fn sleep(&mut self) -> Result<(), Self::Error>;
}

/// Error from a render pass
#[derive(Debug, Error)]
pub enum DisplayError<E> {
    /// The panel rejected the frame
    #[error("Display refresh failed: {0:?}")]
    Refresh(E),

    /// The panel could not be put to sleep
    #[error("Display sleep failed: {0:?}")]
    Sleep(E),
}

/// Owns the panel driver, both ink layers and the graph renderer
pub struct DisplayManager<Drv: DisplayDriver> {
    driver: Drv,
    black: MonoFrameBuffer,
    red: MonoFrameBuffer,
    renderer: GraphRenderer,
    header: Header,
    sensors: [SensorType; 2],
    frames: u32,
}

impl<Drv: DisplayDriver> DisplayManager<Drv> {
    /// `sensors` names series A and series B, in that order.
    pub fn new(driver: Drv, renderer: GraphRenderer, sensors: [SensorType; 2]) -> Self {
        let size = renderer.surface_size();
        Self {
            driver,
            black: MonoFrameBuffer::new(size),
            red: MonoFrameBuffer::new(size),
            renderer,
            header: Header::default(),
            sensors,
            frames: 0,
        }
    }

    /// Validate the graph configuration against a panel of `size`
    pub fn from_config(
        driver: Drv,
        config: &MonitorConfig,
        size: Size,
        sensors: [SensorType; 2],
    ) -> GraphResult<Self> {
        let renderer = GraphRenderer::from_config(config, size)?;
        Ok(Self::new(driver, renderer, sensors))
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    pub fn driver(&self) -> &Drv {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut Drv {
        &mut self.driver
    }

    pub fn renderer(&self) -> &GraphRenderer {
        &self.renderer
    }

    /// Black layer of the last composed frame
    pub fn black(&self) -> &MonoFrameBuffer {
        &self.black
    }

    /// Red layer of the last composed frame
    pub fn red(&self) -> &MonoFrameBuffer {
        &self.red
    }

    /// Frames successfully sent to the panel
    pub fn frames_rendered(&self) -> u32 {
        self.frames
    }

    /// Snapshot both aggregators and render them
    pub fn render(
        &mut self,
        series_a: &SharedAggregator,
        series_b: &SharedAggregator,
        now: &LocalTime,
    ) -> Result<FrameStats, DisplayError<Drv::Error>> {
        let a = series_a.snapshot();
        let b = series_b.snapshot();
        self.render_snapshots(&a, &b, now)
    }

    /// Compose a frame from snapshots and push it to the panel
    pub fn render_snapshots(
        &mut self,
        series_a: &SeriesSnapshot,
        series_b: &SeriesSnapshot,
        now: &LocalTime,
    ) -> Result<FrameStats, DisplayError<Drv::Error>> {
        let stats = match self.compose(series_a, series_b, now) {
            Ok(stats) => stats,
            Err(never) => match never {},
        };

        debug!(
            "Frame composed: {} black / {} red pixels",
            self.black.ink_pixel_count(),
            self.red.ink_pixel_count()
        );

        self.driver
            .refresh(&self.black, &self.red)
            .map_err(DisplayError::Refresh)?;
        self.driver.sleep().map_err(DisplayError::Sleep)?;

        self.frames += 1;
        info!(
            "Frame {} at {}: {} + {} points",
            self.frames, now, stats.series_a.today.markers, stats.series_b.today.markers
        );

        Ok(stats)
    }

    fn compose(
        &mut self,
        series_a: &SeriesSnapshot,
        series_b: &SeriesSnapshot,
        now: &LocalTime,
    ) -> Result<FrameStats, Infallible> {
        let mut surfaces = Surfaces::new(&mut self.black, &mut self.red);
        surfaces.clear()?;

        let scaler_a = self.renderer.scaler(series_a);
        let scaler_b = self.renderer.scaler(series_b);
        let readings = [
            Reading::from_snapshot(series_a, &scaler_a, self.sensors[0].unit()),
            Reading::from_snapshot(series_b, &scaler_b, self.sensors[1].unit()),
        ];
        self.header
            .draw(surfaces.channel(ColorChannel::Black), now, &readings)?;

        self.renderer.draw(&mut surfaces, series_a, series_b, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
    use alloc::vec::Vec;

    const PANEL: Size = Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX);

    #[derive(Default)]
    struct RecordingDriver {
        refreshes: Vec<(usize, usize)>,
        sleeps: u32,
        fail_next_refresh: bool,
    }

    impl DisplayDriver for RecordingDriver {
        type Error = &'static str;

        fn refresh(
            &mut self,
            black: &MonoFrameBuffer,
            red: &MonoFrameBuffer,
        ) -> Result<(), Self::Error> {
            if core::mem::take(&mut self.fail_next_refresh) {
                return Err("busy line stuck");
            }
            self.refreshes
                .push((black.ink_pixel_count(), red.ink_pixel_count()));
            Ok(())
        }

        fn sleep(&mut self) -> Result<(), Self::Error> {
            self.sleeps += 1;
            Ok(())
        }
    }

    fn manager() -> DisplayManager<RecordingDriver> {
        DisplayManager::from_config(
            RecordingDriver::default(),
            &MonitorConfig::default(),
            PANEL,
            [SensorType::Temperature, SensorType::BatteryVoltage],
        )
        .unwrap()
    }

    fn now() -> LocalTime {
        LocalTime::new(2024, 2, 29, 23, 50, 0)
    }

    #[test]
    fn test_render_refreshes_then_sleeps() {
        let temperature = SharedAggregator::new(100);
        let battery = SharedAggregator::new(100);
        for i in 0..10 {
            temperature.add(20.0 + i as f32 * 0.5).unwrap();
            battery.add(4.2 - i as f32 * 0.01).unwrap();
            temperature.commit();
            battery.commit();
        }

        let mut manager = manager();
        let stats = manager.render(&temperature, &battery, &now()).unwrap();

        assert_eq!(stats.series_a.today.markers, 10);
        assert_eq!(stats.series_b.today.markers, 10);
        assert_eq!(manager.driver().refreshes.len(), 1);
        assert_eq!(manager.driver().sleeps, 1);
        assert_eq!(manager.frames_rendered(), 1);

        let (black, red) = manager.driver().refreshes[0];
        assert!(black > 0 && red > 0);
    }

    #[test]
    fn test_render_with_no_data_still_refreshes() {
        let empty = SharedAggregator::new(100);
        let mut manager = manager();

        let stats = manager.render(&empty, &empty, &now()).unwrap();
        assert_eq!(stats.series_a.today.markers, 0);
        assert_eq!(manager.driver().refreshes.len(), 1);
    }

    #[test]
    fn test_frames_do_not_accumulate_ink() {
        let temperature = SharedAggregator::new(100);
        temperature.add(21.0).unwrap();
        temperature.commit();
        let battery = SharedAggregator::new(100);

        let mut manager = manager();
        manager.render(&temperature, &battery, &now()).unwrap();
        manager.render(&temperature, &battery, &now()).unwrap();

        let refreshes = &manager.driver().refreshes;
        assert_eq!(refreshes[0], refreshes[1]);
    }

    #[test]
    fn test_driver_failure_does_not_poison_later_frames() {
        let series = SharedAggregator::new(100);
        series.add(3.3).unwrap();
        series.commit();

        let mut manager = manager();
        manager.driver_mut().fail_next_refresh = true;

        let first = manager.render(&series, &series, &now());
        assert!(matches!(first, Err(DisplayError::Refresh("busy line stuck"))));
        assert_eq!(manager.frames_rendered(), 0);
        assert_eq!(manager.driver().sleeps, 0);

        // Sampling carries on regardless
        series.add(3.4).unwrap();
        assert_eq!(series.snapshot().history.len(), 1);

        assert!(manager.render(&series, &series, &now()).is_ok());
        assert_eq!(manager.frames_rendered(), 1);
    }

    #[test]
    fn test_undersized_panel_rejected() {
        let result = DisplayManager::from_config(
            RecordingDriver::default(),
            &MonitorConfig::default(),
            Size::new(320, 240),
            [SensorType::Temperature, SensorType::BatteryVoltage],
        );
        assert!(result.is_err());
    }
}

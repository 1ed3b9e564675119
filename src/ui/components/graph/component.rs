//! Graph renderer: frame layout, then series overlay
//!
//! The renderer holds only validated configuration. Scalers and "last point"
//! trackers are rebuilt on every call, so a render never depends on the
//! previous one.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use log::{debug, warn};

use super::axis::{draw_hour_labels, draw_value_labels};
use super::grid::draw_grid;
use super::layout::{GraphLayout, PlotGeometry};
use super::scaler::SeriesScaler;
use super::series::{PlotStats, plot_series};
use super::GraphResult;
use crate::config::MonitorConfig;
use crate::storage::SeriesSnapshot;
use crate::ui::core::{LocalTime, Surfaces};
use crate::ui::styling::ColorChannel;

/// Layer series A (left labels) is drawn on
pub const SERIES_A_CHANNEL: ColorChannel = ColorChannel::Red;

/// Layer series B (right labels) is drawn on
pub const SERIES_B_CHANNEL: ColorChannel = ColorChannel::Black;

/// What one full frame drew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Series A plot
    pub series_a: PlotStats,
    /// Series B plot
    pub series_b: PlotStats,
    /// Column that carries the `HH:MM` label
    pub now_column: u32,
}

/// Draws the dual-series graph onto a pair of ink layers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphRenderer {
    layout: GraphLayout,
    geometry: PlotGeometry,
    show_previous_day: bool,
    surface: Size,
}

impl GraphRenderer {
    /// Validate the layout against the target surface and build a renderer
    ///
    /// # Errors
    ///
    /// - [`GraphError::SurfaceTooSmall`](super::GraphError::SurfaceTooSmall)
    ///   if the grid extends past `surface`
    /// - [`GraphError::InvalidGeometry`](super::GraphError::InvalidGeometry)
    ///   for empty grids or zero-sized cells
    /// - [`GraphError::InvalidCommitInterval`](super::GraphError::InvalidCommitInterval)
    ///   if not even one commit fits in a column
    pub fn new(
        layout: GraphLayout,
        commit_interval_secs: u32,
        show_previous_day: bool,
        surface: Size,
    ) -> GraphResult<Self> {
        layout.validate(surface)?;
        let geometry = PlotGeometry::new(&layout, commit_interval_secs)?;

        debug!(
            "Graph: {}x{} cells, {} commits per cell, now at column {}",
            layout.column_count,
            layout.row_count,
            geometry.data_count_per_cell(),
            layout.now_column()
        );

        Ok(Self {
            layout,
            geometry,
            show_previous_day,
            surface,
        })
    }

    /// Build a renderer from the monitor configuration
    pub fn from_config(config: &MonitorConfig, surface: Size) -> GraphResult<Self> {
        let renderer = Self::new(
            config.graph,
            config.commit_interval_secs,
            config.show_previous_day,
            surface,
        )?;

        if config.show_previous_day && !renderer.geometry.previous_day_fits(config.history_capacity) {
            warn!(
                "History of {} commits never reaches the previous day ({:?} commits back); overlay stays empty",
                config.history_capacity,
                renderer.geometry.previous_day_offset()
            );
        }

        Ok(renderer)
    }

    /// Grid geometry this renderer draws
    pub fn layout(&self) -> &GraphLayout {
        &self.layout
    }

    /// Horizontal placement of committed values
    pub fn geometry(&self) -> &PlotGeometry {
        &self.geometry
    }

    /// Surface size the renderer was validated against
    pub fn surface_size(&self) -> Size {
        self.surface
    }

    /// Scaler for one series on this grid
    pub fn scaler(&self, snapshot: &SeriesSnapshot) -> SeriesScaler {
        SeriesScaler::new(snapshot, self.layout.cell_height, self.layout.margin_top)
    }

    /// Gridlines, value labels for both series and hour labels
    ///
    /// Returns the column that received the current time.
    pub fn draw_frame<D: DrawTarget<Color = BinaryColor>>(
        &self,
        surfaces: &mut Surfaces<'_, D>,
        series_a: &SeriesScaler,
        series_b: &SeriesScaler,
        now: &LocalTime,
    ) -> Result<u32, D::Error> {
        draw_grid(&self.layout, surfaces.channel(ColorChannel::Black))?;
        draw_value_labels(
            &self.layout,
            series_a,
            series_b,
            self.surface.width,
            surfaces.channel(ColorChannel::Black),
        )?;
        draw_hour_labels(&self.layout, now, surfaces)
    }

    /// Markers and segments for one series in `channel`
    pub fn plot_series<D: DrawTarget<Color = BinaryColor>>(
        &self,
        surfaces: &mut Surfaces<'_, D>,
        scaler: &SeriesScaler,
        snapshot: &SeriesSnapshot,
        channel: ColorChannel,
    ) -> Result<PlotStats, D::Error> {
        plot_series(
            &self.geometry,
            scaler,
            snapshot,
            channel,
            self.show_previous_day,
            surfaces,
        )
    }

    /// Draw the whole graph for two series
    pub fn draw<D: DrawTarget<Color = BinaryColor>>(
        &self,
        surfaces: &mut Surfaces<'_, D>,
        series_a: &SeriesSnapshot,
        series_b: &SeriesSnapshot,
        now: &LocalTime,
    ) -> Result<FrameStats, D::Error> {
        let scaler_a = self.scaler(series_a);
        let scaler_b = self.scaler(series_b);

        let now_column = self.draw_frame(surfaces, &scaler_a, &scaler_b, now)?;
        let stats_a = self.plot_series(surfaces, &scaler_a, series_a, SERIES_A_CHANNEL)?;
        let stats_b = self.plot_series(surfaces, &scaler_b, series_b, SERIES_B_CHANNEL)?;

        debug!(
            "Plotted {} + {} markers",
            stats_a.today.markers, stats_b.today.markers
        );

        Ok(FrameStats {
            series_a: stats_a,
            series_b: stats_b,
            now_column,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::MonoFrameBuffer;
    use crate::storage::Extrema;
    use crate::ui::components::graph::{GraphError, PassStats};
    use crate::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
    use alloc::vec::Vec;

    const PANEL: Size = Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX);

    fn renderer(show_previous_day: bool) -> GraphRenderer {
        GraphRenderer::new(GraphLayout::default(), 600, show_previous_day, PANEL).unwrap()
    }

    fn snapshot(history: Vec<f32>, min: f32, max: f32) -> SeriesSnapshot {
        SeriesSnapshot {
            last_value: history.last().copied(),
            history,
            extrema: Some(Extrema { min, max }),
            overall_average: (min + max) / 2.0,
            magnitude_scale: 2,
        }
    }

    fn now() -> LocalTime {
        LocalTime::new(2024, 6, 1, 13, 45, 10)
    }

    #[test]
    fn test_surface_too_small_at_construction() {
        let result = GraphRenderer::new(GraphLayout::default(), 600, true, Size::new(400, 300));
        assert!(matches!(result, Err(GraphError::SurfaceTooSmall { .. })));
    }

    #[test]
    fn test_invalid_commit_interval_at_construction() {
        let result = GraphRenderer::new(GraphLayout::default(), 0, true, PANEL);
        assert!(matches!(
            result,
            Err(GraphError::InvalidCommitInterval { secs: 0 })
        ));
    }

    #[test]
    fn test_empty_history_draws_frame_only() {
        let mut black = MonoFrameBuffer::new(PANEL);
        let mut red = MonoFrameBuffer::new(PANEL);
        let mut surfaces = Surfaces::new(&mut black, &mut red);

        let empty = SeriesSnapshot::default();
        let stats = renderer(true)
            .draw(&mut surfaces, &empty, &empty, &now())
            .unwrap();

        assert_eq!(stats.series_a.today.markers, 0);
        assert_eq!(stats.series_b.today.markers, 0);
        assert_eq!(stats.now_column, 8);

        // Grid corners and an inner intersection
        for point in [(40, 130), (760, 130), (40, 450), (760, 450), (360, 290)] {
            assert_eq!(
                black.pixel(Point::new(point.0, point.1)),
                Some(BinaryColor::On),
                "gridline missing at {point:?}"
            );
        }
        // Inside a cell
        assert_eq!(black.pixel(Point::new(80, 170)), Some(BinaryColor::Off));
    }

    #[test]
    fn test_now_label_is_the_only_red_ink_without_data() {
        let mut black = MonoFrameBuffer::new(PANEL);
        let mut red = MonoFrameBuffer::new(PANEL);
        let mut surfaces = Surfaces::new(&mut black, &mut red);

        let empty = SeriesSnapshot::default();
        renderer(true)
            .draw(&mut surfaces, &empty, &empty, &now())
            .unwrap();

        assert!(red.ink_pixel_count() > 0);
        let now_x = GraphLayout::default().column_x(8);
        for y in 0..DISPLAY_HEIGHT_PX as i32 {
            for x in 0..DISPLAY_WIDTH_PX as i32 {
                if red.pixel(Point::new(x, y)) == Some(BinaryColor::On) {
                    assert!(y < 130, "red ink below the top gridline at ({x}, {y})");
                    assert!((x - now_x).abs() < 30, "red ink away from now column at x={x}");
                }
            }
        }
    }

    #[test]
    fn test_short_history_plots_only_available_points() {
        let mut black = MonoFrameBuffer::new(PANEL);
        let mut red = MonoFrameBuffer::new(PANEL);
        let mut surfaces = Surfaces::new(&mut black, &mut red);

        let a = snapshot((0..5).map(|i| 20.0 + i as f32).collect(), 10.0, 30.0);
        let b = snapshot(Vec::from([4.0, 4.1]), 3.9, 4.2);
        let stats = renderer(true).draw(&mut surfaces, &a, &b, &now()).unwrap();

        assert_eq!(stats.series_a.today.markers, 5);
        assert_eq!(stats.series_a.today.segments, 4);
        assert_eq!(stats.series_b.today.markers, 2);
        assert_eq!(stats.series_b.today.segments, 1);
        assert_eq!(stats.series_a.previous_day.map(|p| p.markers), Some(0));
    }

    #[test]
    fn test_newest_value_lands_on_now_column() {
        let mut black = MonoFrameBuffer::new(PANEL);
        let mut red = MonoFrameBuffer::new(PANEL);
        let mut surfaces = Surfaces::new(&mut black, &mut red);

        // zero row 450, 8 px per unit: 20.0 -> row 290
        let a = snapshot(Vec::from([20.0]), 10.0, 30.0);
        let empty = SeriesSnapshot::default();
        renderer(false)
            .draw(&mut surfaces, &a, &empty, &now())
            .unwrap();

        assert_eq!(red.pixel(Point::new(680, 290)), Some(BinaryColor::On));
        assert_eq!(red.pixel(Point::new(680, 300)), Some(BinaryColor::Off));
    }

    #[test]
    fn test_previous_day_overlay_needs_a_day_of_history() {
        let mut black = MonoFrameBuffer::new(PANEL);
        let mut red = MonoFrameBuffer::new(PANEL);
        let mut surfaces = Surfaces::new(&mut black, &mut red);

        // 150 commits: 97 positions today, offsets 144..=149 yesterday
        let history: Vec<f32> = (0..150).map(|i| 15.0 + (i % 10) as f32).collect();
        let a = snapshot(history, 15.0, 24.0);
        let empty = SeriesSnapshot::default();

        let with_overlay = renderer(true)
            .draw(&mut surfaces, &a, &empty, &now())
            .unwrap();
        assert_eq!(with_overlay.series_a.today.markers, 97);
        assert_eq!(
            with_overlay.series_a.previous_day,
            Some(PassStats {
                markers: 6,
                segments: 5
            })
        );

        let without = renderer(false)
            .draw(&mut surfaces, &a, &empty, &now())
            .unwrap();
        assert_eq!(without.series_a.previous_day, None);
    }
}

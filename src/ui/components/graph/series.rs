//! Series plotting: markers joined by straight segments
//!
//! Positions run from column 0 to the "now" column. Each position looks up
//! the committed value a fixed number of commits back from the newest one;
//! missing history is skipped, never padded.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};

use super::constants::{MARKER_RADIUS_PX, SEGMENT_WIDTH_PX};
use super::layout::PlotGeometry;
use super::scaler::SeriesScaler;
use crate::storage::SeriesSnapshot;
use crate::ui::INK;
use crate::ui::core::Surfaces;
use crate::ui::styling::ColorChannel;

/// What one pass over the positions drew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Filled circles drawn
    pub markers: usize,
    /// Segments joining consecutive markers
    pub segments: usize,
}

/// What plotting one series drew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlotStats {
    /// Today's values in the series color
    pub today: PassStats,
    /// Yesterday's values in the alternate color, if that overlay ran
    pub previous_day: Option<PassStats>,
}

/// One pass over the x positions with its own "last point" tracker
struct Trace {
    channel: ColorChannel,
    offset: usize,
    last: Option<Point>,
    stats: PassStats,
}

impl Trace {
    fn new(channel: ColorChannel, offset: usize) -> Self {
        Self {
            channel,
            offset,
            last: None,
            stats: PassStats::default(),
        }
    }

    fn visit<D: DrawTarget<Color = BinaryColor>>(
        &mut self,
        x: i32,
        index: usize,
        snapshot: &SeriesSnapshot,
        scaler: &SeriesScaler,
        surfaces: &mut Surfaces<'_, D>,
    ) -> Result<(), D::Error> {
        let Some(value) = index
            .checked_add(self.offset)
            .and_then(|index| snapshot.from_newest(index))
        else {
            return Ok(());
        };

        let point = Point::new(x, scaler.map_value_to_pixel_row(value));
        let display = surfaces.channel(self.channel);

        Circle::with_center(point, MARKER_RADIUS_PX * 2)
            .into_styled(PrimitiveStyle::with_fill(INK))
            .draw(display)?;
        self.stats.markers += 1;

        if let Some(last) = self.last {
            Line::new(last, point)
                .into_styled(PrimitiveStyle::with_stroke(INK, SEGMENT_WIDTH_PX))
                .draw(display)?;
            self.stats.segments += 1;
        }
        self.last = Some(point);

        Ok(())
    }
}

/// Plot one series, plus yesterday's values in the alternate color when
/// `show_previous_day` is set.
pub(super) fn plot_series<D: DrawTarget<Color = BinaryColor>>(
    geometry: &PlotGeometry,
    scaler: &SeriesScaler,
    snapshot: &SeriesSnapshot,
    channel: ColorChannel,
    show_previous_day: bool,
    surfaces: &mut Surfaces<'_, D>,
) -> Result<PlotStats, D::Error> {
    let mut today = Trace::new(channel, 0);
    let mut previous_day = geometry
        .previous_day_offset()
        .filter(|_| show_previous_day)
        .map(|offset| Trace::new(channel.alternate(), offset));

    for (x, index) in geometry.positions() {
        today.visit(x, index, snapshot, scaler, surfaces)?;
        if let Some(trace) = previous_day.as_mut() {
            trace.visit(x, index, snapshot, scaler, surfaces)?;
        }
    }

    Ok(PlotStats {
        today: today.stats,
        previous_day: previous_day.map(|trace| trace.stats),
    })
}

//! Header line: current date/time and the latest reading of each series

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Baseline;
use heapless::String;

use super::graph::SeriesScaler;
use super::text::{Label, PLACEHOLDER, format_or_placeholder};
use crate::storage::SeriesSnapshot;
use crate::ui::core::LocalTime;
use crate::ui::styling::TextSize;

/// Top-left of the date/time text
pub const HEADER_ORIGIN: Point = Point::new(10, 10);

/// X of the first latest-reading text
pub const HEADER_READINGS_X_PX: i32 = 500;

/// Horizontal distance between latest-reading texts
pub const HEADER_READING_SPACING_PX: i32 = 130;

const MAX_READING_LENGTH: usize = 24;

/// Latest value of one series, ready to print
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Rounded value, `None` before the first sample
    pub value: Option<f32>,
    /// Decimal places to print
    pub decimals: usize,
    /// Unit suffix
    pub unit: &'static str,
}

impl Reading {
    /// Take the latest raw sample of `snapshot`, rounded with that series'
    /// own scaler.
    pub fn from_snapshot(snapshot: &SeriesSnapshot, scaler: &SeriesScaler, unit: &'static str) -> Self {
        Self {
            value: snapshot.last_value.map(|v| scaler.round_for_display(v)),
            decimals: scaler.display_decimals(),
            unit,
        }
    }

    /// `"<value><unit>"`, or `"--<unit>"` without a value
    pub fn text(&self) -> String<MAX_READING_LENGTH> {
        match self.value {
            Some(value) => format_or_placeholder(format_args!(
                "{value:.prec$}{}",
                self.unit,
                prec = self.decimals
            )),
            None => format_or_placeholder(format_args!("{PLACEHOLDER}{}", self.unit)),
        }
    }
}

/// Header drawn above the graph on the black layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Header {
    origin: Point,
    readings_x: i32,
    spacing: i32,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            origin: HEADER_ORIGIN,
            readings_x: HEADER_READINGS_X_PX,
            spacing: HEADER_READING_SPACING_PX,
        }
    }
}

impl Header {
    /// Header with the time at `origin` and readings from `readings_x`,
    /// `spacing` pixels apart
    pub fn new(origin: Point, readings_x: i32, spacing: i32) -> Self {
        Self {
            origin,
            readings_x,
            spacing,
        }
    }

    /// Draw the time and the readings left to right
    pub fn draw<D: DrawTarget<Color = BinaryColor>>(
        &self,
        display: &mut D,
        now: &LocalTime,
        readings: &[Reading],
    ) -> Result<(), D::Error> {
        let label = Label::new(TextSize::Large).with_baseline(Baseline::Top);

        let time: String<MAX_READING_LENGTH> = format_or_placeholder(format_args!("{now}"));
        label.draw(display, &time, self.origin)?;

        let mut x = self.readings_x;
        for reading in readings {
            label.draw(display, &reading.text(), Point::new(x, self.origin.y))?;
            x += self.spacing;
        }

        Ok(())
    }
}

//! Per-series value to pixel-row mapping
//!
//! Each series is scaled on its own from its lifetime extrema, so two
//! quantities with unrelated units share one grid. The top gridline is
//! `display_max = ceil(max + span)` where `span = (max - min) / 2`, and each
//! row below it is one `span` lower, so the observed range always sits in the
//! upper half of the grid.

use super::constants::{DISPLAY_PRECISION_BASE, MAX_DISPLAY_DECIMALS, MAX_ROW_MAGNITUDE_PX};
use crate::storage::{Extrema, SeriesSnapshot};

/// Vertical scaling for one series, built fresh for every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesScaler {
    value_span: f32,
    display_max: f32,
    pixels_per_unit: f32,
    // Unclamped; only mapped rows are clamped
    zero_row: f32,
    magnitude_scale: i32,
}

impl SeriesScaler {
    /// Build a scaler from a series snapshot
    pub fn new(snapshot: &SeriesSnapshot, cell_height: u32, top_margin: u32) -> Self {
        Self::from_parts(
            snapshot.extrema,
            snapshot.magnitude_scale,
            cell_height,
            top_margin,
        )
    }

    /// Build a scaler from raw extrema
    ///
    /// A series with no samples, or one whose minimum equals its maximum,
    /// gets a flat mapping: every value lands one cell below the top
    /// gridline and no division by zero takes place.
    pub fn from_parts(
        extrema: Option<Extrema>,
        magnitude_scale: i32,
        cell_height: u32,
        top_margin: u32,
    ) -> Self {
        let top = top_margin as f32;

        let Some(Extrema { min, max }) = extrema.filter(|e| e.min.is_finite() && e.max.is_finite())
        else {
            return Self::flat(0.0, magnitude_scale, cell_height, top_margin);
        };

        let value_span = (max - min) / 2.0;
        if value_span <= 0.0 {
            return Self::flat(libm::ceilf(max), magnitude_scale, cell_height, top_margin);
        }

        let display_max = libm::ceilf(max + value_span);
        let pixels_per_unit = cell_height as f32 / value_span;
        let zero_row = top + display_max * pixels_per_unit;

        Self {
            value_span,
            display_max,
            pixels_per_unit,
            zero_row,
            magnitude_scale,
        }
    }

    fn flat(display_max: f32, magnitude_scale: i32, cell_height: u32, top_margin: u32) -> Self {
        Self {
            value_span: 0.0,
            display_max,
            pixels_per_unit: 0.0,
            zero_row: top_margin as f32 + cell_height as f32,
            magnitude_scale,
        }
    }

    /// Half the lifetime range; the value distance between two gridlines
    pub fn value_span(&self) -> f32 {
        self.value_span
    }

    /// Value at the top gridline
    pub fn display_max(&self) -> f32 {
        self.display_max
    }

    /// Pixels per unit of the series
    pub fn pixels_per_unit(&self) -> f32 {
        self.pixels_per_unit
    }

    /// Pixel row of value 0, clamped like any mapped row
    pub fn zero_row(&self) -> i32 {
        self.map_value_to_pixel_row(0.0)
    }

    /// Pixel row of `value`; larger values map to smaller rows
    pub fn map_value_to_pixel_row(&self, value: f32) -> i32 {
        clamp_row(libm::roundf(self.zero_row - self.pixels_per_unit * value))
    }

    /// Label value of gridline row `row` (0 is the top gridline)
    pub fn row_value(&self, row: u32) -> f32 {
        self.display_max - row as f32 * self.value_span
    }

    /// Decimal places used by [`round_for_display`](Self::round_for_display)
    pub fn display_decimals(&self) -> usize {
        (DISPLAY_PRECISION_BASE - self.magnitude_scale).clamp(0, MAX_DISPLAY_DECIMALS) as usize
    }

    /// Round `value` to the precision this series is shown with
    ///
    /// Larger magnitudes get fewer decimals: a series averaging ~20 shows one
    /// decimal, one averaging ~4 shows three.
    pub fn round_for_display(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return value;
        }

        let mut factor = 1.0f32;
        for _ in 0..self.display_decimals() {
            factor *= 10.0;
        }
        libm::roundf(value * factor) / factor
    }
}

fn clamp_row(row: f32) -> i32 {
    // `as` saturates, so the clamp also catches +/-inf
    (row as i32).clamp(-MAX_ROW_MAGNITUDE_PX, MAX_ROW_MAGNITUDE_PX)
}

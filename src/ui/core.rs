// src/ui/core.rs
//! Core types shared by the drawing components

use core::fmt;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use super::styling::ColorChannel;

/// Wall-clock time as shown on the panel.
///
/// The clock itself belongs to the platform; renders are handed a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl LocalTime {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }
}

/// `YYYY/MM/DD HH:MM:SS`
impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}/{:02}/{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// The pair of ink layers a frame is drawn onto
pub struct Surfaces<'a, D> {
    /// Black ink layer
    pub black: &'a mut D,
    /// Red ink layer
    pub red: &'a mut D,
}

impl<'a, D> Surfaces<'a, D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    pub fn new(black: &'a mut D, red: &'a mut D) -> Self {
        Self { black, red }
    }

    /// The layer that renders in `channel`
    pub fn channel(&mut self, channel: ColorChannel) -> &mut D {
        match channel {
            ColorChannel::Black => &mut *self.black,
            ColorChannel::Red => &mut *self.red,
        }
    }

    /// Blank both layers
    pub fn clear(&mut self) -> Result<(), D::Error> {
        self.black.clear(super::PAPER)?;
        self.red.clear(super::PAPER)
    }
}

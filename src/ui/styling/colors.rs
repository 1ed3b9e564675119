//! Color definitions for a black/white/red e-paper panel
//!
//! Each layer is a 1-bit surface: `BinaryColor::On` puts ink on the paper,
//! `BinaryColor::Off` leaves it white. Which ink depends on the layer the
//! pixel was drawn to.

use embedded_graphics::pixelcolor::BinaryColor;

/// Pixel value that deposits ink
pub const INK: BinaryColor = BinaryColor::On;

/// Pixel value that leaves the paper blank
pub const PAPER: BinaryColor = BinaryColor::Off;

/// Which ink layer something is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChannel {
    Black,
    Red,
}

impl ColorChannel {
    /// The other layer
    pub const fn alternate(self) -> Self {
        match self {
            Self::Black => Self::Red,
            Self::Red => Self::Black,
        }
    }
}

//! Text sizes
//!
//! ISO 8859-1 fonts are used throughout so the degree sign renders.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, iso_8859_1};
use embedded_graphics::pixelcolor::BinaryColor;

use super::colors::INK;

/// Preset text sizes
///
/// - `Small`: 6x10 font
/// - `Medium`: 9x15 font (axis labels)
/// - `Large`: 10x20 font (header)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextSize {
    Small,
    Medium,
    Large,
}

impl TextSize {
    pub fn font(&self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => &iso_8859_1::FONT_6X10,
            TextSize::Medium => &iso_8859_1::FONT_9X15,
            TextSize::Large => &iso_8859_1::FONT_10X20,
        }
    }

    /// Ink-colored character style in this size
    pub fn style(&self) -> MonoTextStyle<'static, BinaryColor> {
        MonoTextStyle::new(self.font(), INK)
    }
}

// src/ui/components/text.rs
//! Single-line text labels anchored at a point

use core::fmt::{self, Write};

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text as EgText, TextStyleBuilder};
use heapless::String;

use crate::ui::styling::TextSize;

/// Label style: size, horizontal alignment and which part of the glyphs
/// sits on the anchor row.
///
/// # Examples
/// ```ignore
/// Label::new(TextSize::Medium)
///     .with_alignment(Alignment::Right)
///     .draw(surface, "22.5", Point::new(790, 130))?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Label {
    size: TextSize,
    alignment: Alignment,
    baseline: Baseline,
}

impl Label {
    /// Left-aligned label, vertically centred on the anchor
    pub const fn new(size: TextSize) -> Self {
        Self {
            size,
            alignment: Alignment::Left,
            baseline: Baseline::Middle,
        }
    }

    /// Horizontal alignment relative to the anchor
    pub const fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub const fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Draw `text` at `anchor`, returning the position after the last glyph
    pub fn draw<D>(&self, target: &mut D, text: &str, anchor: Point) -> Result<Point, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let text_style = TextStyleBuilder::new()
            .alignment(self.alignment)
            .baseline(self.baseline)
            .build();

        EgText::with_text_style(text, anchor, self.size.style(), text_style).draw(target)
    }
}

/// Shown in place of a value that is missing or does not fit
pub const PLACEHOLDER: &str = "--";

/// Format `args` into a fixed-capacity string
///
/// Text longer than `N` bytes is replaced by [`PLACEHOLDER`] (or nothing, if
/// even that does not fit), never truncated mid-number.
pub fn format_or_placeholder<const N: usize>(args: fmt::Arguments<'_>) -> String<N> {
    let mut text = String::new();
    if text.write_fmt(args).is_ok() {
        return text;
    }
    String::try_from(PLACEHOLDER).unwrap_or_default()
}

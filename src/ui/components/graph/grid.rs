//! Grid line rendering for the graph background

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};

use super::constants::GRID_LINE_WIDTH_PX;
use super::layout::GraphLayout;
use crate::ui::INK;

/// Draw `row_count + 1` horizontal and `column_count + 1` vertical gridlines
pub(super) fn draw_grid<D: DrawTarget<Color = BinaryColor>>(
    layout: &GraphLayout,
    display: &mut D,
) -> Result<(), D::Error> {
    let style = PrimitiveStyle::with_stroke(INK, GRID_LINE_WIDTH_PX);
    let left = layout.column_x(0);
    let right = layout.column_x(layout.column_count);
    let top = layout.row_y(0);
    let bottom = layout.row_y(layout.row_count);

    // Horizontal
    for row in 0..=layout.row_count {
        let y = layout.row_y(row);
        Line::new(Point::new(left, y), Point::new(right, y))
            .into_styled(style)
            .draw(display)?;
    }

    // Vertical
    for column in 0..=layout.column_count {
        let x = layout.column_x(column);
        Line::new(Point::new(x, top), Point::new(x, bottom))
            .into_styled(style)
            .draw(display)?;
    }

    Ok(())
}

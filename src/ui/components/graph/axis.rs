//! Axis label rendering
//!
//! Value labels sit on the row gridlines (series A on the left, series B on
//! the right). Hour labels sit above the column gridlines; the "now" column
//! shows `HH:MM` on the red layer instead.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline};
use heapless::String;

use super::constants::{
    HOUR_LABEL_OFFSET_PX, LEFT_LABEL_X_PX, MAX_AXIS_LABEL_LENGTH, RIGHT_LABEL_GAP_PX,
    RIGHT_LABEL_INSET_PX,
};
use super::layout::GraphLayout;
use super::scaler::SeriesScaler;
use crate::ui::components::text::{Label, format_or_placeholder};
use crate::ui::core::{LocalTime, Surfaces};
use crate::ui::styling::{ColorChannel, TextSize};

/// Formatted axis label
pub(super) type AxisLabel = String<MAX_AXIS_LABEL_LENGTH>;

/// Format `value` with `decimals` places, or `--` if it does not fit
pub(super) fn format_value(value: f32, decimals: usize) -> AxisLabel {
    format_or_placeholder(format_args!("{value:.decimals$}"))
}

/// Hour label for an ordinary column
pub(super) fn format_hour(hour: u8) -> AxisLabel {
    format_or_placeholder(format_args!("{hour}"))
}

/// `HH:MM` label for the "now" column
pub(super) fn format_now(now: &LocalTime) -> AxisLabel {
    format_or_placeholder(format_args!("{:02}:{:02}", now.hour, now.minute))
}

/// Draw the row value labels of both series onto the black layer
pub(super) fn draw_value_labels<D: DrawTarget<Color = BinaryColor>>(
    layout: &GraphLayout,
    left: &SeriesScaler,
    right: &SeriesScaler,
    surface_width: u32,
    display: &mut D,
) -> Result<(), D::Error> {
    let left_label = Label::new(TextSize::Small);
    let (right_label, right_x) = if layout.right_align_labels {
        (
            Label::new(TextSize::Small).with_alignment(Alignment::Right),
            surface_width as i32 - RIGHT_LABEL_INSET_PX,
        )
    } else {
        (
            Label::new(TextSize::Small),
            layout.column_x(layout.column_count) + RIGHT_LABEL_GAP_PX,
        )
    };

    for row in 0..=layout.row_count {
        let y = layout.row_y(row);

        let text = format_value(
            left.round_for_display(left.row_value(row)),
            left.display_decimals(),
        );
        left_label.draw(display, &text, Point::new(LEFT_LABEL_X_PX, y))?;

        let text = format_value(
            right.round_for_display(right.row_value(row)),
            right.display_decimals(),
        );
        right_label.draw(display, &text, Point::new(right_x, y))?;
    }

    Ok(())
}

/// Draw the hour labels above the column gridlines
///
/// Returns the index of the column that received the `HH:MM` label.
pub(super) fn draw_hour_labels<D: DrawTarget<Color = BinaryColor>>(
    layout: &GraphLayout,
    now: &LocalTime,
    surfaces: &mut Surfaces<'_, D>,
) -> Result<u32, D::Error> {
    let label = Label::new(TextSize::Medium)
        .with_alignment(Alignment::Center)
        .with_baseline(Baseline::Bottom);
    let y = layout.row_y(0) - HOUR_LABEL_OFFSET_PX;
    let now_column = layout.now_column();

    for column in 0..=layout.column_count {
        let anchor = Point::new(layout.column_x(column), y);
        if column == now_column {
            label.draw(
                surfaces.channel(ColorChannel::Red),
                &format_now(now),
                anchor,
            )?;
        } else {
            let hour = layout.column_hour(now.hour, column);
            label.draw(
                surfaces.channel(ColorChannel::Black),
                &format_hour(hour),
                anchor,
            )?;
        }
    }

    Ok(now_column)
}

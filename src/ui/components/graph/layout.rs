//! Fixed grid geometry and time-axis arithmetic
//!
//! The grid is anchored at `(margin_left, margin_top)` and is
//! `column_count x row_count` cells. Column gridlines are time positions:
//! the "now" gridline sits `lookahead_columns` before the right edge so the
//! newest marker is never clipped, and each column to its left is
//! `hours_per_column` further in the past.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use serde::{Deserialize, Serialize};

use super::constants::{
    DEFAULT_CELL_HEIGHT_PX, DEFAULT_CELL_WIDTH_PX, DEFAULT_COLUMN_COUNT, DEFAULT_HOURS_PER_COLUMN,
    DEFAULT_LOOKAHEAD_COLUMNS, DEFAULT_MARGIN_LEFT_PX, DEFAULT_MARGIN_TOP_PX, DEFAULT_ROW_COUNT,
    MAX_HOURS_PER_COLUMN, SECS_PER_DAY, SECS_PER_HOUR,
};
use super::{GraphError, GraphResult};

/// Grid geometry configuration
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct GraphLayout {
    /// Cell width in pixels
    pub cell_width: u32,
    /// Cell height in pixels
    pub cell_height: u32,
    /// Number of grid rows
    pub row_count: u32,
    /// Number of grid columns
    pub column_count: u32,
    /// Top of the grid in pixels
    pub margin_top: u32,
    /// Left of the grid in pixels
    pub margin_left: u32,
    /// Hours represented by one column
    pub hours_per_column: u32,
    /// Blank columns right of the "now" column
    pub lookahead_columns: u32,
    /// Right-align series B labels to the panel edge instead of the grid edge
    pub right_align_labels: bool,
}

impl Default for GraphLayout {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH_PX,
            cell_height: DEFAULT_CELL_HEIGHT_PX,
            row_count: DEFAULT_ROW_COUNT,
            column_count: DEFAULT_COLUMN_COUNT,
            margin_top: DEFAULT_MARGIN_TOP_PX,
            margin_left: DEFAULT_MARGIN_LEFT_PX,
            hours_per_column: DEFAULT_HOURS_PER_COLUMN,
            lookahead_columns: DEFAULT_LOOKAHEAD_COLUMNS,
            right_align_labels: true,
        }
    }
}

impl GraphLayout {
    /// Grid width in pixels
    pub fn width(&self) -> u32 {
        self.column_count.saturating_mul(self.cell_width)
    }

    /// Grid height in pixels
    pub fn height(&self) -> u32 {
        self.row_count.saturating_mul(self.cell_height)
    }

    /// Top-left gridline intersection
    pub fn origin(&self) -> Point {
        Point::new(self.margin_left as i32, self.margin_top as i32)
    }

    /// Area covered by the grid, including the closing gridlines
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(
            self.origin(),
            Size::new(self.width() + 1, self.height() + 1),
        )
    }

    /// Index of the gridline representing the current time
    pub fn now_column(&self) -> u32 {
        self.column_count.saturating_sub(self.lookahead_columns)
    }

    /// X coordinate of column gridline `column`
    pub fn column_x(&self, column: u32) -> i32 {
        self.margin_left as i32 + (self.cell_width * column) as i32
    }

    /// Y coordinate of row gridline `row`
    pub fn row_y(&self, row: u32) -> i32 {
        self.margin_top as i32 + (self.cell_height * row) as i32
    }

    /// Hour of day shown under column gridline `column`, in `0..24`
    pub fn column_hour(&self, current_hour: u8, column: u32) -> u8 {
        let columns_back = self.now_column() as i64 - column as i64;
        let hour = current_hour as i64 - columns_back * self.hours_per_column as i64;
        hour.rem_euclid(24) as u8
    }

    /// Check the geometry and that it fits on a surface of `available` size.
    pub fn validate(&self, available: Size) -> GraphResult<()> {
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(GraphError::InvalidGeometry {
                reason: "cell size must be non-zero",
            });
        }
        if self.row_count == 0 || self.column_count == 0 {
            return Err(GraphError::InvalidGeometry {
                reason: "grid needs at least one row and one column",
            });
        }
        if self.hours_per_column == 0 || self.hours_per_column > MAX_HOURS_PER_COLUMN {
            return Err(GraphError::InvalidGeometry {
                reason: "hours per column must be between 1 and 24",
            });
        }
        if self.lookahead_columns > self.column_count {
            return Err(GraphError::InvalidGeometry {
                reason: "lookahead exceeds the column count",
            });
        }

        let required = Size::new(
            self.margin_left
                .saturating_add(self.width())
                .saturating_add(1),
            self.margin_top
                .saturating_add(self.height())
                .saturating_add(1),
        );
        if required.width > available.width || required.height > available.height {
            return Err(GraphError::SurfaceTooSmall {
                required,
                available,
            });
        }

        Ok(())
    }
}

/// Horizontal placement of committed values
///
/// Each cell holds `data_count_per_cell` commits, so consecutive history
/// entries are `cell_width / data_count_per_cell` pixels apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotGeometry {
    margin_left: u32,
    cell_width: u32,
    data_count_per_cell: u32,
    position_count: u32,
    commits_per_day: u32,
}

impl PlotGeometry {
    /// Derive the plot geometry for commits every `commit_interval_secs`
    pub fn new(layout: &GraphLayout, commit_interval_secs: u32) -> GraphResult<Self> {
        if commit_interval_secs == 0 {
            return Err(GraphError::InvalidCommitInterval {
                secs: commit_interval_secs,
            });
        }

        let secs_per_cell = layout
            .hours_per_column
            .checked_mul(SECS_PER_HOUR)
            .ok_or(GraphError::InvalidGeometry {
                reason: "hours per column out of range",
            })?;
        let data_count_per_cell = secs_per_cell / commit_interval_secs;
        if data_count_per_cell == 0 {
            return Err(GraphError::InvalidCommitInterval {
                secs: commit_interval_secs,
            });
        }

        let position_count = layout
            .now_column()
            .checked_mul(data_count_per_cell)
            .and_then(|n| n.checked_add(1))
            .ok_or(GraphError::InvalidGeometry {
                reason: "too many plot positions",
            })?;

        Ok(Self {
            margin_left: layout.margin_left,
            cell_width: layout.cell_width,
            data_count_per_cell,
            position_count,
            commits_per_day: SECS_PER_DAY / commit_interval_secs,
        })
    }

    /// Committed values per grid cell
    pub fn data_count_per_cell(&self) -> u32 {
        self.data_count_per_cell
    }

    /// Number of x positions from column 0 up to and including "now"
    pub fn position_count(&self) -> u32 {
        self.position_count
    }

    /// Pixel column of position `i`
    pub fn x_at(&self, i: u32) -> i32 {
        let width_per_data = self.cell_width as f32 / self.data_count_per_cell as f32;
        self.margin_left as i32 + (i as f32 * width_per_data) as i32
    }

    /// History index, counted back from the newest commit, plotted at `i`
    pub fn history_index(&self, i: u32) -> usize {
        (self.position_count() - 1).saturating_sub(i) as usize
    }

    /// `(x, history_index)` for every position, oldest first
    pub fn positions(&self) -> impl Iterator<Item = (i32, usize)> + '_ {
        (0..self.position_count()).map(move |i| (self.x_at(i), self.history_index(i)))
    }

    /// How many commits back the same time of day was yesterday
    ///
    /// `None` when commits are further apart than a day.
    pub fn previous_day_offset(&self) -> Option<usize> {
        (self.commits_per_day > 0).then_some(self.commits_per_day as usize)
    }

    /// Whether a history of `history_capacity` commits can ever reach back
    /// to the previous day
    pub fn previous_day_fits(&self, history_capacity: usize) -> bool {
        self.previous_day_offset()
            .is_some_and(|offset| history_capacity > offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_fits_panel() {
        let layout = GraphLayout::default();
        assert_eq!(layout.width(), 720);
        assert_eq!(layout.height(), 320);
        assert_eq!(layout.now_column(), 8);
        assert!(layout.validate(Size::new(800, 480)).is_ok());
    }

    #[test]
    fn test_surface_too_small() {
        let layout = GraphLayout::default();
        let err = layout.validate(Size::new(640, 480)).unwrap_err();
        assert!(matches!(
            err,
            GraphError::SurfaceTooSmall {
                required: Size {
                    width: 761,
                    height: 451
                },
                ..
            }
        ));

        let short = layout.validate(Size::new(800, 400)).unwrap_err();
        assert!(matches!(short, GraphError::SurfaceTooSmall { .. }));
    }

    #[test]
    fn test_invalid_geometry() {
        let layout = GraphLayout {
            row_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            layout.validate(Size::new(800, 480)),
            Err(GraphError::InvalidGeometry { .. })
        ));

        let layout = GraphLayout {
            lookahead_columns: 10,
            ..Default::default()
        };
        assert!(matches!(
            layout.validate(Size::new(800, 480)),
            Err(GraphError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_column_hours_wrap_around_midnight() {
        let layout = GraphLayout::default();

        // 01:xx now, 2h per column, now column is 8
        assert_eq!(layout.column_hour(1, 8), 1);
        assert_eq!(layout.column_hour(1, 7), 23);
        assert_eq!(layout.column_hour(1, 0), 9);
        assert_eq!(layout.column_hour(1, 9), 3);

        for hour in 0..24u8 {
            for column in 0..=layout.column_count {
                assert!(layout.column_hour(hour, column) < 24);
            }
        }
    }

    #[test]
    fn test_column_hour_never_reports_24() {
        let layout = GraphLayout::default();
        // 22 + 1 column * 2h = 24 -> 0
        assert_eq!(layout.column_hour(22, 9), 0);
    }

    #[test]
    fn test_plot_geometry_positions() {
        let layout = GraphLayout::default();
        let geometry = PlotGeometry::new(&layout, 600).unwrap();

        assert_eq!(geometry.data_count_per_cell(), 12);
        assert_eq!(geometry.position_count(), 97);
        assert_eq!(geometry.x_at(0), 40);
        assert_eq!(geometry.x_at(96), layout.column_x(8));
        assert_eq!(geometry.history_index(96), 0);
        assert_eq!(geometry.history_index(0), 96);
        assert_eq!(geometry.previous_day_offset(), Some(144));

        let last = geometry.positions().last().unwrap();
        assert_eq!(last, (680, 0));
    }

    #[test]
    fn test_previous_day_needs_a_full_day_of_history() {
        let geometry = PlotGeometry::new(&GraphLayout::default(), 600).unwrap();
        assert!(!geometry.previous_day_fits(100));
        assert!(!geometry.previous_day_fits(144));
        assert!(geometry.previous_day_fits(145));

        let daily = PlotGeometry::new(
            &GraphLayout {
                hours_per_column: 24,
                ..Default::default()
            },
            2 * SECS_PER_DAY,
        );
        // Not even one commit per column
        assert!(daily.is_err());
    }

    #[test]
    fn test_commit_interval_longer_than_a_column_rejected() {
        let layout = GraphLayout::default();
        assert!(matches!(
            PlotGeometry::new(&layout, 3 * SECS_PER_HOUR),
            Err(GraphError::InvalidCommitInterval { .. })
        ));
        assert!(PlotGeometry::new(&layout, 0).is_err());

        let one_per_cell = PlotGeometry::new(&layout, 2 * SECS_PER_HOUR).unwrap();
        assert_eq!(one_per_cell.data_count_per_cell(), 1);
        assert_eq!(one_per_cell.position_count(), 9);
    }

    #[test]
    fn test_uneven_commit_interval_counts_per_cell() {
        // 7200 s per cell / 420 s = 17.14, not 2 * (3600 / 420) = 16
        let layout = GraphLayout::default();
        let geometry = PlotGeometry::new(&layout, 420).unwrap();
        assert_eq!(geometry.data_count_per_cell(), 17);
        assert_eq!(geometry.position_count(), 8 * 17 + 1);
        let last_x = geometry.x_at(geometry.position_count() - 1);
        assert!((last_x - layout.column_x(8)).abs() <= 1);
    }

    #[test]
    fn test_hours_per_column_is_bounded() {
        let panel = Size::new(800, 480);
        let day = GraphLayout {
            hours_per_column: 24,
            ..Default::default()
        };
        assert!(day.validate(panel).is_ok());

        for hours in [25, 100_000_000] {
            let layout = GraphLayout {
                hours_per_column: hours,
                ..Default::default()
            };
            assert!(matches!(
                layout.validate(panel),
                Err(GraphError::InvalidGeometry { .. })
            ));
        }

        // Built without validation, the overflow is still an error
        let huge = GraphLayout {
            hours_per_column: 100_000_000,
            ..Default::default()
        };
        assert!(matches!(
            PlotGeometry::new(&huge, 600),
            Err(GraphError::InvalidGeometry { .. })
        ));
    }
}

//! Constants for graph rendering
//!
//! All magic numbers are defined here with descriptive names and units.
//! Geometry defaults lay a 4 x 9 grid onto the 800 x 480 panel.

/// Default width of one grid cell in pixels
pub const DEFAULT_CELL_WIDTH_PX: u32 = 80;

/// Default height of one grid cell in pixels
pub const DEFAULT_CELL_HEIGHT_PX: u32 = 80;

/// Default number of grid rows
pub const DEFAULT_ROW_COUNT: u32 = 4;

/// Default number of grid columns
pub const DEFAULT_COLUMN_COUNT: u32 = 9;

/// Default distance from the top of the panel to the first gridline
///
/// Leaves room for the header and the hour labels.
pub const DEFAULT_MARGIN_TOP_PX: u32 = 130;

/// Default distance from the left of the panel to the first gridline
pub const DEFAULT_MARGIN_LEFT_PX: u32 = 40;

/// Default hours represented by one column
pub const DEFAULT_HOURS_PER_COLUMN: u32 = 2;

/// Upper bound for `hours_per_column`; one column never spans more than a day
pub const MAX_HOURS_PER_COLUMN: u32 = 24;

/// Columns kept blank to the right of the "now" column
pub const DEFAULT_LOOKAHEAD_COLUMNS: u32 = 1;

/// Radius of a plotted data marker in pixels
pub const MARKER_RADIUS_PX: u32 = 5;

/// Stroke width of the segment joining two markers in pixels
pub const SEGMENT_WIDTH_PX: u32 = 2;

/// Gridline stroke width in pixels
pub const GRID_LINE_WIDTH_PX: u32 = 1;

/// Mapped rows are clamped to +/- this value so a tiny value span cannot
/// produce lines millions of pixels long
pub const MAX_ROW_MAGNITUDE_PX: i32 = 4096;

/// Display precision never exceeds this many decimal places
pub const MAX_DISPLAY_DECIMALS: i32 = 6;

/// Decimal places shown for a value of magnitude scale 0
pub const DISPLAY_PRECISION_BASE: i32 = 3;

/// Horizontal inset of the left value labels from the panel edge
pub const LEFT_LABEL_X_PX: i32 = 8;

/// Gap between the right panel edge and right-aligned value labels
pub const RIGHT_LABEL_INSET_PX: i32 = 8;

/// Gap between the grid's right edge and left-aligned right value labels
pub const RIGHT_LABEL_GAP_PX: i32 = 6;

/// Hour labels sit this far above the top gridline
pub const HOUR_LABEL_OFFSET_PX: i32 = 12;

/// Maximum length of formatted axis labels (characters)
pub const MAX_AXIS_LABEL_LENGTH: usize = 16;

/// Seconds in one hour
pub const SECS_PER_HOUR: u32 = 60 * 60;

/// Seconds in one day
pub const SECS_PER_DAY: u32 = 24 * SECS_PER_HOUR;

// src/ui/mod.rs
//! Drawing layer for the two-color e-paper panel
//!
//! Everything here draws onto plain `DrawTarget<Color = BinaryColor>`
//! surfaces: one for the black ink layer and one for the red ink layer. The
//! display driver composites them at refresh time.

pub mod components;
pub mod core;
pub mod styling;

pub use self::core::{LocalTime, Surfaces};
pub use styling::{ColorChannel, INK, PAPER};

/// Panel width in pixels (7.5" tri-color e-paper)
pub const DISPLAY_WIDTH_PX: u32 = 800;

/// Panel height in pixels
pub const DISPLAY_HEIGHT_PX: u32 = 480;

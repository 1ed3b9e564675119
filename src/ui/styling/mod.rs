//! Colors and text styles for the two-layer panel
//!
//! - [`colors`] - ink/paper values and the color channel enum
//! - [`fonts`] - text sizes used by labels and the header

pub mod colors;
pub mod fonts;

pub use colors::{ColorChannel, INK, PAPER};
pub use fonts::TextSize;

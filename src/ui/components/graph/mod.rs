//! Fixed-grid time series graph for a two-color e-paper panel
//!
//! The graph draws two independently scaled series onto one grid:
//!
//! - series A (left value labels) on the red surface
//! - series B (right value labels) on the black surface
//! - optional "yesterday" overlay of each series in the other color
//! - hour labels under each column gridline, with the current time
//!   highlighted in red at the "now" column
//!
//! Everything is rebuilt per frame from [`SeriesSnapshot`]s; nothing is
//! cached between renders.
//!
//! # Examples
//!
//! ```ignore
//! use inkgraph::ui::components::graph::*;
//!
//! let renderer = GraphRenderer::new(GraphLayout::default(), 600, true, Size::new(800, 480))?;
//! let stats = renderer.draw(&mut surfaces, &temperature, &battery, &now);
//! ```
//!
//! [`SeriesSnapshot`]: crate::storage::SeriesSnapshot

use embedded_graphics::geometry::Size;
use thiserror_no_std::Error;

// Module declarations
mod axis;
mod component;
pub mod constants;
mod grid;
pub mod layout;
pub mod scaler;
mod series;

// Re-export main types
pub use component::{FrameStats, GraphRenderer};
pub use layout::{GraphLayout, PlotGeometry};
pub use scaler::SeriesScaler;
pub use series::{PassStats, PlotStats};

/// Error types for graph configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The grid does not fit on the target surface
    #[error("Grid needs {required:?} but the surface is {available:?}")]
    SurfaceTooSmall {
        /// Surface size the grid needs
        required: Size,
        /// Surface size actually available
        available: Size,
    },

    /// The grid geometry is unusable
    #[error("Invalid grid geometry: {reason}")]
    InvalidGeometry {
        /// What is wrong
        reason: &'static str,
    },

    /// Commits are too far apart to place at least one per column
    #[error("Commit interval of {secs}s does not fit the time axis")]
    InvalidCommitInterval {
        /// Configured commit interval
        secs: u32,
    },
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

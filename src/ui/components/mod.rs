// src/ui/components/mod.rs
//! UI components library

pub mod graph;
pub mod header;
pub mod text;

pub use graph::GraphRenderer;
pub use header::{Header, Reading};
pub use text::Label;

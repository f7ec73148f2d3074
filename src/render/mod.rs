//! Rendering engine with a pluggable backend seam.
//!
//! This module provides:
//! - Backend-agnostic rendering traits and types
//! - Canvas 2D backend (rectangles, borders, fitted labels)
//! - Zoom panel painter for the magnified neighborhood

pub mod backend;
pub mod canvas;

// Re-export commonly used types
pub use backend::{fill_for, label_color, CellFill, CellRenderData, RenderBackend, RenderParams};
pub use canvas::{CanvasRenderer, ZoomPanel};

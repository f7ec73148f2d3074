//! Canvas 2D rendering backend.
//!
//! This module provides grid rendering using the HTML Canvas 2D API via
//! web-sys, which is perfectly suited for pictogram grids (rectangles,
//! borders, short text labels).

mod axes;
mod renderer;
mod zoom_panel;

pub use renderer::CanvasRenderer;
pub use zoom_panel::ZoomPanel;

//! Layout engine for placing records on the grid and mapping cells to
//! pixels.
//!
//! This module handles:
//! - Tiling page sub-grids onto the final grid (flat and paged modes)
//! - Uniform band scales for cell rectangles and O(1) hit testing

mod band_scale;
mod grid_layout;

pub use band_scale::{BandScale, CellRect, GridGeometry};
pub use grid_layout::{GridDimensions, GridLayout, LayoutMode, TileArrangement};

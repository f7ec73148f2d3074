//! Uniform band scale mapping cell indices to pixel offsets.
//!
//! One scale per axis. Every band has the same step; a configurable
//! fraction of each step is left as a gap between cells. The inverse
//! lookup resolves a pixel coordinate back to a band index for hit
//! testing in O(1).

use super::grid_layout::GridDimensions;
use crate::types::{CellId, GridConfig};

/// Maps band indices `0..count` onto `[origin, origin + axis_len)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    origin: f32,
    axis_len: f32,
    count: u32,
    padding: f32,
}

impl BandScale {
    /// Create a scale for `count` bands over `axis_len` pixels starting at
    /// `origin`. `padding` is the fraction of each step left empty and is
    /// clamped to `[0, 1)`.
    pub fn new(origin: f32, axis_len: f32, count: u32, padding: f32) -> Self {
        Self {
            origin,
            axis_len: axis_len.max(0.0),
            count,
            padding: padding.clamp(0.0, 0.99),
        }
    }

    /// Distance between the starts of adjacent bands. Zero for empty scales.
    pub fn step(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.axis_len / self.count as f32
        }
    }

    /// Drawn width of one band (step minus the padding gap).
    pub fn bandwidth(&self) -> f32 {
        self.step() * (1.0 - self.padding)
    }

    /// Pixel offset of the start of band `index`.
    pub fn offset(&self, index: u32) -> f32 {
        self.origin + index as f32 * self.step()
    }

    /// Pixel offset of the center of band `index`.
    pub fn center(&self, index: u32) -> f32 {
        self.offset(index) + self.bandwidth() / 2.0
    }

    /// Inverse lookup: the band containing pixel coordinate `px`.
    ///
    /// The whole step counts as the band (the padding gap is visual only),
    /// so a pointer between two cells resolves to the cell on its left/top.
    /// Returns `None` outside `[origin, origin + axis_len)` or for an
    /// empty scale.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn index_at(&self, px: f32) -> Option<u32> {
        if self.count == 0 || self.axis_len <= 0.0 {
            return None;
        }
        let rel = px - self.origin;
        if rel < 0.0 || rel >= self.axis_len {
            return None;
        }
        // rel / step is in [0, count) here, so the cast is in range.
        let index = (rel / self.step()).floor() as u32;
        Some(index.min(self.count - 1))
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Pixel coordinate one past the last band.
    pub fn end(&self) -> f32 {
        self.origin + self.axis_len
    }

    pub fn origin(&self) -> f32 {
        self.origin
    }
}

/// Rectangle of one cell in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Both axis scales for the current grid, built once per load/resize.
#[derive(Debug, Clone, Copy)]
pub struct GridGeometry {
    pub x: BandScale,
    pub y: BandScale,
}

impl GridGeometry {
    /// Build scales for a grid of the given dimensions inside the
    /// configured plotting area.
    pub fn new(config: &GridConfig, dims: &GridDimensions) -> Self {
        Self {
            x: BandScale::new(
                config.margin.left,
                config.inner_width(),
                dims.num_cols,
                config.band_padding,
            ),
            y: BandScale::new(
                config.margin.top,
                config.inner_height(),
                dims.num_rows,
                config.band_padding,
            ),
        }
    }

    /// Pixel rectangle of a cell.
    pub fn rect(&self, cell: CellId) -> CellRect {
        CellRect {
            x: self.x.offset(cell.col),
            y: self.y.offset(cell.row),
            width: self.x.bandwidth(),
            height: self.y.bandwidth(),
        }
    }

    /// The cell under a pixel coordinate, if inside the plotting area.
    pub fn cell_at(&self, px: f32, py: f32) -> Option<CellId> {
        let col = self.x.index_at(px)?;
        let row = self.y.index_at(py)?;
        Some(CellId::new(row, col))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_uniform() {
        let scale = BandScale::new(30.0, 660.0, 6, 0.01);
        assert_eq!(scale.step(), 110.0);
        assert_eq!(scale.offset(0), 30.0);
        assert_eq!(scale.offset(3), 360.0);
        assert!((scale.bandwidth() - 108.9).abs() < 0.001);
    }

    #[test]
    fn test_index_at_round_trips_offsets() {
        let scale = BandScale::new(30.0, 660.0, 11, 0.01);
        for i in 0..11 {
            assert_eq!(scale.index_at(scale.offset(i)), Some(i));
            assert_eq!(scale.index_at(scale.center(i)), Some(i));
        }
    }

    #[test]
    fn test_index_at_out_of_range() {
        let scale = BandScale::new(30.0, 660.0, 6, 0.01);
        assert_eq!(scale.index_at(29.9), None);
        assert_eq!(scale.index_at(690.0), None);
        assert_eq!(scale.index_at(689.99), Some(5));
        assert_eq!(scale.index_at(30.0), Some(0));
    }

    #[test]
    fn test_empty_scale() {
        let scale = BandScale::new(0.0, 660.0, 0, 0.01);
        assert_eq!(scale.step(), 0.0);
        assert_eq!(scale.bandwidth(), 0.0);
        assert_eq!(scale.index_at(100.0), None);
    }

    #[test]
    fn test_geometry_hit_test_matches_rect() {
        let config = GridConfig::default();
        let dims = GridDimensions {
            page_dim_x: 4,
            page_dim_y: 3,
            grid_dim_x: 1,
            grid_dim_y: 1,
            num_cols: 4,
            num_rows: 3,
        };
        let geometry = GridGeometry::new(&config, &dims);
        let cell = CellId::new(2, 3);
        let rect = geometry.rect(cell);
        assert_eq!(
            geometry.cell_at(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0),
            Some(cell)
        );
        // Outside the plotting area.
        assert_eq!(geometry.cell_at(0.0, 0.0), None);
    }
}

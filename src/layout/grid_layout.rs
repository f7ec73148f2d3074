//! Grid placement: page-local record coordinates to final grid cells.
//!
//! Flat mode uses record coordinates directly. Paged mode tiles each
//! page's sub-grid onto a super-grid of page tiles, so the whole dataset
//! fits one canvas without scrolling.

use crate::types::{CellId, PageIndex, PictogramRecord};

/// How page tiles are arranged on the super-grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileArrangement {
    /// Square super-grid sized from the distinct page count:
    /// `ceil(sqrt(pages))` tiles per axis.
    #[default]
    SquareByPages,
    /// Tiles per row derived from the record count
    /// (`ceil(sqrt(ceil(sqrt(records))))`), as in older grid exports.
    /// Rows grow as needed to fit all pages.
    SquareByRecords,
}

/// How records map onto the final grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// `cell = (record.row, record.col)`; extent is the coordinate maxima.
    #[default]
    Flat,
    /// Pages tile a super-grid; `tile_gap` adds a gutter (in cells)
    /// between adjacent tiles.
    Paged {
        arrangement: TileArrangement,
        tile_gap: u32,
    },
}

impl LayoutMode {
    /// Paged mode with the canonical arrangement and no gutter.
    pub fn paged() -> Self {
        Self::Paged {
            arrangement: TileArrangement::SquareByPages,
            tile_gap: 0,
        }
    }
}

/// Grid extent derived once per load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridDimensions {
    /// Max record col + 1 across all records (sub-grid width).
    pub page_dim_x: u32,
    /// Max record row + 1 across all records (sub-grid height).
    pub page_dim_y: u32,
    /// Page tiles per row (1 in flat mode, 0 when empty).
    pub grid_dim_x: u32,
    /// Page tile rows (1 in flat mode, 0 when empty).
    pub grid_dim_y: u32,
    /// Total grid width in cells.
    pub num_cols: u32,
    /// Total grid height in cells.
    pub num_rows: u32,
}

/// Computed placement for one dataset under one [`LayoutMode`].
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    mode: LayoutMode,
    dims: GridDimensions,
}

impl GridLayout {
    /// Compute grid dimensions for the records under the given mode.
    /// Zero records yield all-zero dimensions.
    pub fn compute(records: &[PictogramRecord], pages: &PageIndex, mode: LayoutMode) -> Self {
        let page_dim_x = records.iter().map(|r| r.col).max().map_or(0, |m| m + 1);
        let page_dim_y = records.iter().map(|r| r.row).max().map_or(0, |m| m + 1);

        let dims = match mode {
            LayoutMode::Flat => {
                let present = u32::from(!records.is_empty());
                GridDimensions {
                    page_dim_x,
                    page_dim_y,
                    grid_dim_x: present,
                    grid_dim_y: present,
                    num_cols: page_dim_x,
                    num_rows: page_dim_y,
                }
            }
            LayoutMode::Paged {
                arrangement,
                tile_gap,
            } => {
                let page_count = u32::try_from(pages.len()).unwrap_or(u32::MAX);
                let record_count = u32::try_from(records.len()).unwrap_or(u32::MAX);
                let grid_dim_x = match arrangement {
                    TileArrangement::SquareByPages => ceil_sqrt(page_count),
                    TileArrangement::SquareByRecords => ceil_sqrt(ceil_sqrt(record_count)),
                };
                let grid_dim_y = match arrangement {
                    // Square extent even when the last tile row is partial.
                    TileArrangement::SquareByPages => grid_dim_x,
                    // Enough rows to hold every page tile.
                    TileArrangement::SquareByRecords => {
                        if grid_dim_x == 0 {
                            0
                        } else {
                            page_count.div_ceil(grid_dim_x)
                        }
                    }
                };
                GridDimensions {
                    page_dim_x,
                    page_dim_y,
                    grid_dim_x,
                    grid_dim_y,
                    num_cols: tiled_extent(grid_dim_x, page_dim_x, tile_gap),
                    num_rows: tiled_extent(grid_dim_y, page_dim_y, tile_gap),
                }
            }
        };

        Self { mode, dims }
    }

    /// Final grid cell for a record.
    ///
    /// Pages absent from the index fall back to tile 0; `Dataset::build`
    /// always indexes every page it places, so this only matters for
    /// callers composing their own inputs.
    pub fn place(&self, record: &PictogramRecord, pages: &PageIndex) -> CellId {
        match self.mode {
            LayoutMode::Flat => CellId::new(record.row, record.col),
            LayoutMode::Paged { tile_gap, .. } => {
                if self.dims.grid_dim_x == 0 {
                    return CellId::new(record.row, record.col);
                }
                let tile =
                    u32::try_from(pages.index_of(&record.page).unwrap_or(0)).unwrap_or(u32::MAX);
                let tile_col = tile % self.dims.grid_dim_x;
                let tile_row = tile / self.dims.grid_dim_x;
                let stride_x = self.dims.page_dim_x.saturating_add(tile_gap);
                let stride_y = self.dims.page_dim_y.saturating_add(tile_gap);
                CellId::new(
                    record.row.saturating_add(tile_row.saturating_mul(stride_y)),
                    record.col.saturating_add(tile_col.saturating_mul(stride_x)),
                )
            }
        }
    }

    pub fn dims(&self) -> &GridDimensions {
        &self.dims
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }
}

/// Total cells along one axis for `tiles` tiles of `page_dim` cells with a
/// `gap`-cell gutter between tiles (no trailing gutter).
fn tiled_extent(tiles: u32, page_dim: u32, gap: u32) -> u32 {
    if tiles == 0 {
        return 0;
    }
    tiles
        .saturating_mul(page_dim.saturating_add(gap))
        .saturating_sub(gap)
}

/// Smallest `r` with `r * r >= n`.
fn ceil_sqrt(n: u32) -> u32 {
    let mut r = 0u32;
    while r.saturating_mul(r) < n {
        r += 1;
    }
    r
}

//! Magnified neighborhood view around the hovered cell.
//!
//! A zoom snapshot is a small row-major grid of slots centered on the
//! focus cell, mirroring each neighbor's word and resting fill. The
//! secondary canvas paints snapshots without ever reaching back into the
//! dataset or interaction state.

use crate::layout::GridDimensions;
use crate::render::backend::CellFill;
use crate::types::{CellId, Dataset};

/// Dimensions of the zoom neighborhood, always odd on both axes so the
/// focus sits in the exact center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomWindow {
    rows: u32,
    cols: u32,
}

impl ZoomWindow {
    /// Create a window, normalizing each axis to at least 1 and up to the
    /// next odd number.
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows: normalize_odd(rows),
            cols: normalize_odd(cols),
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of slots in a snapshot of this window.
    pub fn slot_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl Default for ZoomWindow {
    fn default() -> Self {
        Self::new(5, 5)
    }
}

fn normalize_odd(n: u32) -> u32 {
    let n = n.max(1);
    if n % 2 == 0 {
        n + 1
    } else {
        n
    }
}

/// One slot of a zoom snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomSlot {
    /// The mirrored grid cell; `None` for blank slots (out of grid
    /// bounds, or an in-bounds cell holding no record).
    pub cell: Option<CellId>,
    /// The word of the record at the cell, if any.
    pub word: Option<String>,
    /// The cell's resting fill, mirrored from the main grid.
    pub fill: CellFill,
}

impl ZoomSlot {
    pub fn blank() -> Self {
        Self {
            cell: None,
            word: None,
            fill: CellFill::base(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.cell.is_none()
    }
}

/// A complete zoom view: the window shape plus `rows * cols` slots in
/// row-major order (top-left first, focus in the center).
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomSnapshot {
    pub window: ZoomWindow,
    pub slots: Vec<ZoomSlot>,
}

impl ZoomSnapshot {
    /// The slot at window-local coordinates.
    pub fn slot(&self, row: u32, col: u32) -> Option<&ZoomSlot> {
        if row >= self.window.rows() || col >= self.window.cols() {
            return None;
        }
        self.slots
            .get(row as usize * self.window.cols() as usize + col as usize)
    }

    /// The center slot (the focus cell itself).
    pub fn center(&self) -> Option<&ZoomSlot> {
        self.slot(self.window.rows() / 2, self.window.cols() / 2)
    }
}

/// Build the zoom snapshot around `focus`.
///
/// `resolve_fill` maps an occupied cell to its current resting fill, so
/// the zoom mirrors marks, search highlights, and page tints without
/// duplicating the precedence logic. Runs in O(rows * cols) regardless of
/// dataset size.
pub fn zoom_snapshot(
    focus: CellId,
    window: ZoomWindow,
    dataset: &Dataset,
    resolve_fill: impl Fn(CellId) -> CellFill,
) -> ZoomSnapshot {
    let half_rows = i64::from(window.rows() / 2);
    let half_cols = i64::from(window.cols() / 2);
    let dims = dataset.dims();

    let mut slots = Vec::with_capacity(window.slot_count());
    for di in -half_rows..=half_rows {
        for dj in -half_cols..=half_cols {
            let r = i64::from(focus.row) + di;
            let c = i64::from(focus.col) + dj;
            let slot = cell_in_bounds(r, c, dims)
                .and_then(|cell| {
                    dataset.record_at(cell).map(|record| ZoomSlot {
                        cell: Some(cell),
                        word: Some(record.word.clone()),
                        fill: resolve_fill(cell),
                    })
                })
                .unwrap_or_else(ZoomSlot::blank);
            slots.push(slot);
        }
    }

    ZoomSnapshot { window, slots }
}

fn cell_in_bounds(row: i64, col: i64, dims: &GridDimensions) -> Option<CellId> {
    let row = u32::try_from(row).ok()?;
    let col = u32::try_from(col).ok()?;
    if row < dims.num_rows && col < dims.num_cols {
        Some(CellId::new(row, col))
    } else {
        None
    }
}

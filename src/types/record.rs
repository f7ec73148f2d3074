use serde::{Deserialize, Serialize};

/// One pictogram: a labeled cell inside a page's sub-grid.
///
/// Records are immutable once parsed. `word` is the display label and the
/// search join key (not unique across the dataset); `row`/`col` are
/// page-local coordinates; `page` groups records into sub-grids;
/// `identifier` is an opaque passthrough from the source data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictogramRecord {
    pub word: String,
    pub row: u32,
    pub col: u32,
    pub page: String,
    pub identifier: String,
}

impl PictogramRecord {
    pub fn new(
        word: impl Into<String>,
        row: u32,
        col: u32,
        page: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            row,
            col,
            page: page.into(),
            identifier: identifier.into(),
        }
    }
}

/// Final grid coordinates of one cell, after page tiling.
///
/// This is the only join key between layout, interaction state, and the
/// renderer. Two records that land on the same `CellId` occupy the same
/// rectangle on screen.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct CellId {
    pub row: u32,
    pub col: u32,
}

impl CellId {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

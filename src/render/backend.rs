//! Render backend trait for pluggable rendering implementations.
//!
//! This module defines the `RenderBackend` trait that abstracts drawing
//! operations over the pictogram grid, plus the fill-resolution helpers
//! shared by the main canvas and the zoom panel.

use crate::color::{palette, PageColors, Rgb};
use crate::error::Result;
use crate::layout::GridGeometry;
use crate::state::{CellHighlight, InteractionState};
use crate::types::{CellId, GridConfig};
use std::collections::HashMap;

/// Data needed to render a single cell
#[derive(Debug, Clone)]
pub struct CellRenderData {
    pub cell: CellId,
    pub word: String,
    /// Index into the page color palette.
    pub page_idx: usize,
}

/// A resolved cell fill: CSS color plus alpha.
///
/// Highlights paint opaque; the page tint paints translucent over the
/// white base so the cell stays readable.
#[derive(Debug, Clone, PartialEq)]
pub struct CellFill {
    pub color: String,
    pub opacity: f64,
}

impl CellFill {
    /// The resting fill of an unhighlighted cell.
    pub fn base() -> Self {
        Self::opaque(palette::WHITE)
    }

    pub fn opaque(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            opacity: 1.0,
        }
    }
}

/// Map a cell highlight to its fill.
///
/// `page_color` only matters for the page overlay; a missing color falls
/// back to the base fill.
pub fn fill_for(highlight: CellHighlight, page_color: Option<Rgb>) -> CellFill {
    match highlight {
        CellHighlight::Hovered => CellFill::opaque(palette::HOVER_FILL),
        CellHighlight::Marked => CellFill::opaque(palette::MARK_FILL),
        CellHighlight::SearchMatch => CellFill::opaque(palette::SEARCH_FILL),
        CellHighlight::PageTint => page_color.map_or_else(CellFill::base, |rgb| CellFill {
            color: rgb.to_hex(),
            opacity: palette::PAGE_TINT_OPACITY,
        }),
        CellHighlight::Base => CellFill::base(),
    }
}

/// Label color with enough contrast against the fill.
///
/// Translucent fills composite over white and always end up light.
pub fn label_color(fill: &CellFill) -> &'static str {
    if fill.opacity < 1.0 {
        return palette::BLACK;
    }
    match Rgb::from_hex(&fill.color) {
        Some(rgb) if !rgb.is_light() => palette::WHITE,
        _ => palette::BLACK,
    }
}

/// Render parameters passed to the backend
pub struct RenderParams<'a> {
    pub cells: &'a [CellRenderData],
    /// Occupied-cell lookup into `cells`.
    pub cell_lookup: &'a HashMap<CellId, usize>,
    pub geometry: &'a GridGeometry,
    pub config: &'a GridConfig,
    pub state: &'a InteractionState,
    pub page_colors: &'a PageColors,
    pub dpr: f32,
}

impl RenderParams<'_> {
    /// The page color assigned to a cell's record, if any.
    pub fn page_color(&self, cell: CellId) -> Option<Rgb> {
        let idx = *self.cell_lookup.get(&cell)?;
        let data = self.cells.get(idx)?;
        self.page_colors.get(data.page_idx)
    }

    /// The current fill for a cell, hover included.
    pub fn fill(&self, cell: CellId) -> CellFill {
        fill_for(self.state.highlight_for(cell), self.page_color(cell))
    }

    /// The resting fill for a cell, hover excluded. The zoom panel mirrors
    /// these so the neighborhood shows marks and matches, not the hover.
    pub fn resting_fill(&self, cell: CellId) -> CellFill {
        fill_for(self.state.resting_highlight_for(cell), self.page_color(cell))
    }
}

/// Trait for render backends
///
/// Implementations handle the actual drawing operations for different
/// rendering technologies.
pub trait RenderBackend {
    /// Initialize the backend
    fn init(&mut self) -> Result<()>;

    /// Resize the render surface
    fn resize(&mut self, width: u32, height: u32, dpr: f32);

    /// Render a full frame with the given parameters
    fn render(&mut self, params: &RenderParams) -> Result<()>;

    /// Repaint only the given cells. Backends without partial repaint
    /// fall back to a full frame.
    fn render_cells(&mut self, params: &RenderParams, cells: &[CellId]) -> Result<()> {
        let _ = cells;
        self.render(params)
    }

    /// Get the current width
    fn width(&self) -> u32;

    /// Get the current height
    fn height(&self) -> u32;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_for_highlights() {
        assert_eq!(
            fill_for(CellHighlight::Hovered, None),
            CellFill::opaque(palette::HOVER_FILL)
        );
        assert_eq!(
            fill_for(CellHighlight::Marked, None),
            CellFill::opaque(palette::MARK_FILL)
        );
        assert_eq!(
            fill_for(CellHighlight::SearchMatch, None),
            CellFill::opaque(palette::SEARCH_FILL)
        );
        assert_eq!(fill_for(CellHighlight::Base, None), CellFill::base());
    }

    #[test]
    fn test_page_tint_is_translucent() {
        let fill = fill_for(CellHighlight::PageTint, Some(Rgb::new(0x10, 0x20, 0x30)));
        assert_eq!(fill.color, "#102030");
        assert_eq!(fill.opacity, palette::PAGE_TINT_OPACITY);
    }

    #[test]
    fn test_page_tint_without_color_falls_back() {
        assert_eq!(fill_for(CellHighlight::PageTint, None), CellFill::base());
    }

    #[test]
    fn test_label_contrast() {
        assert_eq!(label_color(&CellFill::base()), palette::BLACK);
        assert_eq!(label_color(&CellFill::opaque("#101010")), palette::WHITE);
        // Dark tints still composite light over the white base.
        let tint = fill_for(CellHighlight::PageTint, Some(Rgb::new(0, 0, 0)));
        assert_eq!(label_color(&tint), palette::BLACK);
    }
}

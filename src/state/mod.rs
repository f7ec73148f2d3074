//! Interaction state for a grid view session.
//!
//! One [`InteractionState`] instance lives per viewer. Transitions mutate
//! the state and report what changed as a [`Repaint`], so callers decide
//! when and how to redraw; nothing here touches the canvas.

use std::collections::HashSet;

use crate::types::{CellId, Dataset};

/// Visual class of a cell, resolved per cell from the current state.
///
/// Precedence is total, highest first: a hovered cell renders as hovered
/// even while marked; a marked cell stays marked when the search changes;
/// the page tint only shows through on otherwise-unstyled cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellHighlight {
    Hovered,
    Marked,
    SearchMatch,
    PageTint,
    Base,
}

/// What a transition changed, for the repaint path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repaint {
    /// Only these cells changed appearance.
    Cells(Vec<CellId>),
    /// Everything changed (overlay toggle, reset).
    Full,
}

impl Repaint {
    /// A transition that changed nothing visible.
    pub fn none() -> Self {
        Self::Cells(Vec::new())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::Cells(cells) if cells.is_empty())
    }
}

/// Session interaction state: search matches, sticky marks, the page
/// overlay flag, the zoom focus, and the transient hover.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    search_matches: HashSet<CellId>,
    marked: HashSet<CellId>,
    pages_overlay: bool,
    zoom_focus: Option<CellId>,
    hovered: Option<CellId>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the search matches with the cells whose word exactly
    /// equals `text`. Empty text clears the matches; an unknown word
    /// yields an empty set. Never an error.
    pub fn search(&mut self, text: &str, dataset: &Dataset) -> Repaint {
        let new_matches: HashSet<CellId> = if text.is_empty() {
            HashSet::new()
        } else {
            dataset.cells_for_word(text).iter().copied().collect()
        };
        if new_matches == self.search_matches {
            return Repaint::none();
        }
        // Old matches revert, new ones light up.
        let affected = self.search_matches.union(&new_matches).copied().collect();
        self.search_matches = new_matches;
        Repaint::Cells(affected)
    }

    /// Promote the current search matches to sticky marks. Idempotent;
    /// a no-op when there are no matches.
    pub fn mark_matches(&mut self) -> Repaint {
        let mut newly: Vec<CellId> = self
            .search_matches
            .difference(&self.marked)
            .copied()
            .collect();
        if newly.is_empty() {
            return Repaint::none();
        }
        newly.sort_unstable();
        self.marked.extend(newly.iter().copied());
        Repaint::Cells(newly)
    }

    /// Clear everything back to the initial state, zoom focus and hover
    /// included.
    pub fn reset(&mut self) -> Repaint {
        *self = Self::default();
        Repaint::Full
    }

    /// Flip the page-color overlay.
    pub fn toggle_pages_overlay(&mut self) -> Repaint {
        self.pages_overlay = !self.pages_overlay;
        Repaint::Full
    }

    /// Pointer entered a cell: it becomes the hover and the zoom focus.
    pub fn hover_enter(&mut self, cell: CellId) -> Repaint {
        if self.hovered == Some(cell) {
            return Repaint::none();
        }
        let mut affected = Vec::with_capacity(2);
        if let Some(prev) = self.hovered.replace(cell) {
            affected.push(prev);
        }
        affected.push(cell);
        self.zoom_focus = Some(cell);
        Repaint::Cells(affected)
    }

    /// Pointer left a cell. Only clears the hover and zoom focus if they
    /// still point at `cell`, so a leave event arriving after a newer
    /// enter is ignored.
    pub fn hover_leave(&mut self, cell: CellId) -> Repaint {
        if self.hovered != Some(cell) {
            return Repaint::none();
        }
        self.hovered = None;
        if self.zoom_focus == Some(cell) {
            self.zoom_focus = None;
        }
        Repaint::Cells(vec![cell])
    }

    /// The visual class of a cell under the full precedence order.
    pub fn highlight_for(&self, cell: CellId) -> CellHighlight {
        if self.hovered == Some(cell) {
            return CellHighlight::Hovered;
        }
        self.resting_highlight_for(cell)
    }

    /// The visual class ignoring hover: what the cell looks like once the
    /// pointer moves on. The zoom view mirrors this.
    pub fn resting_highlight_for(&self, cell: CellId) -> CellHighlight {
        if self.marked.contains(&cell) {
            CellHighlight::Marked
        } else if self.search_matches.contains(&cell) {
            CellHighlight::SearchMatch
        } else if self.pages_overlay {
            CellHighlight::PageTint
        } else {
            CellHighlight::Base
        }
    }

    pub fn search_matches(&self) -> &HashSet<CellId> {
        &self.search_matches
    }

    pub fn marked(&self) -> &HashSet<CellId> {
        &self.marked
    }

    pub fn pages_overlay(&self) -> bool {
        self.pages_overlay
    }

    pub fn zoom_focus(&self) -> Option<CellId> {
        self.zoom_focus
    }

    pub fn hovered(&self) -> Option<CellId> {
        self.hovered
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::layout::LayoutMode;
    use crate::types::PictogramRecord;

    fn dataset() -> Dataset {
        let records = vec![
            PictogramRecord::new("cat", 0, 0, "animals", ""),
            PictogramRecord::new("dog", 0, 1, "animals", ""),
            PictogramRecord::new("cat", 1, 0, "pets", ""),
        ];
        Dataset::build(records, LayoutMode::Flat)
    }

    #[test]
    fn test_search_then_clear() {
        let ds = dataset();
        let mut state = InteractionState::new();
        let repaint = state.search("cat", &ds);
        assert_eq!(state.search_matches().len(), 2);
        assert!(matches!(repaint, Repaint::Cells(cells) if cells.len() == 2));

        let repaint = state.search("", &ds);
        assert!(state.search_matches().is_empty());
        // The cleared cells still need repainting back to base.
        assert!(matches!(repaint, Repaint::Cells(cells) if cells.len() == 2));
    }

    #[test]
    fn test_search_unknown_word_is_empty_not_error() {
        let ds = dataset();
        let mut state = InteractionState::new();
        state.search("zebra", &ds);
        assert!(state.search_matches().is_empty());
    }

    #[test]
    fn test_mark_is_idempotent() {
        let ds = dataset();
        let mut state = InteractionState::new();
        state.search("cat", &ds);
        let first = state.mark_matches();
        assert!(matches!(first, Repaint::Cells(cells) if cells.len() == 2));
        let second = state.mark_matches();
        assert!(second.is_none());
        assert_eq!(state.marked().len(), 2);
    }

    #[test]
    fn test_mark_without_matches_is_noop() {
        let mut state = InteractionState::new();
        assert!(state.mark_matches().is_none());
        assert!(state.marked().is_empty());
    }

    #[test]
    fn test_hover_enter_replaces_previous() {
        let mut state = InteractionState::new();
        let a = CellId::new(0, 0);
        let b = CellId::new(0, 1);
        state.hover_enter(a);
        let repaint = state.hover_enter(b);
        assert_eq!(state.hovered(), Some(b));
        assert_eq!(state.zoom_focus(), Some(b));
        // Both the old and the new hover cell need repainting.
        assert_eq!(repaint, Repaint::Cells(vec![a, b]));
    }

    #[test]
    fn test_stale_hover_leave_ignored() {
        let mut state = InteractionState::new();
        let a = CellId::new(0, 0);
        let b = CellId::new(0, 1);
        state.hover_enter(a);
        state.hover_enter(b);
        // Leave for the old cell arrives late; the new hover must survive.
        let repaint = state.hover_leave(a);
        assert!(repaint.is_none());
        assert_eq!(state.hovered(), Some(b));
        assert_eq!(state.zoom_focus(), Some(b));
    }

    #[test]
    fn test_highlight_precedence() {
        let ds = dataset();
        let mut state = InteractionState::new();
        let cell = CellId::new(0, 0);

        state.toggle_pages_overlay();
        assert_eq!(state.highlight_for(cell), CellHighlight::PageTint);

        state.search("cat", &ds);
        assert_eq!(state.highlight_for(cell), CellHighlight::SearchMatch);

        state.mark_matches();
        assert_eq!(state.highlight_for(cell), CellHighlight::Marked);

        state.hover_enter(cell);
        assert_eq!(state.highlight_for(cell), CellHighlight::Hovered);
        // Resting view ignores the hover.
        assert_eq!(state.resting_highlight_for(cell), CellHighlight::Marked);
    }

    #[test]
    fn test_reset_clears_everything() {
        let ds = dataset();
        let mut state = InteractionState::new();
        state.search("cat", &ds);
        state.mark_matches();
        state.toggle_pages_overlay();
        state.hover_enter(CellId::new(0, 0));

        let repaint = state.reset();
        assert_eq!(repaint, Repaint::Full);
        assert!(state.search_matches().is_empty());
        assert!(state.marked().is_empty());
        assert!(!state.pages_overlay());
        assert_eq!(state.zoom_focus(), None);
        assert_eq!(state.hovered(), None);
    }
}

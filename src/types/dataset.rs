//! Dataset: parsed records plus everything derived from them in one pass.

use std::collections::HashMap;

use serde::Serialize;

use crate::layout::{GridDimensions, GridLayout, LayoutMode};
use crate::types::{CellId, PictogramRecord};

/// Insertion-ordered mapping from page name to a dense index.
///
/// The index order is first occurrence in the record stream; it drives both
/// tile placement and color assignment, so the two always agree on which
/// page is which.
#[derive(Debug, Clone, Default)]
pub struct PageIndex {
    names: Vec<String>,
    by_name: HashMap<String, usize>,
}

impl PageIndex {
    /// Build the index from records, in order of first occurrence.
    pub fn from_records(records: &[PictogramRecord]) -> Self {
        let mut index = Self::default();
        for record in records {
            if !index.by_name.contains_key(&record.page) {
                index
                    .by_name
                    .insert(record.page.clone(), index.names.len());
                index.names.push(record.page.clone());
            }
        }
        index
    }

    /// Dense index of a page, if known.
    pub fn index_of(&self, page: &str) -> Option<usize> {
        self.by_name.get(page).copied()
    }

    /// Number of distinct pages.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Page names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Parsed records together with the derived indexes the viewer needs:
/// page index, grid placement, cell occupancy, and the word search index.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<PictogramRecord>,
    pages: PageIndex,
    dims: GridDimensions,
    /// Final grid cell per record (parallel to `records`).
    placements: Vec<CellId>,
    /// Final cell -> record index. On collisions the later record wins.
    occupancy: HashMap<CellId, usize>,
    /// Word -> cells whose visible record carries that word.
    words: HashMap<String, Vec<CellId>>,
    duplicates: usize,
}

/// Summary counts for diagnostics (CLI output, JS-side inspection).
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub pages: usize,
    pub duplicates: usize,
    pub num_rows: u32,
    pub num_cols: u32,
}

impl Dataset {
    /// Build a dataset from records under the given layout mode.
    ///
    /// Records landing on an already-occupied cell overwrite it (last one
    /// wins); the number of overwritten cells is kept in `duplicates` so
    /// collisions stay visible without being fatal.
    pub fn build(records: Vec<PictogramRecord>, mode: LayoutMode) -> Self {
        let pages = PageIndex::from_records(&records);
        let layout = GridLayout::compute(&records, &pages, mode);

        let mut placements = Vec::with_capacity(records.len());
        let mut occupancy: HashMap<CellId, usize> = HashMap::with_capacity(records.len());
        let mut duplicates = 0;
        for (idx, record) in records.iter().enumerate() {
            let cell = layout.place(record, &pages);
            if occupancy.insert(cell, idx).is_some() {
                duplicates += 1;
            }
            placements.push(cell);
        }

        // Index words by the cell's visible (winning) record, so a search
        // never highlights a cell that displays a different word.
        let mut words: HashMap<String, Vec<CellId>> = HashMap::new();
        for (&cell, &idx) in &occupancy {
            if let Some(record) = records.get(idx) {
                words.entry(record.word.clone()).or_default().push(cell);
            }
        }
        for cells in words.values_mut() {
            cells.sort_unstable();
        }

        Self {
            records,
            pages,
            dims: *layout.dims(),
            placements,
            occupancy,
            words,
            duplicates,
        }
    }

    pub fn records(&self) -> &[PictogramRecord] {
        &self.records
    }

    /// Take the records back out, dropping the derived indexes. Used when
    /// re-laying out the same data under a different mode.
    pub fn into_records(self) -> Vec<PictogramRecord> {
        self.records
    }

    pub fn pages(&self) -> &PageIndex {
        &self.pages
    }

    pub fn dims(&self) -> &GridDimensions {
        &self.dims
    }

    /// Final grid cell per record, parallel to `records()`.
    pub fn placements(&self) -> &[CellId] {
        &self.placements
    }

    /// Cells whose visible record's word exactly equals `word`.
    /// Unknown words yield an empty slice, never an error.
    pub fn cells_for_word(&self, word: &str) -> &[CellId] {
        self.words.get(word).map_or(&[], Vec::as_slice)
    }

    /// The record visible at a final grid cell, if any.
    pub fn record_at(&self, cell: CellId) -> Option<&PictogramRecord> {
        self.occupancy
            .get(&cell)
            .and_then(|&idx| self.records.get(idx))
    }

    pub fn is_occupied(&self, cell: CellId) -> bool {
        self.occupancy.contains_key(&cell)
    }

    /// Iterate every occupied cell with its visible record, in no
    /// particular order.
    pub fn visible_cells(&self) -> impl Iterator<Item = (CellId, &PictogramRecord)> {
        self.occupancy
            .iter()
            .filter_map(|(&cell, &idx)| self.records.get(idx).map(|record| (cell, record)))
    }

    /// Number of records that were overwritten by a later record on the
    /// same final cell.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            records: self.records.len(),
            pages: self.pages.len(),
            duplicates: self.duplicates,
            num_rows: self.dims.num_rows,
            num_cols: self.dims.num_cols,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn record(word: &str, row: u32, col: u32, page: &str) -> PictogramRecord {
        PictogramRecord::new(word, row, col, page, "")
    }

    #[test]
    fn test_page_index_first_occurrence_order() {
        let records = vec![
            record("a", 0, 0, "animals"),
            record("b", 0, 1, "food"),
            record("c", 1, 0, "animals"),
            record("d", 1, 1, "places"),
        ];
        let pages = PageIndex::from_records(&records);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages.index_of("animals"), Some(0));
        assert_eq!(pages.index_of("food"), Some(1));
        assert_eq!(pages.index_of("places"), Some(2));
        assert_eq!(pages.index_of("missing"), None);
    }

    #[test]
    fn test_duplicate_cells_last_record_wins() {
        let records = vec![
            record("first", 0, 0, "p"),
            record("second", 0, 0, "p"),
        ];
        let ds = Dataset::build(records, LayoutMode::Flat);
        assert_eq!(ds.duplicates(), 1);
        assert_eq!(ds.record_at(CellId::new(0, 0)).unwrap().word, "second");
        // The word index follows the winner.
        assert!(ds.cells_for_word("first").is_empty());
        assert_eq!(ds.cells_for_word("second"), &[CellId::new(0, 0)]);
    }

    #[test]
    fn test_word_index_multiple_cells_sorted() {
        let records = vec![
            record("go", 2, 3, "p"),
            record("go", 0, 1, "p"),
            record("stop", 1, 1, "p"),
        ];
        let ds = Dataset::build(records, LayoutMode::Flat);
        assert_eq!(
            ds.cells_for_word("go"),
            &[CellId::new(0, 1), CellId::new(2, 3)]
        );
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::build(Vec::new(), LayoutMode::Flat);
        assert!(ds.is_empty());
        assert_eq!(ds.dims().num_rows, 0);
        assert_eq!(ds.dims().num_cols, 0);
        assert!(ds.cells_for_word("anything").is_empty());
        assert!(ds.record_at(CellId::new(0, 0)).is_none());
    }
}

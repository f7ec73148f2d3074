//! Layout integration tests.
//!
//! Covers CSV ingestion through final grid placement: flat extents, paged
//! tiling under both arrangements, tile gutters, duplicate collisions, the
//! word index, and the pixel geometry built on top of the placed grid.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{csv_bytes, csv_bytes_with_ids, sample_csv, synthetic_records};
use pictoview::layout::{GridGeometry, LayoutMode, TileArrangement};
use pictoview::types::{CellId, Dataset, GridConfig};
use pictoview::PictoView;
use std::collections::HashSet;
use test_case::test_case;

// ============================================================================
// CSV Parsing
// ============================================================================

#[test]
fn test_parse_sample_csv() {
    let records = pictoview::csv::parse_records(&sample_csv()).unwrap();
    assert_eq!(records.len(), 5);
    assert_eq!(records[0].word, "alpha");
    assert_eq!(records[0].row, 0);
    assert_eq!(records[0].col, 0);
    assert_eq!(records[0].page, "intro");
    // No identifier column in the fixture.
    assert_eq!(records[0].identifier, "");
}

#[test]
fn test_parse_csv_with_identifiers() {
    let data = csv_bytes_with_ids(&[("cat", 0, 0, "animals", "pic_001")]);
    let records = pictoview::csv::parse_records(&data).unwrap();
    assert_eq!(records[0].identifier, "pic_001");
}

#[test]
fn test_parse_rejects_missing_column() {
    let err = pictoview::csv::parse_records(b"word,row,col\na,0,0").unwrap_err();
    assert!(
        err.to_string().contains("'page'"),
        "error should name the missing column: {err}"
    );
}

#[test]
fn test_parse_rejects_bad_coordinate() {
    let data = csv_bytes(&[("a", 0, 0, "p")]);
    let mut text = String::from_utf8(data).unwrap();
    text.push_str("b,minus,1,p\n");
    let err = pictoview::csv::parse_records(text.as_bytes()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("line 3"), "got: {msg}");
    assert!(msg.contains("non-negative integer"), "got: {msg}");
}

// ============================================================================
// Flat Layout
// ============================================================================

#[test]
fn test_flat_extent_is_coordinate_maxima() {
    let data = csv_bytes(&[("a", 0, 0, "p"), ("b", 4, 9, "p"), ("c", 2, 3, "q")]);
    let records = pictoview::csv::parse_records(&data).unwrap();
    let dataset = Dataset::build(records, LayoutMode::Flat);
    assert_eq!(dataset.dims().num_rows, 5);
    assert_eq!(dataset.dims().num_cols, 10);
    // Flat placement is the identity on record coordinates.
    assert_eq!(dataset.placements()[1], CellId::new(4, 9));
}

#[test]
fn test_flat_sparse_cells_are_unoccupied() {
    let data = csv_bytes(&[("a", 0, 0, "p"), ("b", 3, 3, "p")]);
    let records = pictoview::csv::parse_records(&data).unwrap();
    let dataset = Dataset::build(records, LayoutMode::Flat);
    assert!(dataset.is_occupied(CellId::new(0, 0)));
    assert!(dataset.is_occupied(CellId::new(3, 3)));
    assert!(!dataset.is_occupied(CellId::new(1, 1)));
    assert_eq!(dataset.record_at(CellId::new(2, 2)), None);
}

#[test]
fn test_duplicate_coordinates_last_record_wins() {
    let data = csv_bytes(&[("first", 1, 1, "p"), ("second", 1, 1, "p")]);
    let records = pictoview::csv::parse_records(&data).unwrap();
    let dataset = Dataset::build(records, LayoutMode::Flat);
    assert_eq!(dataset.duplicates(), 1);
    common::assert_word_at(&dataset, CellId::new(1, 1), "second");
    // The shadowed word is not searchable: its cell displays "second".
    assert!(dataset.cells_for_word("first").is_empty());
    assert_eq!(dataset.cells_for_word("second"), &[CellId::new(1, 1)]);
}

#[test]
fn test_word_index_spans_pages() {
    let records = pictoview::csv::parse_records(&sample_csv()).unwrap();
    let dataset = Dataset::build(records, LayoutMode::Flat);
    let cells = dataset.cells_for_word("alpha");
    assert_eq!(cells, &[CellId::new(0, 0), CellId::new(1, 1)]);
    assert!(dataset.cells_for_word("nonexistent").is_empty());
}

// ============================================================================
// Paged Layout
// ============================================================================

#[test_case(1, 1, 1; "one page fills one tile")]
#[test_case(2, 2, 2; "two pages round up to a 2x2 tile grid")]
#[test_case(4, 2, 2; "four pages fit exactly")]
#[test_case(5, 3, 3; "five pages round up to 3x3")]
#[test_case(9, 3, 3; "nine pages fit exactly")]
#[test_case(10, 4, 4; "ten pages round up to 4x4")]
fn test_square_by_pages_tile_grid(pages: u32, want_x: u32, want_y: u32) {
    let records = synthetic_records(pages * 4, 4, 2);
    let dataset = Dataset::build(records, LayoutMode::paged());
    assert_eq!(dataset.dims().grid_dim_x, want_x);
    assert_eq!(dataset.dims().grid_dim_y, want_y);
}

#[test]
fn test_paged_tiles_offset_by_page_index() {
    // Two pages of 2x2 cells: page tiles sit side by side.
    let data = csv_bytes(&[
        ("a", 0, 0, "one"),
        ("b", 1, 1, "one"),
        ("c", 0, 0, "two"),
        ("d", 1, 1, "two"),
    ]);
    let records = pictoview::csv::parse_records(&data).unwrap();
    let dataset = Dataset::build(records, LayoutMode::paged());
    assert_eq!(dataset.dims().page_dim_x, 2);
    assert_eq!(dataset.dims().page_dim_y, 2);
    // "two" is page index 1 -> tile (0, 1) -> col offset 2.
    assert_eq!(dataset.placements()[2], CellId::new(0, 2));
    assert_eq!(dataset.placements()[3], CellId::new(1, 3));
    common::assert_word_at(&dataset, CellId::new(0, 2), "c");
}

#[test]
fn test_paged_page_order_is_first_occurrence() {
    let data = csv_bytes(&[("a", 0, 0, "zebra"), ("b", 0, 0, "aardvark")]);
    let records = pictoview::csv::parse_records(&data).unwrap();
    let dataset = Dataset::build(records, LayoutMode::paged());
    assert_eq!(dataset.pages().names(), ["zebra", "aardvark"]);
    assert_eq!(dataset.pages().index_of("aardvark"), Some(1));
    // "aardvark" tiles after "zebra" despite sorting before it.
    assert_eq!(dataset.placements()[1], CellId::new(0, 1));
}

#[test]
fn test_square_by_records_rows_grow_past_square() {
    // 10 pages, one record each: 10 records -> ceil_sqrt(ceil_sqrt(10)) = 2
    // tiles per row, so 5 tile rows.
    let records = synthetic_records(10, 1, 1);
    let mode = LayoutMode::Paged {
        arrangement: TileArrangement::SquareByRecords,
        tile_gap: 0,
    };
    let dataset = Dataset::build(records, mode);
    assert_eq!(dataset.dims().grid_dim_x, 2);
    assert_eq!(dataset.dims().grid_dim_y, 5);
    assert_eq!(dataset.dims().num_cols, 2);
    assert_eq!(dataset.dims().num_rows, 5);
}

#[test_case(TileArrangement::SquareByPages, 0; "square by pages")]
#[test_case(TileArrangement::SquareByPages, 1; "square by pages with gutter")]
#[test_case(TileArrangement::SquareByRecords, 0; "square by records")]
#[test_case(TileArrangement::SquareByRecords, 1; "square by records with gutter")]
fn test_paged_placements_never_collide(arrangement: TileArrangement, tile_gap: u32) {
    // Distinct (row, col, page) inputs must keep distinct final cells,
    // whatever tile grid the arrangement picks.
    for pages in 1..=12 {
        for &(page_size, cols) in &[(1, 1), (4, 2), (5, 3), (12, 4)] {
            let records = synthetic_records(pages * page_size, page_size, cols);
            let dataset = Dataset::build(
                records,
                LayoutMode::Paged {
                    arrangement,
                    tile_gap,
                },
            );
            assert_eq!(
                dataset.duplicates(),
                0,
                "{arrangement:?} gap {tile_gap}: {pages} pages of {page_size} collided"
            );
            let distinct: HashSet<CellId> = dataset.placements().iter().copied().collect();
            assert_eq!(
                distinct.len(),
                dataset.placements().len(),
                "{arrangement:?} gap {tile_gap}: {pages} pages of {page_size} share a cell"
            );
        }
    }
}

#[test]
fn test_tile_gap_leaves_unoccupied_gutter() {
    let data = csv_bytes(&[("a", 0, 0, "one"), ("b", 0, 0, "two")]);
    let records = pictoview::csv::parse_records(&data).unwrap();
    let mode = LayoutMode::Paged {
        arrangement: TileArrangement::SquareByPages,
        tile_gap: 1,
    };
    let dataset = Dataset::build(records, mode);
    // 1x1 sub-grids, 2x2 tiles, 1-cell gutter: 3 cells per axis.
    assert_eq!(dataset.dims().num_cols, 3);
    assert_eq!(dataset.placements()[0], CellId::new(0, 0));
    assert_eq!(dataset.placements()[1], CellId::new(0, 2));
    // The gutter column stays empty.
    assert!(!dataset.is_occupied(CellId::new(0, 1)));
}

#[test]
fn test_relayout_preserves_records() {
    let records = pictoview::csv::parse_records(&sample_csv()).unwrap();
    let flat = Dataset::build(records.clone(), LayoutMode::Flat);
    let paged = Dataset::build(flat.into_records(), LayoutMode::paged());
    assert_eq!(paged.records(), &records[..]);
    assert_eq!(paged.pages().len(), 2);
}

#[test]
fn test_empty_input_builds_empty_dataset() {
    let dataset = Dataset::build(Vec::new(), LayoutMode::paged());
    assert!(dataset.is_empty());
    assert_eq!(dataset.dims().num_cols, 0);
    assert_eq!(dataset.visible_cells().count(), 0);
}

// ============================================================================
// Pixel Geometry
// ============================================================================

#[test]
fn test_geometry_covers_inner_area() {
    let data = csv_bytes(&[("a", 0, 0, "p"), ("b", 5, 5, "p")]);
    let records = pictoview::csv::parse_records(&data).unwrap();
    let dataset = Dataset::build(records, LayoutMode::Flat);
    let config = GridConfig::default();
    let geometry = GridGeometry::new(&config, dataset.dims());

    assert_eq!(geometry.x.origin(), config.margin.left);
    assert_eq!(geometry.x.end(), config.margin.left + config.inner_width());
    assert_eq!(geometry.x.count(), 6);
}

#[test]
fn test_geometry_rect_and_hit_test_agree() {
    let records = synthetic_records(9, 9, 3);
    let dataset = Dataset::build(records, LayoutMode::Flat);
    let config = GridConfig::default();
    let geometry = GridGeometry::new(&config, dataset.dims());

    for (cell, _) in dataset.visible_cells() {
        let rect = geometry.rect(cell);
        let hit = geometry.cell_at(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
        assert_eq!(hit, Some(cell), "center of {cell:?} must hit itself");
    }
}

#[test]
fn test_geometry_margin_misses() {
    let records = synthetic_records(4, 4, 2);
    let dataset = Dataset::build(records, LayoutMode::Flat);
    let config = GridConfig::default();
    let geometry = GridGeometry::new(&config, dataset.dims());

    assert_eq!(geometry.cell_at(0.0, 0.0), None);
    assert_eq!(geometry.cell_at(config.width - 1.0, config.height / 2.0), None);
    assert_eq!(
        geometry.cell_at(config.margin.left, config.margin.top),
        Some(CellId::new(0, 0))
    );
}

// ============================================================================
// Viewer Surface
// ============================================================================

#[test]
fn test_viewer_load_builds_summary() {
    let mut viewer = PictoView::new_test(720, 720, 1.0);
    viewer.load(&sample_csv()).unwrap();
    let summary = viewer.summary().unwrap();
    assert_eq!(summary.records, 5);
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.duplicates, 0);
    assert_eq!(summary.num_rows, 3);
    assert_eq!(summary.num_cols, 3);
}

#[test]
fn test_viewer_load_rejects_bad_csv() {
    let mut viewer = PictoView::new_test(720, 720, 1.0);
    let err = viewer.load(b"not,a,picto,header\n1,2,3,4").unwrap_err();
    assert!(err.to_string().contains("CSV parsing"));
    // A failed load leaves the viewer empty rather than half-loaded.
    assert!(viewer.dataset().is_none());
}

#[test]
fn test_viewer_set_layout_mode_relayouts() {
    let mut viewer = PictoView::new_test(720, 720, 1.0);
    viewer.load(&sample_csv()).unwrap();
    let flat_cols = viewer.summary().unwrap().num_cols;

    viewer.set_layout_mode(LayoutMode::paged());
    let paged = viewer.summary().unwrap();
    // 2 pages of 3x3 cells tile to a 2x2 super-grid.
    assert_eq!(paged.num_cols, 6);
    assert_ne!(paged.num_cols, flat_cols);
    assert_eq!(paged.records, 5);

    viewer.set_layout_mode(LayoutMode::Flat);
    assert_eq!(viewer.summary().unwrap().num_cols, flat_cols);
}

//! Common test utilities for building CSV fixtures in memory.
//!
//! Integration tests drive the public API with small synthetic datasets;
//! these helpers build the CSV bytes so individual tests stay focused on
//! behavior instead of string plumbing.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use pictoview::types::{CellId, PictogramRecord};

// ============================================================================
// CSV Builders
// ============================================================================

/// Build CSV bytes from `(word, row, col, page)` tuples, identifiers omitted.
#[must_use]
pub fn csv_bytes(rows: &[(&str, u32, u32, &str)]) -> Vec<u8> {
    let mut out = String::from("word,row,col,page\n");
    for (word, row, col, page) in rows {
        out.push_str(&format!("{word},{row},{col},{page}\n"));
    }
    out.into_bytes()
}

/// Build CSV bytes from `(word, row, col, page, identifier)` tuples.
#[must_use]
pub fn csv_bytes_with_ids(rows: &[(&str, u32, u32, &str, &str)]) -> Vec<u8> {
    let mut out = String::from("word,row,col,page,identifier\n");
    for (word, row, col, page, id) in rows {
        out.push_str(&format!("{word},{row},{col},{page},{id}\n"));
    }
    out.into_bytes()
}

/// A small fixed dataset used across suites: two pages, four words,
/// one word appearing twice.
#[must_use]
pub fn sample_csv() -> Vec<u8> {
    csv_bytes(&[
        ("alpha", 0, 0, "intro"),
        ("beta", 0, 1, "intro"),
        ("gamma", 1, 0, "intro"),
        ("alpha", 1, 1, "outro"),
        ("delta", 2, 2, "outro"),
    ])
}

/// Records parsed from [`sample_csv`], for tests that skip the CSV layer.
#[must_use]
pub fn sample_records() -> Vec<PictogramRecord> {
    pictoview::csv::parse_records(&sample_csv()).expect("sample CSV must parse")
}

/// Generate `count` records filling pages of `page_size` cells in
/// row-major order, one page per `page_size` records.
#[must_use]
pub fn synthetic_records(count: u32, page_size: u32, cols: u32) -> Vec<PictogramRecord> {
    (0..count)
        .map(|i| {
            let within = i % page_size;
            PictogramRecord {
                word: format!("word{i}"),
                row: within / cols,
                col: within % cols,
                page: format!("page{}", i / page_size),
                identifier: String::new(),
            }
        })
        .collect()
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert a cell holds the given word in the dataset.
pub fn assert_word_at(dataset: &pictoview::types::Dataset, cell: CellId, word: &str) {
    let record = dataset
        .record_at(cell)
        .unwrap_or_else(|| panic!("expected a record at {cell:?}"));
    assert_eq!(record.word, word, "wrong word at {cell:?}");
}

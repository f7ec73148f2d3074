//! CLI tool for pictoview - lays out pictogram CSV files and outputs JSON
//!
//! Usage:
//!   pictoview_cli <input.csv>              # Output JSON to stdout
//!   pictoview_cli <input.csv> -o out.json  # Output JSON to file
//!   pictoview_cli <input.csv> --paged      # Tile pages instead of flat layout

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use serde::Serialize;

use pictoview::csv;
use pictoview::layout::LayoutMode;
use pictoview::types::{Dataset, DatasetSummary};

#[derive(Serialize)]
struct Placement<'a> {
    word: &'a str,
    page: &'a str,
    row: u32,
    col: u32,
}

#[derive(Serialize)]
struct GridReport<'a> {
    summary: DatasetSummary,
    placements: Vec<Placement<'a>>,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: pictoview_cli <input.csv> [-o output.json] [--paged]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let mut output_path: Option<&String> = None;
    let mut paged = false;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-o" => {
                if i + 1 >= args.len() {
                    eprintln!("Missing path after -o");
                    std::process::exit(1);
                }
                output_path = Some(&args[i + 1]);
                i += 2;
            }
            "--paged" => {
                paged = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
    }

    // Read input file
    let data = match fs::read(input_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    // Parse CSV
    let records = match csv::parse_records(&data) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error parsing CSV: {}", e);
            std::process::exit(1);
        }
    };

    // Lay out the grid
    let mode = if paged {
        LayoutMode::paged()
    } else {
        LayoutMode::Flat
    };
    let dataset = Dataset::build(records, mode);

    let placements: Vec<Placement> = dataset
        .records()
        .iter()
        .zip(dataset.placements())
        .map(|(record, cell)| Placement {
            word: &record.word,
            page: &record.page,
            row: cell.row,
            col: cell.col,
        })
        .collect();
    let report = GridReport {
        summary: dataset.summary(),
        placements,
    };

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&report) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}

//! Minimal CSV parser that produces [`PictogramRecord`]s.
//!
//! The expected input is comma-separated with a header row naming the
//! columns `word`, `row`, `col`, `page`, `identifier` (any column order;
//! `identifier` may be absent). Fields follow RFC-4180 quoting.

use crate::error::{PictoviewError, Result};
use crate::types::PictogramRecord;

/// Column positions resolved from the header row.
struct HeaderMap {
    word: usize,
    row: usize,
    col: usize,
    page: usize,
    identifier: Option<usize>,
}

impl HeaderMap {
    fn from_fields(fields: &[String]) -> Result<Self> {
        let find = |name: &str| fields.iter().position(|f| f.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                PictoviewError::Csv(format!("header row is missing the '{name}' column"))
            })
        };
        Ok(Self {
            word: require("word")?,
            row: require("row")?,
            col: require("col")?,
            page: require("page")?,
            identifier: find("identifier"),
        })
    }
}

/// Parse CSV bytes into pictogram records.
///
/// Blank lines are skipped. A row missing a required field, or carrying a
/// non-numeric `row`/`col`, is an error naming the offending line (1-based,
/// counting the header).
pub fn parse_records(data: &[u8]) -> Result<Vec<PictogramRecord>> {
    let text = String::from_utf8_lossy(data);
    let mut lines = text.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break HeaderMap::from_fields(&split_csv_line(line, ','))?,
            None => return Ok(Vec::new()),
        }
    };

    let mut records = Vec::new();
    for (line_idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_csv_line(line, ',');
        let line_no = line_idx + 1;

        let field = |pos: usize, name: &str| {
            fields.get(pos).map(|f| f.trim()).ok_or_else(|| {
                PictoviewError::Csv(format!("line {line_no}: missing '{name}' field"))
            })
        };
        let numeric = |pos: usize, name: &str| -> Result<u32> {
            let raw = field(pos, name)?;
            raw.parse::<u32>().map_err(|_| {
                PictoviewError::Csv(format!(
                    "line {line_no}: '{name}' must be a non-negative integer, got '{raw}'"
                ))
            })
        };

        records.push(PictogramRecord {
            word: field(header.word, "word")?.to_string(),
            row: numeric(header.row, "row")?,
            col: numeric(header.col, "col")?,
            page: field(header.page, "page")?.to_string(),
            identifier: header
                .identifier
                .and_then(|pos| fields.get(pos))
                .map(|f| f.trim().to_string())
                .unwrap_or_default(),
        });
    }

    Ok(records)
}

/// Split a CSV line respecting quoted fields.
fn split_csv_line(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(current.clone());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let data = b"word,row,col,page,identifier\ncat,0,1,animals,pic_001\ndog,1,1,animals,pic_002";
        let records = parse_records(data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].word, "cat");
        assert_eq!(records[0].row, 0);
        assert_eq!(records[0].col, 1);
        assert_eq!(records[0].page, "animals");
        assert_eq!(records[0].identifier, "pic_001");
        assert_eq!(records[1].word, "dog");
    }

    #[test]
    fn test_parse_reordered_headers() {
        let data = b"page,identifier,col,row,word\nhome,x1,2,3,hello";
        let records = parse_records(data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].word, "hello");
        assert_eq!(records[0].row, 3);
        assert_eq!(records[0].col, 2);
        assert_eq!(records[0].page, "home");
    }

    #[test]
    fn test_parse_quoted_word() {
        let data = b"word,row,col,page,identifier\n\"hello, world\",0,0,p,\"\"\"x\"\"\"";
        let records = parse_records(data).unwrap();
        assert_eq!(records[0].word, "hello, world");
        assert_eq!(records[0].identifier, "\"x\"");
    }

    #[test]
    fn test_parse_missing_identifier_column() {
        let data = b"word,row,col,page\ncat,0,0,animals";
        let records = parse_records(data).unwrap();
        assert_eq!(records[0].identifier, "");
    }

    #[test]
    fn test_parse_missing_required_header() {
        let data = b"word,row,col\ncat,0,0";
        let err = parse_records(data).unwrap_err();
        assert!(err.to_string().contains("'page'"));
    }

    #[test]
    fn test_parse_non_numeric_row() {
        let data = b"word,row,col,page\ncat,abc,0,animals";
        let err = parse_records(data).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 2"), "unexpected message: {msg}");
        assert!(msg.contains("'row'"), "unexpected message: {msg}");
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let data = b"\nword,row,col,page\n\ncat,0,0,animals\n\n";
        let records = parse_records(data).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_crlf() {
        let data = b"word,row,col,page\r\ncat,0,0,animals\r\ndog,0,1,animals\r\n";
        let records = parse_records(data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].word, "dog");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_records(b"").unwrap().is_empty());
    }

    #[test]
    fn test_split_csv_line_quotes() {
        let fields = split_csv_line("\"a,b\",c,\"d\"\"e\"", ',');
        assert_eq!(fields, vec!["a,b", "c", "d\"e"]);
    }
}

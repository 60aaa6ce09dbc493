//! FILENAME: core/engine/src/table.rs
//! PURPOSE: The raw tabular dataset as delivered by a data source.
//! CONTEXT: A header row plus rows of loosely typed cells. Rows may be ragged;
//! positions past the end of a row read as empty. The table is never mutated
//! after loading; the normalizer derives a typed `Dataset` from it.

use crate::cell::CellValue;

static EMPTY: CellValue = CellValue::Empty;

/// Header names plus data rows. Row and column indices are 0-based and
/// exclude the header row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Creates an empty table with the given headers.
    pub fn new(headers: Vec<String>) -> Self {
        Table {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Table { headers, rows }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Finds a column by header name. Exact matches win; otherwise the first
    /// header equal to `name` ignoring case and surrounding whitespace.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        if let Some(idx) = self.headers.iter().position(|h| h == name) {
            return Some(idx);
        }
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    }

    /// Retrieves the cell at (row, col). Out-of-range positions are empty.
    pub fn value(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}

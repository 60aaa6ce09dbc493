//! FILENAME: core/persistence/src/csv_reader.rs
//! PURPOSE: Reads CSV exports (e.g. a published spreadsheet) into a raw table.

use crate::PersistenceError;
use engine::{CellValue, Table};
use std::io::Read;
use std::path::Path;

pub fn load_csv(path: &Path) -> Result<Table, PersistenceError> {
    let file = std::fs::File::open(path)?;
    read_csv(file, &path.display().to_string())
}

/// Reads CSV data with a header row. Ragged rows are accepted.
pub fn read_csv<R: Read>(reader: R, origin: &str) -> Result<Table, PersistenceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(PersistenceError::EmptySource(origin.to_string()));
    }

    let mut table = Table::new(headers);
    for record in rdr.records() {
        let record = record?;
        table.push_row(record.iter().map(parse_field).collect());
    }

    Ok(table)
}

/// Tokens read as missing, as spreadsheet and dataframe exports write them.
const NA_TOKENS: [&str; 17] = [
    "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Spreadsheet error literals. Read as error cells, like the XLSX path.
const ERROR_LITERALS: [&str; 8] = [
    "#N/A", "#REF!", "#VALUE!", "#DIV/0!", "#NAME?", "#NUM!", "#NULL!", "#ERROR!",
];

fn parse_field(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() || NA_TOKENS.contains(&trimmed) {
        return CellValue::Empty;
    }
    if ERROR_LITERALS.contains(&trimmed) {
        return CellValue::Error(trimmed.to_string());
    }
    // Numbers only when the text is their canonical form, so codes such as
    // "007" or "1.50" keep their formatting. Numeric text still parses later.
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() && CellValue::Number(n).display_value() == trimmed => {
            CellValue::Number(n)
        }
        _ => CellValue::Text(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_text_and_blanks() {
        let data = "unit,layer,Age,Years\nHQ,L1,30,2.5\nPlant,,41,\n";
        let table = read_csv(data.as_bytes(), "inline").unwrap();
        assert_eq!(table.headers(), &["unit", "layer", "Age", "Years"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.value(0, 0), &CellValue::text("HQ"));
        assert_eq!(table.value(0, 3), &CellValue::Number(2.5));
        assert_eq!(table.value(1, 1), &CellValue::Empty);
        assert_eq!(table.value(1, 3), &CellValue::Empty);
    }

    #[test]
    fn ragged_rows_are_accepted() {
        let data = "unit,region\nHQ\nPlant,Java\n";
        let table = read_csv(data.as_bytes(), "inline").unwrap();
        assert_eq!(table.row_count(), 2);
        assert!(table.value(0, 1).is_missing());
    }

    #[test]
    fn byte_order_mark_is_stripped() {
        let data = "\u{feff}unit\nHQ\n";
        let table = read_csv(data.as_bytes(), "inline").unwrap();
        assert_eq!(table.column_index("unit"), Some(0));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = read_csv("".as_bytes(), "inline").unwrap_err();
        assert!(matches!(err, PersistenceError::EmptySource(_)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("employees.csv");
        std::fs::write(&path, "unit,gender\nHQ,Male\n").unwrap();
        let table = load_csv(&path).unwrap();
        assert_eq!(table.value(0, 1), &CellValue::text("Male"));
    }

    #[test]
    fn missing_markers_read_as_missing() {
        let data = "unit,layer\nHQ,#N/A\nHQ,NaN\nHQ,null\nHQ,N/A\nHQ,#REF!\nHQ,N-A\n";
        let table = read_csv(data.as_bytes(), "inline").unwrap();
        assert_eq!(table.value(0, 1), &CellValue::Error("#N/A".to_string()));
        assert_eq!(table.value(1, 1), &CellValue::Empty);
        assert_eq!(table.value(2, 1), &CellValue::Empty);
        assert_eq!(table.value(3, 1), &CellValue::Empty);
        assert_eq!(table.value(4, 1), &CellValue::Error("#REF!".to_string()));
        // The sentinel itself is an ordinary value
        assert_eq!(table.value(5, 1), &CellValue::text("N-A"));
    }

    #[test]
    fn missing_layers_normalize_to_sentinel() {
        let data = "unit,layer\nHQ,#N/A\nHQ,NaN\nHQ,\nHQ,L1\n";
        let table = read_csv(data.as_bytes(), "inline").unwrap();
        let dataset = engine::normalize(&table, &engine::ColumnMap::default()).unwrap();
        let layers: Vec<_> = dataset.records().iter().map(|r| r.layer.as_deref()).collect();
        assert_eq!(layers, vec![Some("N-A"), Some("N-A"), Some("N-A"), Some("L1")]);
        assert_eq!(dataset.report().layer_filled, 3);
    }

    #[test]
    fn code_formatting_is_preserved() {
        let data = "unit,Age,Years\n007,30,1.50\n";
        let table = read_csv(data.as_bytes(), "inline").unwrap();
        assert_eq!(table.value(0, 0), &CellValue::text("007"));
        assert_eq!(table.value(0, 1), &CellValue::Number(30.0));
        assert_eq!(table.value(0, 2), &CellValue::text("1.50"));
        assert_eq!(table.value(0, 2).as_number(), Some(1.5));
    }
}

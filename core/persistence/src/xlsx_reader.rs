//! FILENAME: core/persistence/src/xlsx_reader.rs

use crate::PersistenceError;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use engine::{CellValue, Table};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Loads one worksheet of an XLSX file. The first row holds the headers.
/// `sheet` selects a worksheet by name; `None` picks the first one.
pub fn load_xlsx(path: &Path, sheet: Option<&str>) -> Result<Table, PersistenceError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    read_worksheet(&mut workbook, sheet, &path.display().to_string())
}

/// Reads an XLSX workbook held in memory (e.g. an HTTP response body).
pub fn read_xlsx_bytes(bytes: Vec<u8>, sheet: Option<&str>) -> Result<Table, PersistenceError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    read_worksheet(&mut workbook, sheet, "<memory>")
}

fn read_worksheet<RS: Read + Seek>(
    workbook: &mut Xlsx<RS>,
    sheet: Option<&str>,
    origin: &str,
) -> Result<Table, PersistenceError> {
    let sheet_names = workbook.sheet_names().to_vec();

    if sheet_names.is_empty() {
        return Err(PersistenceError::InvalidFormat(
            "Workbook contains no sheets".to_string(),
        ));
    }

    let sheet_name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|s| s.as_str() == name)
            .cloned()
            .ok_or_else(|| PersistenceError::SheetNotFound(name.to_string()))?,
        None => sheet_names[0].clone(),
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| PersistenceError::InvalidFormat(e.to_string()))?;

    range_to_table(&range, origin)
}

fn range_to_table(range: &Range<Data>, origin: &str) -> Result<Table, PersistenceError> {
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| convert_cell(cell).display_value().trim().to_string())
            .collect(),
        None => Vec::new(),
    };

    if headers.iter().all(|h| h.is_empty()) {
        return Err(PersistenceError::EmptySource(origin.to_string()));
    }

    let mut table = Table::new(headers);
    for row in rows {
        let values: Vec<CellValue> = row.iter().map(convert_cell).collect();
        // Skip fully blank rows at the tail of a used range
        if values.iter().all(CellValue::is_missing) {
            continue;
        }
        table.push_row(values);
    }

    Ok(table)
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn write_fixture(path: &Path) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Employees").unwrap();
        sheet.write_string(0, 0, "unit").unwrap();
        sheet.write_string(0, 1, "layer").unwrap();
        sheet.write_string(0, 2, "Years").unwrap();
        sheet.write_string(1, 0, "HQ").unwrap();
        sheet.write_string(1, 1, "L1").unwrap();
        sheet.write_number(1, 2, 4.5).unwrap();
        sheet.write_string(2, 0, "Plant").unwrap();
        sheet.write_number(2, 2, 12.0).unwrap();
        workbook.save(path).unwrap();
    }

    #[test]
    fn loads_first_sheet_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("employees.xlsx");
        write_fixture(&path);

        let table = load_xlsx(&path, None).unwrap();
        assert_eq!(table.headers(), &["unit", "layer", "Years"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.value(0, 2), &CellValue::Number(4.5));
        assert!(table.value(1, 1).is_missing());
    }

    #[test]
    fn unknown_sheet_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("employees.xlsx");
        write_fixture(&path);

        let err = load_xlsx(&path, Some("Payroll")).unwrap_err();
        assert!(matches!(err, PersistenceError::SheetNotFound(name) if name == "Payroll"));
    }

    #[test]
    fn reads_workbook_from_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("employees.xlsx");
        write_fixture(&path);

        let bytes = std::fs::read(&path).unwrap();
        let table = read_xlsx_bytes(bytes, Some("Employees")).unwrap();
        assert_eq!(table.value(1, 0), &CellValue::text("Plant"));
    }
}

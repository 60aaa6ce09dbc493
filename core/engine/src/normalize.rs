//! FILENAME: core/engine/src/normalize.rs
//! PURPOSE: Turns a raw source table into the immutable normalized dataset.
//! CONTEXT: Runs once per data refresh. Every later filter and aggregation
//! reads the resulting `Dataset` and never patches it. Steps per row:
//! - trim text cells, treating blank text as missing
//! - substitute the "N-A" sentinel for missing layer values
//! - derive the tenure cohort from years of service
//! - read age as a whole number

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::column::{Column, ColumnMap, ColumnSet};
use crate::error::NormalizeError;
use crate::record::{EmployeeRecord, LAYER_SENTINEL};
use crate::table::Table;
use crate::tenure::TenureCohort;

// ============================================================================
// DATASET
// ============================================================================

/// Counters describing what normalization had to repair or drop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    pub rows: usize,
    /// Layer cells replaced by the sentinel.
    pub layer_filled: usize,
    /// Rows without a years-of-service value (no tenure cohort).
    pub years_missing: usize,
    /// Rows whose years of service fall outside every band (negative).
    pub years_out_of_range: usize,
    /// Age cells holding a fractional value, truncated toward zero.
    pub fractional_ages: usize,
}

/// The normalized, read-only employee dataset. Cloning shares the records.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[EmployeeRecord]>,
    columns: ColumnSet,
    report: NormalizeReport,
}

impl Dataset {
    /// Builds a dataset from already-normalized records.
    pub fn from_records(records: Vec<EmployeeRecord>, columns: ColumnSet) -> Self {
        let report = NormalizeReport {
            rows: records.len(),
            ..Default::default()
        };
        Dataset {
            records: records.into(),
            columns,
            report,
        }
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> ColumnSet {
        self.columns
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(column)
    }

    pub fn report(&self) -> &NormalizeReport {
        &self.report
    }
}

// ============================================================================
// NORMALIZER
// ============================================================================

/// Resolved source column positions.
struct ColumnPositions([Option<usize>; 9]);

impl ColumnPositions {
    fn resolve(table: &Table, map: &ColumnMap) -> Self {
        let mut positions = [None; 9];
        for (slot, column) in positions.iter_mut().zip(Column::ALL) {
            *slot = table.column_index(map.header(column));
        }
        ColumnPositions(positions)
    }

    fn get(&self, column: Column) -> Option<usize> {
        self.0[column as usize]
    }

    fn present(&self) -> ColumnSet {
        Column::ALL
            .into_iter()
            .filter(|c| self.get(*c).is_some())
            .collect()
    }
}

/// Normalizes a raw table. Fails only when the unit column is absent.
pub fn normalize(table: &Table, map: &ColumnMap) -> Result<Dataset, NormalizeError> {
    let positions = ColumnPositions::resolve(table, map);
    if positions.get(Column::Unit).is_none() {
        return Err(NormalizeError::MissingRequiredColumn(map.unit.clone()));
    }

    let mut report = NormalizeReport {
        rows: table.row_count(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(table.row_count());

    for row in 0..table.row_count() {
        let text = |column: Column| {
            positions
                .get(column)
                .and_then(|col| table.value(row, col).as_text())
        };
        let number = |column: Column| {
            positions
                .get(column)
                .and_then(|col| table.value(row, col).as_number())
        };

        let layer = match positions.get(Column::Layer) {
            Some(_) => Some(text(Column::Layer).unwrap_or_else(|| {
                report.layer_filled += 1;
                LAYER_SENTINEL.to_string()
            })),
            None => None,
        };

        let years_of_service = number(Column::Years);
        let tenure = years_of_service.and_then(derive_tenure);
        if positions.get(Column::Years).is_some() {
            match years_of_service {
                None => report.years_missing += 1,
                Some(_) if tenure.is_none() => report.years_out_of_range += 1,
                Some(_) => {}
            }
        }

        let age = number(Column::Age).map(|a| {
            if a.fract() != 0.0 {
                report.fractional_ages += 1;
            }
            a.trunc() as i64
        });

        records.push(EmployeeRecord {
            unit: text(Column::Unit),
            subunit: text(Column::Subunit),
            layer,
            gender: text(Column::Gender),
            generation: text(Column::Generation),
            religion: text(Column::Religion),
            region: text(Column::Region),
            age,
            years_of_service,
            tenure,
        });
    }

    Ok(Dataset {
        records: records.into(),
        columns: positions.present(),
        report,
    })
}

/// Derives the tenure cohort for a years-of-service value.
pub fn derive_tenure(years: f64) -> Option<TenureCohort> {
    TenureCohort::from_years(years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(cells: &[CellValue]) -> Vec<CellValue> {
        cells.to_vec()
    }

    fn sample_table() -> Table {
        Table::from_rows(
            headers(&["unit", "layer", "gender", "Years", "Age"]),
            vec![
                row(&["HQ".into(), "L1".into(), "Male".into(), 0.5.into(), 30.0.into()]),
                row(&["HQ".into(), CellValue::Empty, "Female".into(), 1.0.into(), 41.0.into()]),
                row(&["Plant".into(), "  ".into(), "Male".into(), CellValue::Empty, 22.7.into()]),
                row(&["Plant".into(), "L2".into(), CellValue::Empty, (-2.0).into(), CellValue::Empty]),
            ],
        )
    }

    #[test]
    fn missing_layer_becomes_sentinel() {
        let dataset = normalize(&sample_table(), &ColumnMap::default()).unwrap();
        let layers: Vec<_> = dataset.records().iter().map(|r| r.layer.as_deref()).collect();
        assert_eq!(layers, vec![Some("L1"), Some("N-A"), Some("N-A"), Some("L2")]);
        assert_eq!(dataset.report().layer_filled, 2);
    }

    #[test]
    fn tenure_is_derived_per_row() {
        let dataset = normalize(&sample_table(), &ColumnMap::default()).unwrap();
        let cohorts: Vec<_> = dataset.records().iter().map(|r| r.tenure).collect();
        assert_eq!(
            cohorts,
            vec![
                Some(TenureCohort::UnderOne),
                Some(TenureCohort::OneToThree),
                None,
                None,
            ]
        );
        assert_eq!(dataset.report().years_missing, 1);
        assert_eq!(dataset.report().years_out_of_range, 1);
    }

    #[test]
    fn ages_are_whole_numbers() {
        let dataset = normalize(&sample_table(), &ColumnMap::default()).unwrap();
        let ages: Vec<_> = dataset.records().iter().map(|r| r.age).collect();
        assert_eq!(ages, vec![Some(30), Some(41), Some(22), None]);
        assert_eq!(dataset.report().fractional_ages, 1);
    }

    #[test]
    fn absent_optional_columns_are_recorded() {
        let dataset = normalize(&sample_table(), &ColumnMap::default()).unwrap();
        assert!(dataset.has_column(Column::Layer));
        assert!(dataset.has_column(Column::Years));
        assert!(!dataset.has_column(Column::Region));
        assert!(!dataset.has_column(Column::Religion));
        assert!(dataset.records().iter().all(|r| r.region.is_none()));
    }

    #[test]
    fn absent_layer_column_gets_no_sentinel() {
        let table = Table::from_rows(headers(&["unit"]), vec![row(&["HQ".into()])]);
        let dataset = normalize(&table, &ColumnMap::default()).unwrap();
        assert_eq!(dataset.records()[0].layer, None);
        assert_eq!(dataset.report().layer_filled, 0);
    }

    #[test]
    fn missing_unit_column_is_an_error() {
        let table = Table::from_rows(headers(&["gender"]), vec![row(&["Male".into()])]);
        let err = normalize(&table, &ColumnMap::default()).unwrap_err();
        assert_eq!(err, NormalizeError::MissingRequiredColumn("unit".to_string()));
    }

    #[test]
    fn normalizing_leaves_source_untouched() {
        let table = sample_table();
        let before = table.clone();
        let _ = normalize(&table, &ColumnMap::default()).unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn custom_headers_are_honoured() {
        let table = Table::from_rows(
            headers(&["Business Unit", "religion"]),
            vec![row(&["HQ".into(), "Islam".into()])],
        );
        let map = ColumnMap {
            unit: "Business Unit".to_string(),
            religion: "religion".to_string(),
            ..Default::default()
        };
        let dataset = normalize(&table, &map).unwrap();
        assert_eq!(dataset.records()[0].religion.as_deref(), Some("Islam"));
    }
}

//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for dashboard integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use dashboard_lib::{
    create_app_state, refresh_data, render_page, AppState, DashboardConfig, PageRequest, PageView,
};
use persistence::SourceConfig;
use tempfile::TempDir;

/// A dashboard state reading a CSV fixture from a temporary directory.
pub struct TestHarness {
    pub state: AppState,
    pub csv_path: PathBuf,
    _dir: TempDir,
}

impl TestHarness {
    /// The standard employee fixture, already refreshed.
    pub fn new() -> Self {
        Self::with_csv(&EmployeeFixture::csv())
    }

    /// Any CSV content, already refreshed.
    pub fn with_csv(csv: &str) -> Self {
        let harness = Self::unloaded(csv, DashboardConfig::default());
        refresh_data(&harness.state).unwrap();
        harness
    }

    /// Written to disk but not yet refreshed.
    pub fn unloaded(csv: &str, mut config: DashboardConfig) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("employees.csv");
        std::fs::write(&csv_path, csv).unwrap();
        config.source = SourceConfig::File {
            path: csv_path.clone(),
            format: None,
            sheet: None,
        };
        TestHarness {
            state: create_app_state(config),
            csv_path,
            _dir: dir,
        }
    }

    pub fn render(&self, page: &str) -> PageView {
        self.render_request(&PageRequest::new(page))
    }

    pub fn render_request(&self, request: &PageRequest) -> PageView {
        render_page(&self.state, request).unwrap()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TEST DATA FIXTURES
// ============================================================================

/// Ten employees: unit A has 6 (4 Male, 2 Female), unit B has 4 (3 Male,
/// 1 Female). Three rows have no layer; one has negative years of service.
pub struct EmployeeFixture;

impl EmployeeFixture {
    pub fn headers() -> Vec<&'static str> {
        vec![
            "unit", "subunit", "layer", "gender", "generation",
            "Religious Denomination Key", "region", "Age", "Years",
        ]
    }

    pub fn rows() -> Vec<[&'static str; 9]> {
        vec![
            ["A", "S1", "", "Male", "GEN X", "Islam", "Jawa", "45", "20.5"],
            ["A", "S1", "L1", "Male", "GEN Y", "Islam", "Jawa", "30", "4"],
            ["A", "S2", "", "Female", "GEN Y", "Kristen", "Bali", "22", "0.5"],
            ["A", "S2", "L2", "Male", "GEN Z", "Hindu", "Bali", "22", "1"],
            ["A", "S1", "L1", "Female", "BOOMERS", "Islam", "Jawa", "58", "30"],
            ["A", "S3", "L2", "Male", "GEN X", "Katholik", "Sumatra", "23", "6"],
            ["B", "S4", "", "Male", "GEN Y", "Islam", "Jawa", "30", "10.5"],
            ["B", "S4", "L1", "Female", "GEN Z", "Buddha", "Sumatra", "25", "3"],
            ["B", "S5", "L1", "Male", "GEN X", "Islam", "Kalimantan", "41", "15"],
            ["B", "S5", "L3", "Male", "GEN Y", "Kristen", "Jawa", "35", "-1"],
        ]
    }

    pub fn csv() -> String {
        Self::csv_without(&[])
    }

    /// The fixture with the named header columns removed.
    pub fn csv_without(dropped: &[&str]) -> String {
        let keep: Vec<usize> = Self::headers()
            .iter()
            .enumerate()
            .filter(|(_, h)| !dropped.contains(h))
            .map(|(i, _)| i)
            .collect();

        let headers = Self::headers();
        let mut lines = vec![keep.iter().map(|&i| headers[i]).collect::<Vec<_>>().join(",")];
        for row in Self::rows() {
            lines.push(keep.iter().map(|&i| row[i]).collect::<Vec<_>>().join(","));
        }
        lines.join("\n") + "\n"
    }
}

// ============================================================================
// ASSERTION HELPERS
// ============================================================================

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// Flattens a table view into (key, value) pairs, column by column.
pub fn table_pairs(view: &PageView) -> Vec<Vec<(String, String)>> {
    view.table
        .as_ref()
        .map(|t| {
            t.columns
                .iter()
                .map(|c| c.iter().map(|e| (e.key.clone(), e.value.clone())).collect())
                .collect()
        })
        .unwrap_or_default()
}

//! FILENAME: core/persistence/src/source.rs
//! PURPOSE: Data source providers for the employee table.
//! CONTEXT: A source is re-fetchable on demand. Each fetch is atomic: it
//! yields a complete table or an error, never partial data.

use crate::csv_reader::{load_csv, read_csv};
use crate::xlsx_reader::{load_xlsx, read_xlsx_bytes};
use crate::PersistenceError;
use engine::Table;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

impl SourceFormat {
    /// Guesses the format from a file extension. Unknown extensions read as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => SourceFormat::Xlsx,
            _ => SourceFormat::Csv,
        }
    }

    /// Guesses the format of an HTTP response from its content type, then
    /// from the URL.
    pub fn from_response(content_type: Option<&str>, url: &str) -> Self {
        if let Some(ct) = content_type {
            if ct.contains("spreadsheetml") {
                return SourceFormat::Xlsx;
            }
            if ct.contains("csv") {
                return SourceFormat::Csv;
            }
        }
        let url = url.to_ascii_lowercase();
        if url.contains("format=xlsx") || url.split('?').next().is_some_and(|p| p.ends_with(".xlsx")) {
            SourceFormat::Xlsx
        } else {
            SourceFormat::Csv
        }
    }
}

// ============================================================================
// DATA SOURCE TRAIT
// ============================================================================

/// Supplies the raw employee table.
pub trait DataSource {
    fn fetch(&self) -> Result<Table, PersistenceError>;

    /// Human-readable origin, used in logs and page footers.
    fn describe(&self) -> String;
}

/// A CSV or XLSX file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
    pub format: Option<SourceFormat>,
    pub sheet: Option<String>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource {
            path: path.into(),
            format: None,
            sheet: None,
        }
    }
}

impl DataSource for FileSource {
    fn fetch(&self) -> Result<Table, PersistenceError> {
        let format = self
            .format
            .unwrap_or_else(|| SourceFormat::from_path(&self.path));
        match format {
            SourceFormat::Csv => load_csv(&self.path),
            SourceFormat::Xlsx => load_xlsx(&self.path, self.sheet.as_deref()),
        }
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// A spreadsheet exported over HTTP, fetched with a blocking GET.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    pub url: String,
    pub format: Option<SourceFormat>,
    pub sheet: Option<String>,
    pub timeout: Duration,
}

impl RemoteSource {
    pub fn new(url: impl Into<String>) -> Self {
        RemoteSource {
            url: url.into(),
            format: None,
            sheet: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// CSV export of one tab of a Google spreadsheet.
    pub fn google_sheet(sheet_id: &str, gid: u64) -> Self {
        let mut source = Self::new(google_sheet_csv_url(sheet_id, gid));
        source.format = Some(SourceFormat::Csv);
        source
    }
}

pub fn google_sheet_csv_url(sheet_id: &str, gid: u64) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
        sheet_id, gid
    )
}

impl DataSource for RemoteSource {
    fn fetch(&self) -> Result<Table, PersistenceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let response = client.get(&self.url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(PersistenceError::HttpStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let format = self
            .format
            .unwrap_or_else(|| SourceFormat::from_response(content_type.as_deref(), &self.url));

        let body = response.bytes()?;
        match format {
            SourceFormat::Csv => read_csv(&body[..], &self.url),
            SourceFormat::Xlsx => read_xlsx_bytes(body.to_vec(), self.sheet.as_deref()),
        }
    }

    fn describe(&self) -> String {
        format!("remote {}", self.url)
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Serializable description of where the employee table lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    File {
        path: PathBuf,
        #[serde(default)]
        format: Option<SourceFormat>,
        #[serde(default)]
        sheet: Option<String>,
    },
    Remote {
        url: String,
        #[serde(default)]
        format: Option<SourceFormat>,
        #[serde(default)]
        sheet: Option<String>,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
    GoogleSheet {
        sheet_id: String,
        #[serde(default)]
        gid: u64,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

impl SourceConfig {
    pub fn build(&self) -> Box<dyn DataSource + Send + Sync> {
        match self {
            SourceConfig::File { path, format, sheet } => Box::new(FileSource {
                path: path.clone(),
                format: *format,
                sheet: sheet.clone(),
            }),
            SourceConfig::Remote { url, format, sheet, timeout_secs } => Box::new(RemoteSource {
                url: url.clone(),
                format: *format,
                sheet: sheet.clone(),
                timeout: Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            }),
            SourceConfig::GoogleSheet { sheet_id, gid, timeout_secs } => {
                let mut source = RemoteSource::google_sheet(sheet_id, *gid);
                source.timeout = Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
                Box::new(source)
            }
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::File {
            path: PathBuf::from("employees.csv"),
            format: None,
            sheet: None,
        }
    }
}

//! FILENAME: core/persistence/src/lib.rs
//! Persistence Module
//!
//! Supplies the raw employee table from CSV or XLSX data, read from the
//! local filesystem or fetched over HTTP (e.g. a Google Sheets export).

mod csv_reader;
mod error;
mod source;
mod xlsx_reader;

pub use csv_reader::{load_csv, read_csv};
pub use error::PersistenceError;
pub use source::{
    google_sheet_csv_url, DataSource, FileSource, RemoteSource, SourceConfig, SourceFormat,
};
pub use xlsx_reader::{load_xlsx, read_xlsx_bytes};

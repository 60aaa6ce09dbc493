//! FILENAME: app/src/lib.rs
// PURPOSE: Dashboard library entry point (presentation binder).
// CONTEXT: Owns configuration, logging and the loaded session; the CLI in
// main.rs is a thin shell over the commands exported here.

pub mod api_types;
pub mod binder;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod state;

pub use api_types::{
    ChartKind, ChartPoint, ChartSeries, ChartView, PageRequest, PageView, RefreshSummary,
    TableEntry, TableView, Tile,
};
pub use commands::{get_filter_options, refresh_data, render_page};
pub use config::DashboardConfig;
pub use error::DashboardError;
pub use logging::{init_logging, next_seq, write_log, LogLevel};
pub use state::{create_app_state, AppState, Session};

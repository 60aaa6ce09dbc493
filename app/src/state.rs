//! FILENAME: app/src/state.rs
//! PURPOSE: Application state shared by every command.
//! CONTEXT: The normalized dataset is built once per refresh and shared
//! read-only through an `Arc<Session>`; commands never mutate it.

use std::sync::{Arc, Mutex};
use chrono::{DateTime, Local};
use engine::{normalize, Dataset};
use metrics_engine::{filter_options, FilterOptions};
use persistence::DataSource;
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::{log_error, log_info, log_warn};

/// One loaded snapshot of the employee data.
#[derive(Debug)]
pub struct Session {
    pub dataset: Dataset,
    pub options: FilterOptions,
    pub loaded_at: DateTime<Local>,
    pub source: String,
}

pub struct AppState {
    pub config: DashboardConfig,
    source: Box<dyn DataSource + Send + Sync>,
    session: Mutex<Option<Arc<Session>>>,
}

/// State for a configuration, reading from the configured source.
pub fn create_app_state(config: DashboardConfig) -> AppState {
    let source = config.source.build();
    AppState::with_source(config, source)
}

impl AppState {
    pub fn with_source(config: DashboardConfig, source: Box<dyn DataSource + Send + Sync>) -> Self {
        log_info!("SYS", "Creating AppState, source={}", source.describe());
        AppState {
            config,
            source,
            session: Mutex::new(None),
        }
    }

    /// Fetches and normalizes the source, replacing the current session.
    /// On failure the session is cleared: a broken source renders nothing.
    pub fn refresh(&self) -> Result<Arc<Session>, DashboardError> {
        let description = self.source.describe();
        log_info!("DATA", "Fetching {}", description);

        let loaded = self
            .source
            .fetch()
            .map_err(DashboardError::from)
            .and_then(|table| {
                normalize(&table, &self.config.columns).map_err(DashboardError::from)
            });

        let mut guard = self
            .session
            .lock()
            .map_err(|e| DashboardError::Config(format!("session lock poisoned: {}", e)))?;

        let dataset = match loaded {
            Ok(dataset) => dataset,
            Err(e) => {
                log_error!("DATA", "{}", e);
                *guard = None;
                return Err(e);
            }
        };

        let report = dataset.report();
        log_info!(
            "DATA",
            "Normalized {} rows (layer filled={}, years missing={}, years out of range={})",
            report.rows,
            report.layer_filled,
            report.years_missing,
            report.years_out_of_range
        );
        if report.fractional_ages > 0 {
            log_warn!("DATA", "Truncated {} fractional ages", report.fractional_ages);
        }

        let session = Arc::new(Session {
            options: filter_options(&dataset),
            dataset,
            loaded_at: Local::now(),
            source: description,
        });
        *guard = Some(Arc::clone(&session));
        Ok(session)
    }

    /// The current session, or `NotLoaded` before the first good refresh.
    pub fn session(&self) -> Result<Arc<Session>, DashboardError> {
        let guard = self
            .session
            .lock()
            .map_err(|e| DashboardError::Config(format!("session lock poisoned: {}", e)))?;
        guard.clone().ok_or(DashboardError::NotLoaded)
    }
}

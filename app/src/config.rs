//! FILENAME: app/src/config.rs
//! PURPOSE: Dashboard configuration, read from a JSON file.
//! CONTEXT: Every field has a default, so a config file only names what it
//! overrides. A relative source path resolves against the config file's
//! directory.

use std::path::{Path, PathBuf};
use engine::ColumnMap;
use metrics_engine::DomainRegistry;
use persistence::SourceConfig;
use serde::{Deserialize, Serialize};
use crate::error::DashboardError;
use crate::logging::LogLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    /// Source header names per column.
    pub columns: ColumnMap,
    /// Category domains and their chart colors.
    pub domains: DomainRegistry,
    pub log_file: Option<PathBuf>,
    pub log_level: LogLevel,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            source: SourceConfig::default(),
            columns: ColumnMap::default(),
            domains: DomainRegistry::default(),
            log_file: None,
            log_level: LogLevel::Info,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self, DashboardError> {
        serde_json::from_str(json).map_err(|e| DashboardError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let mut config = Self::from_json(&json)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        if let SourceConfig::File { path, .. } = &mut self.source {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        if let Some(log_file) = self.log_file.as_mut().filter(|p| p.is_relative()) {
            *log_file = base.join(&*log_file);
        }
    }
}

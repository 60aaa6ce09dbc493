//! FILENAME: app/src/error.rs

use engine::NormalizeError;
use persistence::PersistenceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// The data source was unreachable or malformed. Fatal for the session.
    #[error("failed to fetch employee data: {0}")]
    Fetch(#[from] PersistenceError),

    #[error("failed to normalize employee data: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("no employee data loaded; refresh first")]
    NotLoaded,

    #[error("unknown page '{0}'")]
    UnknownPage(String),
}

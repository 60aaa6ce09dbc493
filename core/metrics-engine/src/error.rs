//! FILENAME: core/metrics-engine/src/error.rs

use engine::Column;
use thiserror::Error;
use crate::definition::Metric;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricError {
    /// A column the metric (or its breakdown) reads is absent from the
    /// source dataset. Non-fatal: the view renders empty.
    #[error("{metric} metric needs column '{column}', which is not in the dataset")]
    MissingColumn { metric: Metric, column: Column },
}

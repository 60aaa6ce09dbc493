//! FILENAME: core/metrics-engine/src/lib.rs
//! Demographic metrics subsystem.
//!
//! Works on the normalized `engine::Dataset` and never mutates it.
//!
//! Layers:
//! - `definition`: Serializable configuration (metrics, breakdowns, filter
//!   selections, category domains)
//! - `filter`: Filter engine (WHICH rows take part)
//! - `aggregator`: Aggregation (HOW we count and normalize)
//! - `view`: Render-ready results (WHAT we display)

pub mod aggregator;
pub mod definition;
pub mod error;
pub mod filter;
pub mod view;

pub use aggregator::{
    age_distribution, categorical_breakdown, count_by_breakdown, count_by_region, Aggregator,
};
pub use definition::*;
pub use error::MetricError;
pub use filter::{apply_filters, filter_options, FilterOptions, FilteredRecords};
pub use view::*;

//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the employee dataset engine.
//! CONTEXT: Raw source tables, the normalized employee dataset and the
//! tenure cohort bucketing. Re-exports public types for the other crates.

pub mod cell;
pub mod column;
pub mod error;
pub mod normalize;
pub mod record;
pub mod table;
pub mod tenure;

// Re-export commonly used types at the crate root
pub use cell::CellValue;
pub use column::{Attribute, Column, ColumnMap, ColumnSet};
pub use error::NormalizeError;
pub use normalize::{derive_tenure, normalize, Dataset, NormalizeReport};
pub use record::{EmployeeRecord, LAYER_SENTINEL};
pub use table::Table;
pub use tenure::TenureCohort;

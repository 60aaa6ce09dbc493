//! FILENAME: core/engine/src/record.rs
//! PURPOSE: One normalized employee row.

use serde::{Deserialize, Serialize};
use crate::column::Attribute;
use crate::tenure::TenureCohort;

/// Placeholder stored in the layer attribute when the source cell is missing.
pub const LAYER_SENTINEL: &str = "N-A";

/// A normalized employee record. Text attributes are `None` when the source
/// cell was missing or the column is absent from the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub unit: Option<String>,
    pub subunit: Option<String>,
    pub layer: Option<String>,
    pub gender: Option<String>,
    pub generation: Option<String>,
    pub religion: Option<String>,
    pub region: Option<String>,
    pub age: Option<i64>,
    pub years_of_service: Option<f64>,
    pub tenure: Option<TenureCohort>,
}

impl EmployeeRecord {
    /// Reads a textual attribute. Tenure reads as its cohort label.
    pub fn attribute(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Unit => self.unit.as_deref(),
            Attribute::Subunit => self.subunit.as_deref(),
            Attribute::Layer => self.layer.as_deref(),
            Attribute::Gender => self.gender.as_deref(),
            Attribute::Generation => self.generation.as_deref(),
            Attribute::Religion => self.religion.as_deref(),
            Attribute::Region => self.region.as_deref(),
            Attribute::Tenure => self.tenure.map(TenureCohort::label),
        }
    }
}

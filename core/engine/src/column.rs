//! FILENAME: core/engine/src/column.rs
//! PURPOSE: The source columns of the employee dataset and their header names.
//! CONTEXT: Only the unit column is mandatory. Every other column may be
//! absent from a source; `ColumnSet` records which ones were found so that
//! filters and metrics can degrade instead of failing.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// SOURCE COLUMNS
// ============================================================================

/// A column of the source dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Unit,
    Subunit,
    Layer,
    Gender,
    Generation,
    Religion,
    Region,
    Age,
    Years,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Unit,
        Column::Subunit,
        Column::Layer,
        Column::Gender,
        Column::Generation,
        Column::Religion,
        Column::Region,
        Column::Age,
        Column::Years,
    ];

    /// Header used by the source spreadsheet for this column.
    pub fn default_header(self) -> &'static str {
        match self {
            Column::Unit => "unit",
            Column::Subunit => "subunit",
            Column::Layer => "layer",
            Column::Gender => "gender",
            Column::Generation => "generation",
            Column::Religion => "Religious Denomination Key",
            Column::Region => "region",
            Column::Age => "Age",
            Column::Years => "Years",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_header())
    }
}

// ============================================================================
// HEADER MAPPING
// ============================================================================

fn default_unit() -> String { Column::Unit.default_header().to_string() }
fn default_subunit() -> String { Column::Subunit.default_header().to_string() }
fn default_layer() -> String { Column::Layer.default_header().to_string() }
fn default_gender() -> String { Column::Gender.default_header().to_string() }
fn default_generation() -> String { Column::Generation.default_header().to_string() }
fn default_religion() -> String { Column::Religion.default_header().to_string() }
fn default_region() -> String { Column::Region.default_header().to_string() }
fn default_age() -> String { Column::Age.default_header().to_string() }
fn default_years() -> String { Column::Years.default_header().to_string() }

/// Header name for every source column. Any header left out of a
/// configuration file keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "default_subunit")]
    pub subunit: String,
    #[serde(default = "default_layer")]
    pub layer: String,
    #[serde(default = "default_gender")]
    pub gender: String,
    #[serde(default = "default_generation")]
    pub generation: String,
    #[serde(default = "default_religion")]
    pub religion: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_age")]
    pub age: String,
    #[serde(default = "default_years")]
    pub years: String,
}

impl ColumnMap {
    pub fn header(&self, column: Column) -> &str {
        match column {
            Column::Unit => &self.unit,
            Column::Subunit => &self.subunit,
            Column::Layer => &self.layer,
            Column::Gender => &self.gender,
            Column::Generation => &self.generation,
            Column::Religion => &self.religion,
            Column::Region => &self.region,
            Column::Age => &self.age,
            Column::Years => &self.years,
        }
    }
}

impl Default for ColumnMap {
    fn default() -> Self {
        ColumnMap {
            unit: default_unit(),
            subunit: default_subunit(),
            layer: default_layer(),
            gender: default_gender(),
            generation: default_generation(),
            religion: default_religion(),
            region: default_region(),
            age: default_age(),
            years: default_years(),
        }
    }
}

// ============================================================================
// COLUMN PRESENCE
// ============================================================================

/// The set of source columns present in a loaded table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSet(u16);

impl ColumnSet {
    pub fn empty() -> Self {
        ColumnSet(0)
    }

    pub fn all() -> Self {
        Column::ALL.iter().copied().collect()
    }

    pub fn insert(&mut self, column: Column) {
        self.0 |= column.bit();
    }

    pub fn remove(&mut self, column: Column) {
        self.0 &= !column.bit();
    }

    pub fn contains(&self, column: Column) -> bool {
        self.0 & column.bit() != 0
    }

    pub fn without(mut self, column: Column) -> Self {
        self.remove(column);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = Column> + '_ {
        Column::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<Column> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        let mut set = ColumnSet::empty();
        for column in iter {
            set.insert(column);
        }
        set
    }
}

// ============================================================================
// RECORD ATTRIBUTES
// ============================================================================

/// Textual attributes of a normalized record, used for filtering and
/// grouping. `Tenure` is derived from the years-of-service column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Unit,
    Subunit,
    Layer,
    Gender,
    Generation,
    Religion,
    Region,
    Tenure,
}

impl Attribute {
    /// The source column the attribute is read or derived from.
    pub fn source_column(self) -> Column {
        match self {
            Attribute::Unit => Column::Unit,
            Attribute::Subunit => Column::Subunit,
            Attribute::Layer => Column::Layer,
            Attribute::Gender => Column::Gender,
            Attribute::Generation => Column::Generation,
            Attribute::Religion => Column::Religion,
            Attribute::Region => Column::Region,
            Attribute::Tenure => Column::Years,
        }
    }
}

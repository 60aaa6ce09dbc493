//! FILENAME: core/metrics-engine/src/filter.rs
//! Filter Engine - narrows the dataset to the user's selection.
//!
//! Composition rules:
//! - AND across dimensions, OR within one dimension's selected values
//! - an empty selection passes every row through
//! - a dimension whose column is absent from the source is skipped
//! - selected values unknown to the data simply match nothing
//!
//! Each criterion is a set-membership test, so evaluation order does not
//! change the result. The layer sentinel "N-A" is an ordinary value here.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use engine::{Attribute, ColumnSet, Dataset, EmployeeRecord, TenureCohort};
use crate::definition::{FilterDimension, FilterSelection};

// ============================================================================
// FILTERED VIEW
// ============================================================================

/// A borrowed subset of a dataset's records. Never copies or mutates the
/// underlying records.
#[derive(Debug, Clone)]
pub struct FilteredRecords<'a> {
    dataset: &'a Dataset,
    records: Vec<&'a EmployeeRecord>,
}

impl<'a> FilteredRecords<'a> {
    /// The unfiltered view over every record.
    pub fn all(dataset: &'a Dataset) -> Self {
        FilteredRecords {
            dataset,
            records: dataset.records().iter().collect(),
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Columns present in the source dataset.
    pub fn columns(&self) -> ColumnSet {
        self.dataset.columns()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a EmployeeRecord> + '_ {
        self.records.iter().copied()
    }
}

/// Applies every active criterion of `selection` to the dataset.
pub fn apply_filters<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredRecords<'a> {
    let criteria: Vec<(Attribute, FxHashSet<&str>)> = FilterDimension::ALL
        .into_iter()
        .filter(|d| dataset.has_column(d.attribute().source_column()))
        .filter_map(|d| {
            let values = selection.values(d);
            if values.is_empty() {
                None
            } else {
                Some((d.attribute(), values.iter().map(String::as_str).collect()))
            }
        })
        .collect();

    if criteria.is_empty() {
        return FilteredRecords::all(dataset);
    }

    let records = dataset
        .records()
        .iter()
        .filter(|record| {
            criteria.iter().all(|(attribute, allowed)| {
                record
                    .attribute(*attribute)
                    .is_some_and(|value| allowed.contains(value))
            })
        })
        .collect();

    FilteredRecords { dataset, records }
}

// ============================================================================
// FILTER OPTIONS
// ============================================================================

/// Live option lists for the filter selectors. Values appear in the order
/// they are first seen in the dataset; an absent column yields no options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub units: Vec<String>,
    pub subunits: Vec<String>,
    pub layers: Vec<String>,
    pub genders: Vec<String>,
    pub generations: Vec<String>,
    pub religions: Vec<String>,
    /// Always the eight cohort labels in ascending order.
    pub tenures: Vec<String>,
}

impl FilterOptions {
    pub fn values(&self, dimension: FilterDimension) -> &[String] {
        match dimension {
            FilterDimension::Unit => self.units.as_slice(),
            FilterDimension::Subunit => self.subunits.as_slice(),
            FilterDimension::Layer => self.layers.as_slice(),
            FilterDimension::Gender => self.genders.as_slice(),
            FilterDimension::Generation => self.generations.as_slice(),
            FilterDimension::Religion => self.religions.as_slice(),
            FilterDimension::Tenure => self.tenures.as_slice(),
        }
    }
}

fn distinct_values(dataset: &Dataset, attribute: Attribute) -> Vec<String> {
    if !dataset.has_column(attribute.source_column()) {
        return Vec::new();
    }
    let mut seen = FxHashSet::default();
    dataset
        .records()
        .iter()
        .filter_map(|r| r.attribute(attribute))
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

pub fn filter_options(dataset: &Dataset) -> FilterOptions {
    FilterOptions {
        units: distinct_values(dataset, Attribute::Unit),
        subunits: distinct_values(dataset, Attribute::Subunit),
        layers: distinct_values(dataset, Attribute::Layer),
        genders: distinct_values(dataset, Attribute::Gender),
        generations: distinct_values(dataset, Attribute::Generation),
        religions: distinct_values(dataset, Attribute::Religion),
        tenures: TenureCohort::labels().map(str::to_string).collect(),
    }
}

//! FILENAME: core/metrics-engine/src/view.rs
//! Metric View - Render-ready aggregation output.
//!
//! The render sink relies on two guarantees:
//! - categorical results list every domain category for every group, in
//!   domain order, zero-filled
//! - labels are formatted deterministically as "<count> (<pct:.1>%)"

use serde::{Deserialize, Serialize};
use crate::definition::{BreakdownDimension, Metric};

// ============================================================================
// CATEGORICAL RESULTS
// ============================================================================

/// Count and share of one category within one breakdown group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: u64,
    /// Percentage of the group's classified rows, in [0, 100].
    pub percentage: f64,
    /// Pre-formatted display string.
    pub label: String,
}

impl CategoryShare {
    pub fn new(category: &str, count: u64, group_total: u64) -> Self {
        let percentage = percentage_of(count, group_total);
        CategoryShare {
            category: category.to_string(),
            count,
            percentage,
            label: format_share_label(count, percentage),
        }
    }
}

/// All category shares of one breakdown group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupShare {
    pub group: String,
    /// Rows whose category is in the domain; the percentage base.
    pub total: u64,
    /// Rows whose category is missing or outside the domain.
    pub unclassified: u64,
    pub shares: Vec<CategoryShare>,
}

impl GroupShare {
    pub fn share(&self, category: &str) -> Option<&CategoryShare> {
        self.shares.iter().find(|s| s.category == category)
    }

    pub fn percentage_sum(&self) -> f64 {
        self.shares.iter().map(|s| s.percentage).sum()
    }
}

/// Headline figure of one category across every group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub count: u64,
    /// Share of the grand total, rounded to 2 decimals.
    pub percentage: f64,
}

/// Result of a percentage-based metric (gender, generation, religion, tenure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalBreakdown {
    pub metric: Metric,
    pub breakdown: BreakdownDimension,
    /// Domain categories in legend order.
    pub categories: Vec<String>,
    /// Breakdown groups, ascending by group value.
    pub groups: Vec<GroupShare>,
    /// Per-category totals in domain order.
    pub summary: Vec<CategorySummary>,
    /// Classified rows over all groups.
    pub grand_total: u64,
    /// Unclassified rows over all groups.
    pub unclassified: u64,
}

impl CategoricalBreakdown {
    pub fn group(&self, name: &str) -> Option<&GroupShare> {
        self.groups.iter().find(|g| g.group == name)
    }
}

// ============================================================================
// COUNT RESULTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    pub key: String,
    pub count: u64,
}

/// Row counts per value of one axis, descending by count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBreakdown {
    /// Name of the grouped column ("unit", "subunit", "layer" or "region").
    pub axis: String,
    pub rows: Vec<CountRow>,
    /// Number of filtered rows, including rows without an axis value.
    pub total: u64,
}

impl CountBreakdown {
    pub fn count_of(&self, key: &str) -> Option<u64> {
        self.rows.iter().find(|r| r.key == key).map(|r| r.count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeCount {
    pub age: i64,
    pub count: u64,
}

/// Row counts per discrete age, ascending by age. Counts only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeDistribution {
    pub rows: Vec<AgeCount>,
    pub total: u64,
}

// ============================================================================
// AGGREGATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationResult {
    Total(CountBreakdown),
    Categorical(CategoricalBreakdown),
    Region(CountBreakdown),
    Age(AgeDistribution),
}

impl AggregationResult {
    pub fn metric(&self) -> Metric {
        match self {
            AggregationResult::Total(_) => Metric::Total,
            AggregationResult::Categorical(c) => c.metric,
            AggregationResult::Region(_) => Metric::Region,
            AggregationResult::Age(_) => Metric::Age,
        }
    }

    pub fn as_categorical(&self) -> Option<&CategoricalBreakdown> {
        match self {
            AggregationResult::Categorical(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_counts(&self) -> Option<&CountBreakdown> {
        match self {
            AggregationResult::Total(c) | AggregationResult::Region(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_ages(&self) -> Option<&AgeDistribution> {
        match self {
            AggregationResult::Age(a) => Some(a),
            _ => None,
        }
    }
}

// ============================================================================
// FORMATTING
// ============================================================================

/// 100 * part / whole, or 0 when `whole` is 0.
pub fn percentage_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Rounds to a fixed number of decimals.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn format_share_label(count: u64, percentage: f64) -> String {
    format!("{} ({:.1}%)", count, percentage)
}

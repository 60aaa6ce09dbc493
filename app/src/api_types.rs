//! FILENAME: app/src/api_types.rs
//! PURPOSE: Request and view-model types exchanged with the render sink.
//! CONTEXT: Everything here serializes to JSON. A view is complete data for
//! one page: the sink only draws it.

use engine::NormalizeReport;
use metrics_engine::{BreakdownDimension, FilterSelection, Metric};
use serde::{Deserialize, Serialize};

// ============================================================================
// REQUESTS
// ============================================================================

/// One user interaction: the page, the breakdown and the filter state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageRequest {
    /// Page selector; blank means the total-employees page.
    pub page: String,
    pub breakdown: BreakdownDimension,
    pub filters: FilterSelection,
}

impl PageRequest {
    pub fn new(page: &str) -> Self {
        PageRequest {
            page: page.to_string(),
            ..Default::default()
        }
    }

    pub fn with_breakdown(mut self, breakdown: BreakdownDimension) -> Self {
        self.breakdown = breakdown;
        self
    }

    pub fn with_filters(mut self, filters: FilterSelection) -> Self {
        self.filters = filters;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    pub source: String,
    pub rows: usize,
    /// RFC 3339 load time.
    pub loaded_at: String,
    pub report: NormalizeReport,
}

// ============================================================================
// PAGE VIEW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub metric: Metric,
    pub title: String,
    pub subtitle: Option<String>,
    /// Large figure under the title (total page).
    pub headline: Option<String>,
    /// Summary tiles, one per category (categorical pages).
    pub tiles: Vec<Tile>,
    pub table: Option<TableView>,
    pub chart: Option<ChartView>,
    /// Non-fatal condition shown instead of the page content.
    pub notice: Option<String>,
}

impl PageView {
    pub fn new(metric: Metric, title: impl Into<String>) -> Self {
        PageView {
            metric,
            title: title.into(),
            subtitle: None,
            headline: None,
            tiles: Vec::new(),
            table: None,
            chart: None,
            notice: None,
        }
    }
}

/// A category summary tile: label, optional caption, share and count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub label: String,
    pub caption: Option<String>,
    pub color: String,
    pub count: u64,
    /// Percentage of the grand total, rounded to 2 decimals.
    pub percentage: f64,
}

/// "key: count" entries laid out in side-by-side columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub heading: String,
    pub columns: Vec<Vec<TableEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEntry {
    pub key: String,
    pub value: String,
}

// ============================================================================
// CHARTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    /// Horizontal bars, one per category on the y axis.
    HorizontalBar,
    /// Horizontal bars stacked to 100% per group, one series per category.
    StackedHorizontalBar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub kind: ChartKind,
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
    pub legend_title: Option<String>,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub name: String,
    pub color: Option<String>,
    pub points: Vec<ChartPoint>,
}

/// One bar (segment). `value` is the plotted length: a count for bar charts,
/// a percentage for stacked charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub category: String,
    pub value: f64,
    pub count: u64,
    pub percentage: Option<f64>,
    pub text: String,
    pub color: Option<String>,
}

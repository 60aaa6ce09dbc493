//! FILENAME: app/src/binder.rs
//! PURPOSE: Binds aggregation results to page view models.
//! CONTEXT: Pure functions. Titles, tiles, tables and chart series are all
//! decided here so that the render sink only draws.

use metrics_engine::{
    AgeDistribution, AggregationResult, BreakdownDimension, CategoricalBreakdown, CategoryDomain,
    CountBreakdown, DomainRegistry, FilterDimension, FilterSelection, Metric, QUALITATIVE_PALETTE,
    viridis_color,
};
use crate::api_types::{
    ChartKind, ChartPoint, ChartSeries, ChartView, PageRequest, PageView, TableEntry, TableView,
    Tile,
};

const REGION_AGE_TABLE_COLUMNS: usize = 3;

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Builds the page for a successful aggregation.
pub fn bind_page(result: &AggregationResult, request: &PageRequest, domains: &DomainRegistry) -> PageView {
    match result {
        AggregationResult::Total(counts) => total_page(counts, request.breakdown),
        AggregationResult::Categorical(breakdown) => {
            let domain = domains.for_metric(breakdown.metric);
            categorical_page(breakdown, domain, &request.filters)
        }
        AggregationResult::Region(counts) => region_page(counts),
        AggregationResult::Age(ages) => age_page(ages),
    }
}

/// The page shown when the metric's source column is absent. Only the title
/// and the notice are filled.
pub fn missing_column_page(metric: Metric, header: &str, filters: &FilterSelection) -> PageView {
    let mut view = PageView::new(metric, page_title(metric, filters));
    view.notice = Some(format!("The '{}' column is not available in the dataset.", header));
    view
}

pub fn page_title(metric: Metric, filters: &FilterSelection) -> String {
    match metric {
        Metric::Total => "Total Employees".to_string(),
        Metric::Region | Metric::Age => format!("{} Metrics", metric.name()),
        _ if !filters.org_filters_active() => format!("{} Metrics (All Units)", metric.name()),
        _ => format!(
            "{} Metrics (Filtered by {}, {}, {})",
            metric.name(),
            filters.values(FilterDimension::Unit).join(", "),
            filters.values(FilterDimension::Subunit).join(", "),
            filters.values(FilterDimension::Layer).join(", "),
        ),
    }
}

// ============================================================================
// PAGES
// ============================================================================

fn total_page(counts: &CountBreakdown, breakdown: BreakdownDimension) -> PageView {
    let mut view = PageView::new(Metric::Total, page_title(Metric::Total, &FilterSelection::default()));
    view.headline = Some(format_thousands(counts.total));

    let entries: Vec<TableEntry> = counts
        .rows
        .iter()
        .map(|row| TableEntry {
            key: row.key.clone(),
            value: format_thousands(row.count),
        })
        .collect();
    view.table = Some(TableView {
        heading: "Employee Count by Breakdown".to_string(),
        columns: split_halves(entries),
    });

    view.chart = Some(ChartView {
        kind: ChartKind::HorizontalBar,
        title: format!("Employee Distribution by {}", breakdown.title()),
        x_axis: "Count".to_string(),
        y_axis: breakdown.title().to_string(),
        legend_title: None,
        series: vec![count_series(counts, |_| None)],
    });
    view
}

fn categorical_page(
    breakdown: &CategoricalBreakdown,
    domain: Option<&CategoryDomain>,
    filters: &FilterSelection,
) -> PageView {
    let metric = breakdown.metric;
    let mut view = PageView::new(metric, page_title(metric, filters));
    view.subtitle = Some(format!(
        "Percentage of {} by {}",
        metric.name(),
        breakdown.breakdown.name()
    ));

    let color_of = |label: &str| domain.and_then(|d| d.color_of(label)).map(str::to_string);
    let caption_of = |label: &str| {
        domain
            .and_then(|d| d.position(label).map(|i| &d.categories[i]))
            .and_then(|c| c.caption.clone())
    };

    view.tiles = breakdown
        .summary
        .iter()
        .map(|s| Tile {
            label: s.category.clone(),
            caption: caption_of(&s.category),
            color: color_of(&s.category).unwrap_or_default(),
            count: s.count,
            percentage: s.percentage,
        })
        .collect();

    let series = breakdown
        .categories
        .iter()
        .enumerate()
        .map(|(idx, category)| ChartSeries {
            name: category.clone(),
            color: color_of(category),
            points: breakdown
                .groups
                .iter()
                .map(|group| {
                    let share = &group.shares[idx];
                    ChartPoint {
                        category: group.group.clone(),
                        value: share.percentage,
                        count: share.count,
                        percentage: Some(share.percentage),
                        text: share.label.clone(),
                        color: None,
                    }
                })
                .collect(),
        })
        .collect();

    view.chart = Some(ChartView {
        kind: ChartKind::StackedHorizontalBar,
        title: format!("{} Distribution by {}", metric.name(), breakdown.breakdown.name()),
        x_axis: "Percentage (%)".to_string(),
        y_axis: breakdown.breakdown.title().to_string(),
        legend_title: domain.map(|d| d.name.clone()),
        series,
    });
    view
}

fn region_page(counts: &CountBreakdown) -> PageView {
    let mut view = PageView::new(Metric::Region, page_title(Metric::Region, &FilterSelection::default()));

    let entries = counts
        .rows
        .iter()
        .map(|row| TableEntry {
            key: row.key.clone(),
            value: row.count.to_string(),
        })
        .collect();
    view.table = Some(TableView {
        heading: "Employee Count by Region".to_string(),
        columns: split_round_robin(entries, REGION_AGE_TABLE_COLUMNS),
    });

    view.chart = Some(ChartView {
        kind: ChartKind::HorizontalBar,
        title: "Region-wise Employee Distribution".to_string(),
        x_axis: "Employee Count".to_string(),
        y_axis: "Region".to_string(),
        legend_title: None,
        series: vec![count_series(counts, |i| {
            Some(QUALITATIVE_PALETTE[i % QUALITATIVE_PALETTE.len()].to_string())
        })],
    });
    view
}

fn age_page(ages: &AgeDistribution) -> PageView {
    let mut view = PageView::new(Metric::Age, page_title(Metric::Age, &FilterSelection::default()));

    let entries = ages
        .rows
        .iter()
        .map(|row| TableEntry {
            key: row.age.to_string(),
            value: row.count.to_string(),
        })
        .collect();
    view.table = Some(TableView {
        heading: "Employee Count by Age".to_string(),
        columns: split_round_robin(entries, REGION_AGE_TABLE_COLUMNS),
    });

    // Rows ascend by age, so the ends bound the color scale.
    let youngest = ages.rows.first().map_or(0.0, |r| r.age as f64);
    let oldest = ages.rows.last().map_or(0.0, |r| r.age as f64);
    let points = ages
        .rows
        .iter()
        .map(|row| ChartPoint {
            category: row.age.to_string(),
            value: row.count as f64,
            count: row.count,
            percentage: None,
            text: row.count.to_string(),
            color: Some(viridis_color(row.age as f64, youngest, oldest).to_string()),
        })
        .collect();
    view.chart = Some(ChartView {
        kind: ChartKind::HorizontalBar,
        title: "Age-wise Employee Distribution".to_string(),
        x_axis: "Employee Count".to_string(),
        y_axis: "Age".to_string(),
        legend_title: None,
        series: vec![ChartSeries {
            name: "Count".to_string(),
            color: None,
            points,
        }],
    });
    view
}

fn count_series(counts: &CountBreakdown, color: impl Fn(usize) -> Option<String>) -> ChartSeries {
    ChartSeries {
        name: "Count".to_string(),
        color: None,
        points: counts
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| ChartPoint {
                category: row.key.clone(),
                value: row.count as f64,
                count: row.count,
                percentage: None,
                text: row.count.to_string(),
                color: color(i),
            })
            .collect(),
    }
}

// ============================================================================
// LAYOUT HELPERS
// ============================================================================

/// Two columns; the first takes the larger half.
pub fn split_halves<T>(entries: Vec<T>) -> Vec<Vec<T>> {
    let midpoint = entries.len().div_ceil(2);
    let mut first = entries;
    let second = first.split_off(midpoint);
    vec![first, second]
}

/// Deals entries across `columns` columns: entry i goes to column i % columns.
pub fn split_round_robin<T>(entries: Vec<T>, columns: usize) -> Vec<Vec<T>> {
    let columns = columns.max(1);
    let mut out: Vec<Vec<T>> = (0..columns).map(|_| Vec::new()).collect();
    for (i, entry) in entries.into_iter().enumerate() {
        out[i % columns].push(entry);
    }
    out
}

/// 1234567 -> "1,234,567"
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

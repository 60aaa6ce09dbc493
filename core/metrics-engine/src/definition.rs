//! FILENAME: core/metrics-engine/src/definition.rs
//! Metric Definitions - The serializable configuration.
//!
//! This module contains all the types needed to DESCRIBE a metric request:
//! - which metric page is shown and which organizational axis slices it
//! - which filter values the user picked
//! - the fixed, ordered category domains with their color keys
//!
//! These structures are immutable snapshots of user intent; the filter
//! engine and aggregator only read them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use engine::{Attribute, Column, TenureCohort};

// ============================================================================
// METRICS
// ============================================================================

/// The seven supported demographic views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Total,
    Gender,
    Generation,
    Religion,
    Tenure,
    Region,
    Age,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Total,
        Metric::Gender,
        Metric::Generation,
        Metric::Religion,
        Metric::Tenure,
        Metric::Region,
        Metric::Age,
    ];

    /// Maps a page selector to a metric. A blank page (or "none") is the
    /// default total-employees view. Matching ignores case.
    pub fn from_page(page: &str) -> Option<Metric> {
        let page = page.trim();
        if page.is_empty() || page.eq_ignore_ascii_case("none") {
            return Some(Metric::Total);
        }
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(page))
    }

    /// Display name, as used in page titles.
    pub fn name(self) -> &'static str {
        match self {
            Metric::Total => "Total",
            Metric::Gender => "Gender",
            Metric::Generation => "Generation",
            Metric::Religion => "Religion",
            Metric::Tenure => "Tenure",
            Metric::Region => "Region",
            Metric::Age => "Age",
        }
    }

    /// Source columns the metric reads, besides the breakdown column.
    pub fn required_columns(self) -> &'static [Column] {
        match self {
            Metric::Total => &[],
            Metric::Gender => &[Column::Gender],
            Metric::Generation => &[Column::Generation],
            Metric::Religion => &[Column::Religion],
            Metric::Tenure => &[Column::Years],
            Metric::Region => &[Column::Region],
            Metric::Age => &[Column::Age],
        }
    }

    /// Region and age ignore the breakdown dimension.
    pub fn uses_breakdown(self) -> bool {
        !matches!(self, Metric::Region | Metric::Age)
    }

    /// The category attribute of a percentage-based metric.
    pub fn category_attribute(self) -> Option<Attribute> {
        match self {
            Metric::Gender => Some(Attribute::Gender),
            Metric::Generation => Some(Attribute::Generation),
            Metric::Religion => Some(Attribute::Religion),
            Metric::Tenure => Some(Attribute::Tenure),
            Metric::Total | Metric::Region | Metric::Age => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::from_page(s).ok_or_else(|| format!("unknown metric page: {}", s))
    }
}

// ============================================================================
// BREAKDOWN
// ============================================================================

/// The organizational axis that groups every percentage-based metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakdownDimension {
    #[default]
    Unit,
    Subunit,
    Layer,
}

impl BreakdownDimension {
    pub const ALL: [BreakdownDimension; 3] = [
        BreakdownDimension::Unit,
        BreakdownDimension::Subunit,
        BreakdownDimension::Layer,
    ];

    pub fn attribute(self) -> Attribute {
        match self {
            BreakdownDimension::Unit => Attribute::Unit,
            BreakdownDimension::Subunit => Attribute::Subunit,
            BreakdownDimension::Layer => Attribute::Layer,
        }
    }

    pub fn column(self) -> Column {
        self.attribute().source_column()
    }

    pub fn name(self) -> &'static str {
        match self {
            BreakdownDimension::Unit => "unit",
            BreakdownDimension::Subunit => "subunit",
            BreakdownDimension::Layer => "layer",
        }
    }

    /// Capitalized name for axis labels.
    pub fn title(self) -> &'static str {
        match self {
            BreakdownDimension::Unit => "Unit",
            BreakdownDimension::Subunit => "Subunit",
            BreakdownDimension::Layer => "Layer",
        }
    }
}

impl fmt::Display for BreakdownDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BreakdownDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown breakdown dimension: {}", s))
    }
}

// ============================================================================
// FILTER SELECTION
// ============================================================================

/// The seven filterable dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterDimension {
    Unit,
    Subunit,
    Layer,
    Gender,
    Generation,
    Religion,
    Tenure,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 7] = [
        FilterDimension::Unit,
        FilterDimension::Subunit,
        FilterDimension::Layer,
        FilterDimension::Gender,
        FilterDimension::Generation,
        FilterDimension::Religion,
        FilterDimension::Tenure,
    ];

    pub fn attribute(self) -> Attribute {
        match self {
            FilterDimension::Unit => Attribute::Unit,
            FilterDimension::Subunit => Attribute::Subunit,
            FilterDimension::Layer => Attribute::Layer,
            FilterDimension::Gender => Attribute::Gender,
            FilterDimension::Generation => Attribute::Generation,
            FilterDimension::Religion => Attribute::Religion,
            FilterDimension::Tenure => Attribute::Tenure,
        }
    }
}

/// Selected values of one dimension.
pub type Selection = SmallVec<[String; 4]>;

/// Values chosen per filterable dimension. An empty selection means "no
/// filter on that dimension", never "exclude all". Tenure selections use
/// cohort labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub units: Selection,
    pub subunits: Selection,
    pub layers: Selection,
    pub genders: Selection,
    pub generations: Selection,
    pub religions: Selection,
    pub tenures: Selection,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper: adds values to one dimension.
    pub fn with<I, S>(mut self, dimension: FilterDimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values_mut(dimension)
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn with_tenures<I: IntoIterator<Item = TenureCohort>>(self, cohorts: I) -> Self {
        self.with(FilterDimension::Tenure, cohorts.into_iter().map(TenureCohort::label))
    }

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

    pub fn values_mut(&mut self, dimension: FilterDimension) -> &mut Selection {
        match dimension {
            FilterDimension::Unit => &mut self.units,
            FilterDimension::Subunit => &mut self.subunits,
            FilterDimension::Layer => &mut self.layers,
            FilterDimension::Gender => &mut self.genders,
            FilterDimension::Generation => &mut self.generations,
            FilterDimension::Religion => &mut self.religions,
            FilterDimension::Tenure => &mut self.tenures,
        }
    }

    /// True when no dimension has a selection.
    pub fn is_empty(&self) -> bool {
        FilterDimension::ALL
            .into_iter()
            .all(|d| self.values(d).is_empty())
    }

    /// True when any organizational filter (unit, subunit, layer) is set.
    pub fn org_filters_active(&self) -> bool {
        !self.units.is_empty() || !self.subunits.is_empty() || !self.layers.is_empty()
    }
}

// ============================================================================
// CATEGORY DOMAINS
// ============================================================================

/// One category of a fixed domain with its color key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub color: String,
    /// Secondary caption (e.g. birth-year range of a generation).
    #[serde(default)]
    pub caption: Option<String>,
}

impl Category {
    pub fn new(label: &str, color: &str) -> Self {
        Category {
            label: label.to_string(),
            color: color.to_string(),
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: &str) -> Self {
        self.caption = Some(caption.to_string());
        self
    }
}

/// An ordered, enumerated set of categories. Order fixes legend and color
/// assignment; every category is reported even with zero members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDomain {
    pub name: String,
    pub categories: Vec<Category>,
}

impl CategoryDomain {
    pub fn new(name: &str, categories: Vec<Category>) -> Self {
        CategoryDomain {
            name: name.to_string(),
            categories,
        }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.label.as_str())
    }

    /// Position of a category label, matched exactly.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.label == label)
    }

    pub fn color_of(&self, label: &str) -> Option<&str> {
        self.position(label).map(|i| self.categories[i].color.as_str())
    }

    pub fn gender() -> Self {
        CategoryDomain::new(
            "Gender",
            vec![
                Category::new("Male", "#90d5ff"),
                Category::new("Female", "#ffb5c0"),
            ],
        )
    }

    pub fn generation() -> Self {
        CategoryDomain::new(
            "Generation",
            vec![
                Category::new("POST WAR", "#9467bd").with_caption("(1928-1945)"),
                Category::new("BOOMERS", "#1f77b4").with_caption("(1946-1964)"),
                Category::new("GEN X", "#ff7f0e").with_caption("(1965-1980)"),
                Category::new("GEN Y", "#2ca02c").with_caption("(1981-1996)"),
                Category::new("GEN Z", "#d62728").with_caption("(1997-2012)"),
            ],
        )
    }

    pub fn religion() -> Self {
        CategoryDomain::new(
            "Religion",
            vec![
                Category::new("Islam", "#1f77b4"),
                Category::new("Kristen", "#ff7f0e"),
                Category::new("Katholik", "#2ca02c"),
                Category::new("Hindu", "#d62728"),
                Category::new("Buddha", "#9467bd"),
                Category::new("Kepercayaan", "#8c564b"),
                Category::new("Kong Hu Cu", "#e377c2"),
            ],
        )
    }

    pub fn tenure() -> Self {
        const COLORS: [&str; 8] = [
            "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728",
            "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
        ];
        CategoryDomain::new(
            "Tenure Group",
            TenureCohort::ALL
                .into_iter()
                .zip(COLORS)
                .map(|(cohort, color)| Category::new(cohort.label(), color))
                .collect(),
        )
    }
}

/// Qualitative color sequence for charts without a fixed domain (region).
pub const QUALITATIVE_PALETTE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A",
    "#19D3F3", "#FF6692", "#B6E880", "#FF97FF", "#FECB52",
];

/// Sequential color stops for continuous values (age), dark to light.
pub const VIRIDIS_SCALE: [&str; 10] = [
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e",
    "#1f9e89", "#35b779", "#6ece58", "#b5de2b", "#fde725",
];

/// Nearest Viridis stop for `value` placed within `[min, max]`.
/// A degenerate range maps to the first stop.
pub fn viridis_color(value: f64, min: f64, max: f64) -> &'static str {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 {
        return VIRIDIS_SCALE[0];
    }
    let t = ((value - min) / span).clamp(0.0, 1.0);
    let last = VIRIDIS_SCALE.len() - 1;
    VIRIDIS_SCALE[(t * last as f64).round() as usize]
}

/// The category domains injected into the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRegistry {
    #[serde(default = "CategoryDomain::gender")]
    pub gender: CategoryDomain,
    #[serde(default = "CategoryDomain::generation")]
    pub generation: CategoryDomain,
    #[serde(default = "CategoryDomain::religion")]
    pub religion: CategoryDomain,
    #[serde(default = "CategoryDomain::tenure")]
    pub tenure: CategoryDomain,
}

impl Default for DomainRegistry {
    fn default() -> Self {
        DomainRegistry {
            gender: CategoryDomain::gender(),
            generation: CategoryDomain::generation(),
            religion: CategoryDomain::religion(),
            tenure: CategoryDomain::tenure(),
        }
    }
}

impl DomainRegistry {
    /// Domain of a percentage-based metric.
    pub fn for_metric(&self, metric: Metric) -> Option<&CategoryDomain> {
        match metric {
            Metric::Gender => Some(&self.gender),
            Metric::Generation => Some(&self.generation),
            Metric::Religion => Some(&self.religion),
            Metric::Tenure => Some(&self.tenure),
            Metric::Total | Metric::Region | Metric::Age => None,
        }
    }
}

//! FILENAME: core/metrics-engine/src/aggregator.rs
//! Aggregator - turns a filtered record set into a render-ready result.
//!
//! Algorithm for the percentage-based metrics:
//! 1. Group rows by (breakdown value, category value) and count
//! 2. Zero-fill every domain category missing from a group
//! 3. Normalize within each group: 100 * count / group total (0 if empty)
//! 4. Format "<count> (<pct:.1>%)" labels
//!
//! Total and region are plain counts sorted descending; age is a count per
//! discrete age sorted ascending. Column requirements are checked once, up
//! front, and yield the single `MissingColumn` error path.

use std::collections::BTreeMap;
use rustc_hash::FxHashMap;
use engine::{Attribute, ColumnSet};
use crate::definition::{BreakdownDimension, CategoryDomain, DomainRegistry, Metric};
use crate::error::MetricError;
use crate::filter::FilteredRecords;
use crate::view::{
    percentage_of, round_to, AgeCount, AgeDistribution, AggregationResult, CategoricalBreakdown,
    CategoryShare, CategorySummary, CountBreakdown, CountRow, GroupShare,
};

// ============================================================================
// AGGREGATOR
// ============================================================================

/// Computes metric views using an injected set of category domains.
pub struct Aggregator<'d> {
    domains: &'d DomainRegistry,
}

impl<'d> Aggregator<'d> {
    pub fn new(domains: &'d DomainRegistry) -> Self {
        Aggregator { domains }
    }

    pub fn domains(&self) -> &'d DomainRegistry {
        self.domains
    }

    /// Checks that every column the request reads exists in the source.
    pub fn validate(
        &self,
        columns: ColumnSet,
        breakdown: BreakdownDimension,
        metric: Metric,
    ) -> Result<(), MetricError> {
        let breakdown_column = metric.uses_breakdown().then(|| breakdown.column());
        let missing = breakdown_column
            .into_iter()
            .chain(metric.required_columns().iter().copied())
            .find(|c| !columns.contains(*c));

        match missing {
            Some(column) => Err(MetricError::MissingColumn { metric, column }),
            None => Ok(()),
        }
    }

    /// Aggregates one metric view over the filtered records.
    pub fn aggregate(
        &self,
        filtered: &FilteredRecords<'_>,
        breakdown: BreakdownDimension,
        metric: Metric,
    ) -> Result<AggregationResult, MetricError> {
        self.validate(filtered.columns(), breakdown, metric)?;

        let result = match (metric.category_attribute(), self.domains.for_metric(metric)) {
            (Some(category), Some(domain)) => AggregationResult::Categorical(
                categorical_breakdown(filtered, breakdown, metric, category, domain),
            ),
            _ => match metric {
                Metric::Region => AggregationResult::Region(count_by_region(filtered)),
                Metric::Age => AggregationResult::Age(age_distribution(filtered)),
                _ => AggregationResult::Total(count_by_breakdown(filtered, breakdown)),
            },
        };

        Ok(result)
    }
}

// ============================================================================
// CATEGORICAL METRICS
// ============================================================================

/// Per-group tallies, indexed like the domain's categories.
struct GroupTally {
    counts: Vec<u64>,
    unclassified: u64,
}

impl GroupTally {
    fn new(categories: usize) -> Self {
        GroupTally {
            counts: vec![0; categories],
            unclassified: 0,
        }
    }

    fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Counts and normalizes `category` within each breakdown group.
///
/// Groups are the distinct breakdown values of the filtered rows, ascending.
/// Rows with a category outside `domain` (or none at all) are counted as
/// unclassified and excluded from the percentage base.
pub fn categorical_breakdown(
    filtered: &FilteredRecords<'_>,
    breakdown: BreakdownDimension,
    metric: Metric,
    category: Attribute,
    domain: &CategoryDomain,
) -> CategoricalBreakdown {
    let group_attribute = breakdown.attribute();
    let mut tallies: FxHashMap<&str, GroupTally> = FxHashMap::default();

    for record in filtered.iter() {
        let Some(group) = record.attribute(group_attribute) else {
            continue;
        };
        let tally = tallies
            .entry(group)
            .or_insert_with(|| GroupTally::new(domain.len()));
        match record.attribute(category).and_then(|v| domain.position(v)) {
            Some(idx) => tally.counts[idx] += 1,
            None => tally.unclassified += 1,
        }
    }

    let mut keys: Vec<&str> = tallies.keys().copied().collect();
    keys.sort_unstable();

    let mut column_totals = vec![0u64; domain.len()];
    let mut unclassified = 0u64;
    let mut groups = Vec::with_capacity(keys.len());

    for key in keys {
        let tally = &tallies[key];
        let total = tally.total();
        for (sum, count) in column_totals.iter_mut().zip(&tally.counts) {
            *sum += count;
        }
        unclassified += tally.unclassified;

        groups.push(GroupShare {
            group: key.to_string(),
            total,
            unclassified: tally.unclassified,
            shares: domain
                .labels()
                .zip(&tally.counts)
                .map(|(label, &count)| CategoryShare::new(label, count, total))
                .collect(),
        });
    }

    let grand_total: u64 = column_totals.iter().sum();
    let summary = domain
        .labels()
        .zip(&column_totals)
        .map(|(label, &count)| CategorySummary {
            category: label.to_string(),
            count,
            percentage: round_to(percentage_of(count, grand_total), 2),
        })
        .collect();

    CategoricalBreakdown {
        metric,
        breakdown,
        categories: domain.labels().map(str::to_string).collect(),
        groups,
        summary,
        grand_total,
        unclassified,
    }
}

// ============================================================================
// COUNT METRICS
// ============================================================================

/// Counts rows per value of `attribute`, descending by count. Ties are
/// ordered by value so the output is deterministic.
fn count_by_attribute(filtered: &FilteredRecords<'_>, attribute: Attribute, axis: &str) -> CountBreakdown {
    let mut counts: FxHashMap<&str, u64> = FxHashMap::default();
    for value in filtered.iter().filter_map(|r| r.attribute(attribute)) {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut rows: Vec<CountRow> = counts
        .into_iter()
        .map(|(key, count)| CountRow {
            key: key.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));

    CountBreakdown {
        axis: axis.to_string(),
        rows,
        total: filtered.len() as u64,
    }
}

/// Employee count per breakdown group (the default "total" view).
pub fn count_by_breakdown(filtered: &FilteredRecords<'_>, breakdown: BreakdownDimension) -> CountBreakdown {
    count_by_attribute(filtered, breakdown.attribute(), breakdown.name())
}

/// Employee count per region. Ignores the breakdown dimension.
pub fn count_by_region(filtered: &FilteredRecords<'_>) -> CountBreakdown {
    count_by_attribute(filtered, Attribute::Region, "region")
}

/// Employee count per discrete age, ascending by age.
pub fn age_distribution(filtered: &FilteredRecords<'_>) -> AgeDistribution {
    let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
    for age in filtered.iter().filter_map(|r| r.age) {
        *counts.entry(age).or_insert(0) += 1;
    }

    AgeDistribution {
        rows: counts
            .into_iter()
            .map(|(age, count)| AgeCount { age, count })
            .collect(),
        total: filtered.len() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{Column, Dataset, EmployeeRecord, TenureCohort};
    use crate::definition::{FilterDimension, FilterSelection};
    use crate::filter::apply_filters;

    fn employee(unit: &str, gender: &str) -> EmployeeRecord {
        EmployeeRecord {
            unit: Some(unit.to_string()),
            layer: Some("N-A".to_string()),
            gender: Some(gender.to_string()),
            ..Default::default()
        }
    }

    /// 10 rows: unit A has 6 (4 Male, 2 Female), unit B has 4 (3 Male, 1 Female).
    fn ten_rows() -> Dataset {
        let mut records = Vec::new();
        for _ in 0..4 {
            records.push(employee("A", "Male"));
        }
        for _ in 0..2 {
            records.push(employee("A", "Female"));
        }
        for _ in 0..3 {
            records.push(employee("B", "Male"));
        }
        records.push(employee("B", "Female"));
        Dataset::from_records(
            records,
            [Column::Unit, Column::Layer, Column::Gender].into_iter().collect(),
        )
    }

    #[test]
    fn gender_percentages_normalize_per_group() {
        let data = ten_rows();
        let domains = DomainRegistry::default();
        let filtered = apply_filters(&data, &FilterSelection::new());
        let result = Aggregator::new(&domains)
            .aggregate(&filtered, BreakdownDimension::Unit, Metric::Gender)
            .unwrap();
        let gender = result.as_categorical().unwrap();

        assert_eq!(gender.categories, vec!["Male", "Female"]);
        assert_eq!(gender.groups.len(), 2);

        let a = gender.group("A").unwrap();
        assert_eq!(a.total, 6);
        assert_eq!(a.share("Male").unwrap().count, 4);
        assert_eq!(a.share("Male").unwrap().label, "4 (66.7%)");
        assert!((a.percentage_sum() - 100.0).abs() < 1e-9);

        let b = gender.group("B").unwrap();
        assert_eq!(b.share("Female").unwrap().label, "1 (25.0%)");
        assert!((b.percentage_sum() - 100.0).abs() < 1e-9);

        assert_eq!(gender.grand_total, 10);
        assert_eq!(gender.summary[0].count, 7);
        assert_eq!(gender.summary[0].percentage, 70.0);
        assert_eq!(gender.summary[1].percentage, 30.0);
    }

    #[test]
    fn absent_categories_are_zero_filled() {
        let data = ten_rows();
        let domains = DomainRegistry::default();
        let filtered = apply_filters(&data, &FilterSelection::new());
        let result = categorical_breakdown(
            &filtered,
            BreakdownDimension::Unit,
            Metric::Generation,
            Attribute::Generation,
            &domains.generation,
        );

        for group in &result.groups {
            assert_eq!(group.shares.len(), 5);
            assert!(group.shares.iter().all(|s| s.count == 0 && s.percentage == 0.0));
            assert_eq!(group.shares[2].label, "0 (0.0%)");
        }
        assert_eq!(result.unclassified, 10);
        assert!(result.summary.iter().all(|s| s.percentage == 0.0));
    }

    #[test]
    fn out_of_domain_values_are_unclassified() {
        let mut records = vec![employee("A", "Male"), employee("A", "Female")];
        records.push(employee("A", "Nonbinary"));
        let data = Dataset::from_records(
            records,
            [Column::Unit, Column::Gender].into_iter().collect(),
        );
        let filtered = apply_filters(&data, &FilterSelection::new());
        let result = categorical_breakdown(
            &filtered,
            BreakdownDimension::Unit,
            Metric::Gender,
            Attribute::Gender,
            &DomainRegistry::default().gender,
        );
        let a = result.group("A").unwrap();
        assert_eq!(a.total, 2);
        assert_eq!(a.unclassified, 1);
        assert_eq!(a.share("Male").unwrap().percentage, 50.0);
    }

    #[test]
    fn groups_are_ordered_by_value() {
        let records = vec![employee("Zeta", "Male"), employee("Alpha", "Male"), employee("Mid", "Female")];
        let data = Dataset::from_records(records, [Column::Unit, Column::Gender].into_iter().collect());
        let filtered = apply_filters(&data, &FilterSelection::new());
        let result = categorical_breakdown(
            &filtered,
            BreakdownDimension::Unit,
            Metric::Gender,
            Attribute::Gender,
            &DomainRegistry::default().gender,
        );
        let names: Vec<_> = result.groups.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn tenure_metric_groups_by_cohort() {
        let records = vec![
            EmployeeRecord {
                unit: Some("A".into()),
                tenure: TenureCohort::from_years(0.2),
                ..Default::default()
            },
            EmployeeRecord {
                unit: Some("A".into()),
                tenure: TenureCohort::from_years(26.0),
                ..Default::default()
            },
            EmployeeRecord {
                unit: Some("A".into()),
                tenure: None,
                ..Default::default()
            },
        ];
        let data = Dataset::from_records(records, [Column::Unit, Column::Years].into_iter().collect());
        let domains = DomainRegistry::default();
        let filtered = apply_filters(&data, &FilterSelection::new());
        let result = Aggregator::new(&domains)
            .aggregate(&filtered, BreakdownDimension::Unit, Metric::Tenure)
            .unwrap();
        let tenure = result.as_categorical().unwrap();
        let a = tenure.group("A").unwrap();
        assert_eq!(a.shares.len(), 8);
        assert_eq!(a.share("<1 Year").unwrap().label, "1 (50.0%)");
        assert_eq!(a.share(">25 Year").unwrap().label, "1 (50.0%)");
        assert_eq!(a.unclassified, 1);
    }

    #[test]
    fn total_sorts_descending_by_count() {
        let data = ten_rows();
        let domains = DomainRegistry::default();
        let filtered = apply_filters(&data, &FilterSelection::new());
        let result = Aggregator::new(&domains)
            .aggregate(&filtered, BreakdownDimension::Unit, Metric::Total)
            .unwrap();
        let counts = result.as_counts().unwrap();
        assert_eq!(counts.axis, "unit");
        assert_eq!(counts.total, 10);
        assert_eq!(
            counts.rows,
            vec![
                CountRow { key: "A".into(), count: 6 },
                CountRow { key: "B".into(), count: 4 },
            ]
        );
    }

    #[test]
    fn total_respects_filters() {
        let data = ten_rows();
        let selection = FilterSelection::new().with(FilterDimension::Gender, ["Female"]);
        let filtered = apply_filters(&data, &selection);
        let counts = count_by_breakdown(&filtered, BreakdownDimension::Unit);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.count_of("A"), Some(2));
        assert_eq!(counts.count_of("B"), Some(1));
    }

    #[test]
    fn region_requires_region_column() {
        let data = ten_rows();
        let domains = DomainRegistry::default();
        let aggregator = Aggregator::new(&domains);
        let filtered = apply_filters(&data, &FilterSelection::new());

        let err = aggregator
            .aggregate(&filtered, BreakdownDimension::Unit, Metric::Region)
            .unwrap_err();
        assert_eq!(
            err,
            MetricError::MissingColumn { metric: Metric::Region, column: Column::Region }
        );

        // A later metric on the same dataset is unaffected
        assert!(aggregator
            .aggregate(&filtered, BreakdownDimension::Unit, Metric::Gender)
            .is_ok());
    }

    #[test]
    fn breakdown_column_is_required() {
        let data = ten_rows();
        let domains = DomainRegistry::default();
        let filtered = apply_filters(&data, &FilterSelection::new());
        let err = Aggregator::new(&domains)
            .aggregate(&filtered, BreakdownDimension::Subunit, Metric::Gender)
            .unwrap_err();
        assert_eq!(
            err,
            MetricError::MissingColumn { metric: Metric::Gender, column: Column::Subunit }
        );
    }

    #[test]
    fn region_ignores_breakdown() {
        let records = vec![
            EmployeeRecord { unit: Some("A".into()), region: Some("Java".into()), ..Default::default() },
            EmployeeRecord { unit: Some("B".into()), region: Some("Bali".into()), ..Default::default() },
            EmployeeRecord { unit: Some("B".into()), region: Some("Java".into()), ..Default::default() },
            EmployeeRecord { unit: Some("B".into()), region: None, ..Default::default() },
        ];
        let data = Dataset::from_records(records, [Column::Unit, Column::Region].into_iter().collect());
        let domains = DomainRegistry::default();
        let filtered = apply_filters(&data, &FilterSelection::new());
        // Subunit is absent, but region does not read the breakdown column
        let result = Aggregator::new(&domains)
            .aggregate(&filtered, BreakdownDimension::Subunit, Metric::Region)
            .unwrap();
        let counts = result.as_counts().unwrap();
        assert_eq!(counts.axis, "region");
        assert_eq!(counts.rows[0], CountRow { key: "Java".into(), count: 2 });
        assert_eq!(counts.rows[1], CountRow { key: "Bali".into(), count: 1 });
    }

    #[test]
    fn ages_ascend_without_percentages() {
        let records: Vec<EmployeeRecord> = [30, 22, 23, 22]
            .into_iter()
            .map(|age| EmployeeRecord {
                unit: Some("A".into()),
                age: Some(age),
                ..Default::default()
            })
            .collect();
        let data = Dataset::from_records(records, [Column::Unit, Column::Age].into_iter().collect());
        let domains = DomainRegistry::default();
        let filtered = apply_filters(&data, &FilterSelection::new());
        let result = Aggregator::new(&domains)
            .aggregate(&filtered, BreakdownDimension::Unit, Metric::Age)
            .unwrap();
        let ages = result.as_ages().unwrap();
        assert_eq!(
            ages.rows,
            vec![
                AgeCount { age: 22, count: 2 },
                AgeCount { age: 23, count: 1 },
                AgeCount { age: 30, count: 1 },
            ]
        );
    }

    #[test]
    fn empty_filter_result_yields_no_groups() {
        let data = ten_rows();
        let selection = FilterSelection::new().with(FilterDimension::Unit, ["Nowhere"]);
        let filtered = apply_filters(&data, &selection);
        let result = categorical_breakdown(
            &filtered,
            BreakdownDimension::Unit,
            Metric::Gender,
            Attribute::Gender,
            &DomainRegistry::default().gender,
        );
        assert!(result.groups.is_empty());
        assert_eq!(result.grand_total, 0);
        assert_eq!(result.summary.len(), 2);
        assert!(result.summary.iter().all(|s| s.count == 0 && s.percentage == 0.0));
    }

    #[test]
    fn each_category_metric_reads_its_own_domain() {
        let record = EmployeeRecord {
            unit: Some("A".to_string()),
            gender: Some("Female".to_string()),
            generation: Some("GEN Y".to_string()),
            religion: Some("Hindu".to_string()),
            tenure: Some(TenureCohort::SixToTen),
            ..Default::default()
        };
        let data = Dataset::from_records(
            vec![record],
            [Column::Unit, Column::Gender, Column::Generation, Column::Religion, Column::Years]
                .into_iter()
                .collect(),
        );
        let domains = DomainRegistry::default();
        let aggregator = Aggregator::new(&domains);
        let filtered = apply_filters(&data, &FilterSelection::new());

        let expected = [
            (Metric::Gender, "Female", 2),
            (Metric::Generation, "GEN Y", 5),
            (Metric::Religion, "Hindu", 7),
            (Metric::Tenure, "6-10 Year", 8),
        ];
        for (metric, category, domain_len) in expected {
            let result = aggregator
                .aggregate(&filtered, BreakdownDimension::Unit, metric)
                .unwrap();
            let view = result.as_categorical().unwrap();
            assert_eq!(view.metric, metric);
            assert_eq!(view.categories.len(), domain_len);
            assert_eq!(view.unclassified, 0);
            assert_eq!(view.group("A").unwrap().share(category).unwrap().percentage, 100.0);
        }
    }
}

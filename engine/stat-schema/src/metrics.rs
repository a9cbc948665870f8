//! # Metric Detection
//!
//! A metric is a numeric, analysis-worthy column that is not used for
//! identity or grouping.

use crate::canonical::FieldMap;
use crate::dataset::Dataset;

/// Minimum number of finite numeric cells for a column to count as a metric
pub const MIN_FINITE_VALUES: usize = 5;

/// Common offensive/defensive stats, listed first when present
pub const PREFERRED_METRICS: &[&str] = &[
    "passing_yards",
    "passing_tds",
    "interceptions",
    "rushing_yards",
    "rushing_tds",
    "receiving_yards",
    "receiving_tds",
    "receptions",
    "targets",
    "sacks",
    "fantasy_points",
];

/// Columns that qualify as metrics, in display order.
///
/// A column qualifies when it is not claimed by `fields`, holds at least
/// [`MIN_FINITE_VALUES`] finite numbers, and those numbers are not all equal.
pub fn detect_metrics(dataset: &Dataset, fields: &FieldMap) -> Vec<String> {
    let numeric = dataset
        .columns()
        .iter()
        .filter(|column| !fields.claims(column))
        .filter(|column| is_metric_column(dataset, column))
        .cloned()
        .collect();
    order_metrics(numeric)
}

fn is_metric_column(dataset: &Dataset, column: &str) -> bool {
    let mut count = 0usize;
    let mut first: Option<f64> = None;
    let mut varies = false;

    for n in dataset.column_values(column).filter_map(|v| v.finite_number()) {
        count += 1;
        match first {
            None => first = Some(n),
            Some(f) if f != n => varies = true,
            Some(_) => {}
        }
    }

    count >= MIN_FINITE_VALUES && varies
}

/// Stable sort: preferred names first in list order, the rest keep their order
pub fn order_metrics(mut metrics: Vec<String>) -> Vec<String> {
    metrics.sort_by_key(|m| preference_rank(m));
    metrics
}

fn preference_rank(metric: &str) -> usize {
    PREFERRED_METRICS.iter().position(|p| *p == metric).unwrap_or(PREFERRED_METRICS.len())
}

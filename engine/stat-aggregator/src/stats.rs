//! Summary statistics for one group of metric values

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Rollup of one group's metric values
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total: f64,
    /// Distinct weeks, or row count when the dataset has no week column
    pub games: usize,
    /// `total / games`
    pub mean: f64,
    /// Mean with the single lowest and highest value dropped (when > 2 values)
    pub trimmed_mean: f64,
    pub std_dev: f64,
    /// Coefficient of variation in percent; 0 when the mean is 0
    pub cv: f64,
}

impl SummaryStats {
    /// Compute stats for `values` with `games` as the mean's denominator.
    ///
    /// Variance averages squared deviations from `mean` over the values
    /// themselves, not over `games`.
    pub fn compute(mut values: Vec<f64>, games: usize) -> Self {
        values.sort_by(f64::total_cmp);

        let total: f64 = values.iter().sum();
        let mean = if games == 0 { 0.0 } else { total / games as f64 };
        let trimmed_mean = average(trimmed(&values));

        let variance = average_by(&values, |v| (v - mean).powi(2));
        let std_dev = variance.sqrt();
        let cv = if mean == 0.0 { 0.0 } else { std_dev / mean * 100.0 };

        Self { total, games, mean, trimmed_mean, std_dev, cv }
    }
}

/// Drop one lowest and one highest value from sorted input when there are
/// more than two; otherwise return everything.
pub fn trimmed(sorted: &[f64]) -> &[f64] {
    if sorted.len() > 2 {
        &sorted[1..sorted.len() - 1]
    } else {
        sorted
    }
}

fn average(values: &[f64]) -> f64 {
    average_by(values, |v| v)
}

fn average_by(values: &[f64], f: impl Fn(f64) -> f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().copied().map(f).sum::<f64>() / values.len() as f64
}

/// Most frequent item; ties go to whichever item was seen first
pub fn most_common<T, I>(items: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen: Vec<(T, usize)> = Vec::new();
    let mut slots: HashMap<T, usize> = HashMap::new();

    for item in items {
        match slots.get(&item) {
            Some(&slot) => seen[slot].1 += 1,
            None => {
                slots.insert(item.clone(), seen.len());
                seen.push((item, 1));
            }
        }
    }

    let mut best: Option<(T, usize)> = None;
    for (item, count) in seen {
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((item, count));
        }
    }
    best.map(|(item, _)| item)
}

//! Leaderboard sorting

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::aggregate::AggregateResult;

/// Rows shown by default
pub const DEFAULT_LIMIT: usize = 20;

/// Column a leaderboard can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Total,
    Games,
    Mean,
    TrimmedMean,
    StdDev,
    Cv,
    Team,
    Name,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::Total,
        SortKey::Games,
        SortKey::Mean,
        SortKey::TrimmedMean,
        SortKey::StdDev,
        SortKey::Cv,
        SortKey::Team,
        SortKey::Name,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Total => "total",
            SortKey::Games => "games",
            SortKey::Mean => "mean",
            SortKey::TrimmedMean => "trimmed_mean",
            SortKey::StdDev => "std_dev",
            SortKey::Cv => "cv",
            SortKey::Team => "team",
            SortKey::Name => "name",
        }
    }

    /// Numbers rank high-to-low, text A-to-Z
    pub fn default_order(&self) -> SortOrder {
        match self {
            SortKey::Team | SortKey::Name => SortOrder::Ascending,
            _ => SortOrder::Descending,
        }
    }

    fn compare(&self, a: &AggregateResult, b: &AggregateResult) -> Ordering {
        let number = |f: fn(&AggregateResult) -> f64| f(a).total_cmp(&f(b));
        match self {
            SortKey::Total => number(|r| r.stats.total),
            SortKey::Games => a.stats.games.cmp(&b.stats.games),
            SortKey::Mean => number(|r| r.stats.mean),
            SortKey::TrimmedMean => number(|r| r.stats.trimmed_mean),
            SortKey::StdDev => number(|r| r.stats.std_dev),
            SortKey::Cv => number(|r| r.stats.cv),
            SortKey::Team => a.team.as_deref().unwrap_or("").cmp(b.team.as_deref().unwrap_or("")),
            SortKey::Name => a.display.cmp(&b.display),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown sort key '{0}' (expected one of: total, games, mean, trimmed_mean, std_dev, cv, team, name)")]
pub struct ParseSortKeyError(pub String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        match wanted.as_str() {
            "avg" => return Ok(SortKey::Mean),
            "bal_avg" | "balanced" => return Ok(SortKey::TrimmedMean),
            "sd" => return Ok(SortKey::StdDev),
            "gp" => return Ok(SortKey::Games),
            "display" | "player" => return Ok(SortKey::Name),
            _ => {}
        }
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| ParseSortKeyError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// How a leaderboard is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardView {
    pub sort: SortKey,
    pub order: SortOrder,
    /// `None` shows every row
    pub limit: Option<usize>,
}

impl Default for LeaderboardView {
    fn default() -> Self {
        Self { sort: SortKey::Total, order: SortOrder::Descending, limit: Some(DEFAULT_LIMIT) }
    }
}

impl LeaderboardView {
    /// Sort by `key` in its natural direction
    pub fn by(key: SortKey) -> Self {
        Self { sort: key, order: key.default_order(), ..Self::default() }
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// Stable sort; equal keys keep their input order in both directions
pub fn sort_results(results: &mut [AggregateResult], key: SortKey, order: SortOrder) {
    results.sort_by(|a, b| match order {
        SortOrder::Ascending => key.compare(a, b),
        SortOrder::Descending => key.compare(b, a),
    });
}

/// Sort then truncate to the view's limit
pub fn leaderboard(mut results: Vec<AggregateResult>, view: &LeaderboardView) -> Vec<AggregateResult> {
    sort_results(&mut results, view.sort, view.order);
    if let Some(limit) = view.limit {
        results.truncate(limit);
    }
    results
}

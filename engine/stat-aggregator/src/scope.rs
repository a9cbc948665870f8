//! # Selection Scope
//!
//! Helpers that describe what a user can currently pick: available seasons,
//! positions inside the active season/team scope, player name suggestions,
//! and which metrics a player actually recorded.

use stat_schema::{CanonicalField, Dataset, FieldMap};
use std::collections::BTreeSet;

use crate::filter::{Filter, TeamScope};

/// Maximum number of player suggestions returned by [`search_players`]
pub const PLAYER_SUGGESTION_LIMIT: usize = 15;

/// Distinct whole-number seasons, ascending
pub fn seasons(dataset: &Dataset, fields: &FieldMap) -> Vec<i32> {
    let Some(column) = fields.get(CanonicalField::Season) else {
        return Vec::new();
    };
    dataset
        .column_values(column)
        .filter_map(|v| v.as_i32())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Default season selection
pub fn latest_season(dataset: &Dataset, fields: &FieldMap) -> Option<i32> {
    seasons(dataset, fields).last().copied()
}

/// Positions present among rows of `season` within `teams`, sorted
pub fn positions_in_scope(
    dataset: &Dataset,
    fields: &FieldMap,
    season: Option<i32>,
    teams: &TeamScope,
) -> Vec<String> {
    let Some(column) = fields.get(CanonicalField::Position) else {
        return Vec::new();
    };
    let scope = Filter { season, teams: teams.clone(), ..Filter::all() };
    dataset
        .rows()
        .filter(|row| scope.matches(row, fields))
        .filter_map(|row| row.value(Some(column)).label())
        .filter(|p| !p.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every distinct display name in the dataset, sorted
pub fn player_names(dataset: &Dataset, fields: &FieldMap) -> Vec<String> {
    dataset
        .rows()
        .map(|row| fields.display_name(&row))
        .filter(|name| name != stat_schema::MISSING_NAME)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Names containing `query` (case-insensitive), capped at `limit`
pub fn search_players(names: &[String], query: &str, limit: usize) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    names
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .take(limit)
        .cloned()
        .collect()
}

/// Metrics (in the given order) where some row of `player_id` is above zero,
/// optionally within one season
pub fn active_metrics(
    dataset: &Dataset,
    fields: &FieldMap,
    player_id: &str,
    season: Option<i32>,
    metrics: &[String],
) -> Vec<String> {
    let id_column = fields.player_id();
    let scope = Filter { season, ..Filter::all() };
    let rows: Vec<_> = dataset
        .rows()
        .filter(|row| row.value(Some(id_column)).label().as_deref() == Some(player_id))
        .filter(|row| scope.matches(row, fields))
        .collect();

    metrics
        .iter()
        .filter(|metric| rows.iter().any(|row| row.value(Some(metric.as_str())).coerce_f64() > 0.0))
        .cloned()
        .collect()
}

/// First team code seen in the dataset, the team view's default
pub fn first_team(dataset: &Dataset, fields: &FieldMap) -> Option<String> {
    let column = fields.get(CanonicalField::Team)?;
    dataset.column_values(column).find_map(|v| v.label())
}

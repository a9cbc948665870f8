//! # Chart Series
//!
//! Week-by-week series for the player and team views.
//!
//! The team view pairs every game of a team with the opponent's row for the
//! same season and week. Historical team codes are folded onto current ones
//! before pairing (`OAK` → `LV` and so on), so relocated franchises still
//! line up.

use serde::Serialize;
use stat_schema::{CanonicalField, Dataset, FieldMap, Row, SchemaError};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Historical code → current code
pub const TEAM_ALIASES: &[(&str, &str)] =
    &[("JAC", "JAX"), ("LA", "LAR"), ("OAK", "LV"), ("STL", "LAR"), ("SD", "LAC")];

/// Preferred team-view metrics, used when the dataset carries them
pub const TEAM_OFFENSE_METRICS: &[&str] =
    &["passing_yards", "rushing_yards", "completions", "attempts", "passing_tds"];

const TEAM_FALLBACK_METRICS: usize = 6;

const REQUIRED_TEAM_FIELDS: [CanonicalField; 3] =
    [CanonicalField::Team, CanonicalField::Season, CanonicalField::Week];

/// Trim, uppercase, then apply [`TEAM_ALIASES`]
pub fn normalize_team_code(code: &str) -> String {
    let upper = code.trim().to_uppercase();
    TEAM_ALIASES
        .iter()
        .find(|(old, _)| *old == upper)
        .map(|(_, current)| current.to_string())
        .unwrap_or(upper)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklyPoint {
    pub week: i32,
    pub value: f64,
}

/// One team game: the team's value against the opponent's value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupPoint {
    pub week: i32,
    pub offense: f64,
    /// Opponent's value for the same metric, 0 when no opponent row exists
    pub defense: f64,
    pub opponent: String,
}

/// Sum of `metric` per week for one player, weeks ascending.
///
/// `season: None` spans every season, so the same week number from different
/// seasons lands in one point.
pub fn player_weekly_series(
    dataset: &Dataset,
    fields: &FieldMap,
    player_id: &str,
    season: Option<i32>,
    metric: &str,
) -> Vec<WeeklyPoint> {
    let id_column = fields.player_id();
    let season_column = fields.get(CanonicalField::Season);
    let week_column = fields.get(CanonicalField::Week);

    let mut weeks: BTreeMap<i32, f64> = BTreeMap::new();
    for row in dataset.rows() {
        if row.value(Some(id_column)).label().as_deref() != Some(player_id) {
            continue;
        }
        if season.is_some() && row.value(season_column).as_i32() != season {
            continue;
        }
        let Some(week) = row.value(week_column).as_i32() else {
            continue;
        };
        *weeks.entry(week).or_insert(0.0) += row.value(Some(metric)).coerce_f64();
    }

    weeks.into_iter().map(|(week, value)| WeeklyPoint { week, value }).collect()
}

type GameKey = (String, i32, i32);

fn game_key(row: &Row<'_>, fields: &FieldMap) -> Option<GameKey> {
    let team = row.value(fields.get(CanonicalField::Team)).label()?;
    let season = row.value(fields.get(CanonicalField::Season)).as_i32()?;
    let week = row.value(fields.get(CanonicalField::Week)).as_i32()?;
    Some((normalize_team_code(&team), season, week))
}

/// Offense/defense pairs for `team` in `season`, weeks ascending.
///
/// Fails with [`SchemaError::MissingColumns`] when the dataset lacks a team,
/// season or week column.
pub fn team_matchup_series(
    dataset: &Dataset,
    fields: &FieldMap,
    team: &str,
    season: i32,
    metric: &str,
) -> stat_schema::Result<Vec<MatchupPoint>> {
    fields.require(&REQUIRED_TEAM_FIELDS)?;

    // Later rows for the same game replace earlier ones
    let games: HashMap<GameKey, Row<'_>> =
        dataset.rows().filter_map(|row| game_key(&row, fields).map(|key| (key, row))).collect();

    let team = normalize_team_code(team);
    let opponent_column = fields.get(CanonicalField::Opponent);

    let mut points: Vec<MatchupPoint> = dataset
        .rows()
        .filter_map(|row| {
            let key = game_key(&row, fields)?;
            if key.0 != team || key.1 != season {
                return None;
            }
            let week = key.2;

            let offense = row.value(Some(metric)).finite_number().unwrap_or(0.0);
            let opponent_code = row.value(opponent_column).label().map(|c| normalize_team_code(&c));
            let opponent_row = opponent_code
                .as_ref()
                .and_then(|code| games.get(&(code.clone(), season, week)));
            let defense = opponent_row
                .and_then(|r| r.value(Some(metric)).finite_number())
                .unwrap_or(0.0);
            let opponent = opponent_code.unwrap_or_default();

            Some(MatchupPoint { week, offense, defense, opponent })
        })
        .collect();

    points.sort_by_key(|p| p.week);
    debug!("Matchup series for {} {}: {} games ({})", team, season, points.len(), metric);
    Ok(points)
}

/// Metrics offered in the team view: the preferred offense set when present,
/// otherwise the first few detected metrics
pub fn team_chart_metrics(columns: &[String], metrics: &[String]) -> Vec<String> {
    let preferred: Vec<String> = TEAM_OFFENSE_METRICS
        .iter()
        .filter(|m| columns.iter().any(|c| c == *m))
        .map(|m| m.to_string())
        .collect();

    if preferred.is_empty() {
        metrics.iter().take(TEAM_FALLBACK_METRICS).cloned().collect()
    } else {
        preferred
    }
}

/// Convenience check used by callers that want the error before building series
pub fn require_team_columns(fields: &FieldMap) -> Result<(), SchemaError> {
    fields.require(&REQUIRED_TEAM_FIELDS)
}

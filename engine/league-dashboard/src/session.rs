//! # Dashboard Sessions
//!
//! A loaded dataset plus everything derived from it at load time. Both
//! [`Dashboard`] (the league/player views) and [`TeamDashboard`] are
//! immutable snapshots: every query takes explicit selections and returns a
//! fresh result.

use serde::Serialize;
use stat_aggregator::{
    active_metrics, aggregate, first_team, latest_season, leaderboard, normalize_team_code,
    player_names, player_weekly_series, positions_in_scope, search_players, seasons, selection,
    team_chart_metrics, team_matchup_series, AggregateQuery, AggregateResult, Divisions, Filter,
    LeaderboardView, MatchupPoint, TeamScope, WeeklyPoint, ALL, PLAYER_SUGGESTION_LIMIT,
};
use stat_schema::{CanonicalField, Dataset, Schema};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use crate::error::{DashboardError, Result};

/// One-line load outcome shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Status {
    Ready { rows: usize },
    Failed { message: String },
}

impl Status {
    pub fn ready(rows: usize) -> Self {
        Status::Ready { rows }
    }

    pub fn failed(err: &dyn fmt::Display) -> Self {
        Status::Failed { message: err.to_string() }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Status::Ready { .. })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready { rows } => write!(f, "Data OK — rows: {rows}"),
            Status::Failed { message } => write!(f, "Init error: {message}"),
        }
    }
}

/// Raw selector values; `ALL` (or empty) leaves a dimension unrestricted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// `None` picks the latest season in the data
    pub season: Option<i32>,
    pub conference: String,
    pub division: String,
    pub position: String,
    pub player: Option<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            season: None,
            conference: ALL.to_string(),
            division: ALL.to_string(),
            position: ALL.to_string(),
            player: None,
        }
    }
}

/// Header details for the player view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProfile {
    pub player_id: String,
    pub display: String,
    pub team: Option<String>,
    pub position: Option<String>,
    pub season: Option<i32>,
    pub headshot_url: Option<String>,
    /// Metrics with at least one positive value, in metric-list order
    pub metrics: Vec<String>,
}

/// League and player views over the weekly player dataset
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Dataset,
    schema: Schema,
    divisions: Divisions,
    seasons: Vec<i32>,
    player_names: Vec<String>,
}

impl Dashboard {
    pub fn new(dataset: Dataset, schema: Schema, divisions: Divisions) -> Self {
        let seasons = seasons(&dataset, &schema.fields);
        let player_names = player_names(&dataset, &schema.fields);
        debug!("Dashboard ready: {} seasons, {} players", seasons.len(), player_names.len());
        Self { dataset, schema, divisions, seasons, player_names }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn divisions(&self) -> &Divisions {
        &self.divisions
    }

    pub fn metrics(&self) -> &[String] {
        &self.schema.metrics
    }

    pub fn status(&self) -> Status {
        Status::ready(self.dataset.len())
    }

    /// Seasons ascending
    pub fn seasons(&self) -> &[i32] {
        &self.seasons
    }

    pub fn latest_season(&self) -> Option<i32> {
        self.seasons.last().copied()
    }

    /// `preferred` when it is a detected metric, else the first metric
    pub fn default_metric(&self, preferred: Option<&str>) -> Option<&str> {
        preferred
            .and_then(|p| self.schema.metrics.iter().find(|m| m.as_str() == p))
            .or_else(|| self.schema.metrics.first())
            .map(String::as_str)
    }

    pub fn team_scope(&self, conference: &str, division: &str) -> TeamScope {
        TeamScope::from_divisions(&self.divisions, selection(conference), selection(division))
    }

    /// Turn selector values into a row filter
    pub fn filter(&self, selected: &Selection) -> Filter {
        Filter {
            season: selected.season.or_else(|| self.latest_season()),
            teams: self.team_scope(&selected.conference, &selected.division),
            position: selection(&selected.position).map(str::to_string),
            player: selected.player.as_deref().and_then(selection).map(str::to_string),
        }
    }

    /// Positions available for the season and team part of `selected`
    pub fn positions(&self, selected: &Selection) -> Vec<String> {
        let filter = self.filter(selected);
        positions_in_scope(&self.dataset, &self.schema.fields, filter.season, &filter.teams)
    }

    /// Up to 15 display names containing `query`
    pub fn search_players(&self, query: &str) -> Vec<String> {
        search_players(&self.player_names, query, PLAYER_SUGGESTION_LIMIT)
    }

    /// Aggregate `metric` per player under `filter`, then sort and truncate
    pub fn leaderboard(
        &self,
        metric: &str,
        filter: &Filter,
        view: &LeaderboardView,
    ) -> Result<Vec<AggregateResult>> {
        if !self.schema.has_metric(metric) {
            return Err(DashboardError::UnknownMetric(metric.to_string()));
        }
        let query = AggregateQuery::new(metric).filter(filter.clone());
        let results = aggregate(&self.dataset, &self.schema.fields, &query);
        Ok(leaderboard(results, view))
    }

    /// First matching row's details, `None` when the player has no rows
    pub fn player_profile(&self, player_id: &str, season: Option<i32>) -> Option<PlayerProfile> {
        let fields = &self.schema.fields;
        let scope = Filter { season, ..Filter::all() };
        let first = self.dataset.rows().find(|row| {
            row.value(Some(fields.player_id())).label().as_deref() == Some(player_id)
                && scope.matches(row, fields)
        })?;

        Some(PlayerProfile {
            player_id: player_id.to_string(),
            display: fields.display_name(&first),
            team: first.value(fields.get(CanonicalField::Team)).label(),
            position: first.value(fields.get(CanonicalField::Position)).label(),
            season: first.value(fields.get(CanonicalField::Season)).as_i32(),
            headshot_url: fields.headshot_url(&first),
            metrics: active_metrics(&self.dataset, fields, player_id, season, &self.schema.metrics),
        })
    }

    pub fn player_series(&self, player_id: &str, season: Option<i32>, metric: &str) -> Result<Vec<WeeklyPoint>> {
        if !self.schema.has_metric(metric) {
            return Err(DashboardError::UnknownMetric(metric.to_string()));
        }
        Ok(player_weekly_series(&self.dataset, &self.schema.fields, player_id, season, metric))
    }
}

/// Team view over the weekly team dataset
#[derive(Debug, Clone)]
pub struct TeamDashboard {
    dataset: Dataset,
    schema: Schema,
    divisions: Option<Divisions>,
}

impl TeamDashboard {
    pub fn new(dataset: Dataset, schema: Schema, divisions: Option<Divisions>) -> Self {
        Self { dataset, schema, divisions }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn status(&self) -> Status {
        Status::ready(self.dataset.len())
    }

    /// Normalized team codes, sorted
    pub fn teams(&self) -> Vec<String> {
        let Some(column) = self.schema.fields.get(CanonicalField::Team) else {
            return Vec::new();
        };
        self.dataset
            .column_values(column)
            .filter_map(|v| v.label())
            .map(|code| normalize_team_code(&code))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Team shown when none is requested
    pub fn default_team(&self) -> Option<String> {
        first_team(&self.dataset, &self.schema.fields).map(|code| normalize_team_code(&code))
    }

    pub fn seasons(&self) -> Vec<i32> {
        seasons(&self.dataset, &self.schema.fields)
    }

    pub fn latest_season(&self) -> Option<i32> {
        latest_season(&self.dataset, &self.schema.fields)
    }

    /// Metrics offered for charting
    pub fn chart_metrics(&self) -> Vec<String> {
        team_chart_metrics(self.dataset.columns(), &self.schema.metrics)
    }

    /// Conference and division, when a divisions lookup was loaded
    pub fn division_of(&self, team: &str) -> Option<(&str, &str)> {
        self.divisions.as_ref()?.lookup(&normalize_team_code(team))
    }

    pub fn series(&self, team: &str, season: i32, metric: &str) -> Result<Vec<MatchupPoint>> {
        if !self.dataset.has_column(metric) {
            return Err(DashboardError::UnknownMetric(metric.to_string()));
        }
        Ok(team_matchup_series(&self.dataset, &self.schema.fields, team, season, metric)?)
    }
}

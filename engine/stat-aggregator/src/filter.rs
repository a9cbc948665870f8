//! # Row Filters
//!
//! A [`Filter`] is an immutable value describing which rows take part in an
//! aggregation. Changing a selection means building a new `Filter`; nothing
//! is mutated behind the caller's back.
//!
//! Team scope comes from the [`Divisions`] lookup, which maps each team code
//! to its conference and division (`{"BUF": ["AFC", "East"], ...}`).

use serde::{Deserialize, Serialize};
use stat_schema::{CanonicalField, FieldMap, Row};
use std::collections::{BTreeMap, BTreeSet};

/// Selector value meaning "no restriction"
pub const ALL: &str = "ALL";

/// Map a UI-style selector onto an optional restriction (`"ALL"` → `None`)
pub fn selection(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
        None
    } else {
        Some(trimmed)
    }
}

/// Team code → (conference, division)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Divisions {
    teams: BTreeMap<String, (String, String)>,
}

impl Divisions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with(
        mut self,
        team: impl Into<String>,
        conference: impl Into<String>,
        division: impl Into<String>,
    ) -> Self {
        self.teams.insert(team.into(), (conference.into(), division.into()));
        self
    }

    pub fn lookup(&self, team: &str) -> Option<(&str, &str)> {
        self.teams.get(team).map(|(c, d)| (c.as_str(), d.as_str()))
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Distinct conferences, sorted
    pub fn conferences(&self) -> Vec<String> {
        self.teams.values().map(|(c, _)| c.clone()).collect::<BTreeSet<_>>().into_iter().collect()
    }

    /// Distinct divisions within `conference` (or all conferences), sorted
    pub fn divisions(&self, conference: Option<&str>) -> Vec<String> {
        self.teams
            .values()
            .filter(|(c, _)| conference.map_or(true, |want| c.eq_ignore_ascii_case(want)))
            .map(|(_, d)| d.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Teams whose conference and division match the given selections
    pub fn teams_in(&self, conference: Option<&str>, division: Option<&str>) -> BTreeSet<String> {
        self.teams
            .iter()
            .filter(|(_, (c, d))| {
                conference.map_or(true, |want| c.eq_ignore_ascii_case(want))
                    && division.map_or(true, |want| d.eq_ignore_ascii_case(want))
            })
            .map(|(team, _)| team.clone())
            .collect()
    }
}

/// Which teams a filter lets through
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TeamScope {
    /// No team restriction, including teams absent from the divisions lookup
    #[default]
    All,
    Teams(BTreeSet<String>),
}

impl TeamScope {
    /// Scope for a conference/division selection; both unset means [`TeamScope::All`]
    pub fn from_divisions(
        divisions: &Divisions,
        conference: Option<&str>,
        division: Option<&str>,
    ) -> Self {
        if conference.is_none() && division.is_none() {
            TeamScope::All
        } else {
            TeamScope::Teams(divisions.teams_in(conference, division))
        }
    }

    pub fn allows(&self, team: Option<&str>) -> bool {
        match self {
            TeamScope::All => true,
            TeamScope::Teams(teams) => team.map_or(false, |t| teams.contains(t)),
        }
    }
}

/// Conjunctive row filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    /// Exact season; `None` keeps every season
    pub season: Option<i32>,
    pub teams: TeamScope,
    /// Case-insensitive position; ignored when the dataset has no position column
    pub position: Option<String>,
    /// Case-insensitive display name
    pub player: Option<String>,
}

impl Filter {
    /// A filter that keeps every row
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_season(mut self, season: i32) -> Self {
        self.season = Some(season);
        self
    }

    pub fn with_teams(mut self, teams: TeamScope) -> Self {
        self.teams = teams;
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = Some(player.into());
        self
    }

    pub fn matches(&self, row: &Row<'_>, fields: &FieldMap) -> bool {
        if let Some(season) = self.season {
            if row.value(fields.get(CanonicalField::Season)).as_i32() != Some(season) {
                return false;
            }
        }

        if let TeamScope::Teams(_) = self.teams {
            let team = row.value(fields.get(CanonicalField::Team)).label();
            if !self.teams.allows(team.as_deref()) {
                return false;
            }
        }

        if let (Some(position), Some(column)) = (&self.position, fields.get(CanonicalField::Position)) {
            if !row.value(Some(column)).matches_text(position) {
                return false;
            }
        }

        if let Some(player) = &self.player {
            if fields.display_name(row).trim().to_lowercase() != player.trim().to_lowercase() {
                return false;
            }
        }

        true
    }
}

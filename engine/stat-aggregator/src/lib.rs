//! # StatAggregator
//!
//! Pure rollups over a [`stat_schema::Dataset`].
//!
//! Every operation takes the dataset snapshot, its [`stat_schema::FieldMap`]
//! and an explicit query value, and returns fresh results. Nothing here keeps
//! state between calls, so the same inputs always produce the same output.
//!
//! - [`aggregate`] groups filtered rows and computes [`SummaryStats`]
//! - [`leaderboard`] sorts and truncates aggregate results
//! - [`scope`] answers "what can the user pick" questions (seasons, positions, players)
//! - [`series`] builds per-week chart series for a player or a team

pub mod aggregate;
pub mod filter;
pub mod ranking;
pub mod scope;
pub mod series;
pub mod stats;

pub use aggregate::{aggregate, AggregateQuery, AggregateResult, GroupBy};
pub use filter::{selection, Divisions, Filter, TeamScope, ALL};
pub use ranking::{
    leaderboard, sort_results, LeaderboardView, ParseSortKeyError, SortKey, SortOrder, DEFAULT_LIMIT,
};
pub use scope::{
    active_metrics, first_team, latest_season, player_names, positions_in_scope, search_players,
    seasons, PLAYER_SUGGESTION_LIMIT,
};
pub use series::{
    normalize_team_code, player_weekly_series, require_team_columns, team_chart_metrics, team_matchup_series,
    MatchupPoint, WeeklyPoint, TEAM_ALIASES, TEAM_OFFENSE_METRICS,
};
pub use stats::{most_common, trimmed, SummaryStats};

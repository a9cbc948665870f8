//! # Aggregation
//!
//! Group filtered rows and roll each group up into an [`AggregateResult`].
//! Groups come out in the order their key first appears in the dataset.

use serde::Serialize;
use stat_schema::{CanonicalField, CellKey, Dataset, FieldMap, Row};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::filter::Filter;
use crate::stats::{most_common, SummaryStats};

/// How rows are grouped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroupBy {
    /// The canonical player id column
    #[default]
    Player,
    /// Team code alone
    Team,
    /// One group per team game: `team|season|week`
    TeamSeasonWeek,
    /// Any named column
    Column(String),
}

impl GroupBy {
    fn key(&self, row: &Row<'_>, fields: &FieldMap) -> String {
        let label = |field: Option<&str>| row.value(field).label().unwrap_or_default();
        match self {
            GroupBy::Player => label(Some(fields.player_id())),
            GroupBy::Team => label(fields.get(CanonicalField::Team)),
            GroupBy::TeamSeasonWeek => format!(
                "{}|{}|{}",
                label(fields.get(CanonicalField::Team)),
                label(fields.get(CanonicalField::Season)),
                label(fields.get(CanonicalField::Week)),
            ),
            GroupBy::Column(column) => label(Some(column.as_str())),
        }
    }
}

/// Everything one aggregation call needs besides the data itself
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateQuery {
    pub group_by: GroupBy,
    pub filter: Filter,
    /// Metric column to roll up
    pub metric: String,
}

impl AggregateQuery {
    /// Per-player rollup of `metric` with no filtering
    pub fn new(metric: impl Into<String>) -> Self {
        Self { group_by: GroupBy::Player, filter: Filter::all(), metric: metric.into() }
    }

    pub fn group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = group_by;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }
}

/// One group's rollup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    /// Group key (player id for player rollups)
    pub key: String,
    /// Display name of the group's first row
    pub display: String,
    /// Most common team within the group
    pub team: Option<String>,
    pub headshot_url: Option<String>,
    #[serde(flatten)]
    pub stats: SummaryStats,
}

/// Aggregate `query.metric` over the rows that pass `query.filter`.
///
/// Never fails: a metric column that does not exist rolls up as zeros, and
/// a filter that excludes every row yields an empty result.
pub fn aggregate(dataset: &Dataset, fields: &FieldMap, query: &AggregateQuery) -> Vec<AggregateResult> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Row<'_>>> = HashMap::new();

    for row in dataset.rows().filter(|row| query.filter.matches(row, fields)) {
        let key = query.group_by.key(&row, fields);
        match groups.get_mut(&key) {
            Some(rows) => rows.push(row),
            None => {
                order.push(key.clone());
                groups.insert(key, vec![row]);
            }
        }
    }

    let results: Vec<AggregateResult> = order
        .into_iter()
        .filter_map(|key| {
            let rows = groups.remove(&key)?;
            Some(summarize(key, &rows, fields, &query.metric))
        })
        .collect();

    debug!(
        "Aggregated {} over {} rows into {} groups ({:?})",
        query.metric,
        dataset.len(),
        results.len(),
        query.group_by
    );
    results
}

fn summarize(key: String, rows: &[Row<'_>], fields: &FieldMap, metric: &str) -> AggregateResult {
    let values: Vec<f64> = rows.iter().map(|row| row.value(Some(metric)).coerce_f64()).collect();

    let games = match fields.get(CanonicalField::Week) {
        Some(week) => rows.iter().map(|row| row.value(Some(week)).key()).collect::<HashSet<CellKey>>().len(),
        None => rows.len(),
    };

    let team_column = fields.get(CanonicalField::Team);
    let team = most_common(rows.iter().filter_map(|row| row.value(team_column).label()));

    let (display, headshot_url) = match rows.first() {
        Some(first) => (fields.display_name(first), fields.headshot_url(first)),
        None => (stat_schema::MISSING_NAME.to_string(), None),
    };

    AggregateResult {
        key,
        display,
        team,
        headshot_url,
        stats: SummaryStats::compute(values, games),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stat_schema::{LoadOptions, Schema};

    const WEEKLY: &str = "\
player_id,player_display_name,team,season,week,position,passing_yards,headshot_url
P1,Josh Allen,BUF,2023,1,QB,300,https://img/p1.png
P1,Josh Allen,BUF,2023,2,QB,100,https://img/p1.png
P2,Tua Tagovailoa,MIA,2023,1,QB,250,
P2,Tua Tagovailoa,MIA,2023,2,QB,n/a,
P3,Patrick Mahomes,KC,2022,1,QB,280,not-a-url
";

    fn load() -> (Dataset, Schema) {
        let ds = Dataset::from_csv_str(WEEKLY, &LoadOptions::default()).unwrap();
        let schema = Schema::discover(&ds);
        (ds, schema)
    }

    #[test]
    fn test_player_rollup() {
        let (ds, schema) = load();
        let query = AggregateQuery::new("passing_yards").filter(Filter::all().with_season(2023));
        let results = aggregate(&ds, &schema.fields, &query);

        assert_eq!(results.len(), 2);
        let allen = &results[0];
        assert_eq!(allen.key, "P1");
        assert_eq!(allen.display, "Josh Allen");
        assert_eq!(allen.team.as_deref(), Some("BUF"));
        assert_eq!(allen.headshot_url.as_deref(), Some("https://img/p1.png"));
        assert_eq!(allen.stats.total, 400.0);
        assert_eq!(allen.stats.games, 2);
        assert_eq!(allen.stats.mean, 200.0);
        assert_eq!(allen.stats.trimmed_mean, 200.0);
        assert_eq!(allen.stats.std_dev, 100.0);
        assert_eq!(allen.stats.cv, 50.0);

        // Unparseable cell counts as 0 but the week still counts as played
        let tua = &results[1];
        assert_eq!(tua.stats.total, 250.0);
        assert_eq!(tua.stats.games, 2);
        assert_eq!(tua.headshot_url, None);
    }

    #[test]
    fn test_games_without_week_column_is_row_count() {
        let (ds, schema) = load();
        let fields = schema.fields.clone();
        let mut no_week = FieldMap::new();
        for (field, column) in fields.iter().filter(|(f, _)| *f != CanonicalField::Week) {
            no_week = no_week.with(field, column);
        }
        let results = aggregate(&ds, &no_week, &AggregateQuery::new("passing_yards"));
        assert_eq!(results.iter().map(|r| r.stats.games).collect::<Vec<_>>(), vec![2, 2, 1]);
    }

    #[test]
    fn test_duplicate_week_rows_count_once() {
        let csv = "player_id,week,receptions\nP1,1,3\nP1,1,4\nP1,2,5\n";
        let ds = Dataset::from_csv_str(csv, &LoadOptions::default()).unwrap();
        let fields = FieldMap::new().with(CanonicalField::PlayerId, "player_id").with(CanonicalField::Week, "week");
        let results = aggregate(&ds, &fields, &AggregateQuery::new("receptions"));
        assert_eq!(results[0].stats.total, 12.0);
        assert_eq!(results[0].stats.games, 2);
        assert_eq!(results[0].stats.mean, 6.0);
    }

    #[test]
    fn test_group_by_team_and_game() {
        let (ds, schema) = load();
        let by_team = aggregate(&ds, &schema.fields, &AggregateQuery::new("passing_yards").group_by(GroupBy::Team));
        assert_eq!(by_team.iter().map(|r| r.key.as_str()).collect::<Vec<_>>(), vec!["BUF", "MIA", "KC"]);

        let by_game =
            aggregate(&ds, &schema.fields, &AggregateQuery::new("passing_yards").group_by(GroupBy::TeamSeasonWeek));
        assert_eq!(by_game.len(), 5);
        assert_eq!(by_game[0].key, "BUF|2023|1");
        assert_eq!(by_game[0].stats.total, 300.0);

        let by_position =
            aggregate(&ds, &schema.fields, &AggregateQuery::new("passing_yards").group_by(GroupBy::Column("position".into())));
        assert_eq!(by_position.len(), 1);
        assert_eq!(by_position[0].stats.total, 930.0);
    }

    #[test]
    fn test_absent_position_yields_empty_result() {
        let (ds, schema) = load();
        let query = AggregateQuery::new("passing_yards").filter(Filter::all().with_season(2023).with_position("K"));
        assert!(aggregate(&ds, &schema.fields, &query).is_empty());
    }

    #[test]
    fn test_unknown_metric_rolls_up_as_zero() {
        let (ds, schema) = load();
        let results = aggregate(&ds, &schema.fields, &AggregateQuery::new("sacks"));
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.stats.total == 0.0 && r.stats.cv == 0.0));
    }

    #[test]
    fn test_repeatable() {
        let (ds, schema) = load();
        let query = AggregateQuery::new("passing_yards");
        assert_eq!(aggregate(&ds, &schema.fields, &query), aggregate(&ds, &schema.fields, &query));
    }

    #[test]
    fn test_blank_team_cells_do_not_count() {
        let text = "\
player_id,team,season,week,targets
P1,,2023,1,4
P1,,2023,2,6
P1,MIA,2023,3,9
P2,,2023,1,3
";
        let ds = Dataset::from_csv_str(text, &LoadOptions::default()).unwrap();
        let schema = Schema::discover(&ds);
        let results = aggregate(&ds, &schema.fields, &AggregateQuery::new("targets"));

        assert_eq!(results[0].key, "P1");
        assert_eq!(results[0].team.as_deref(), Some("MIA"));
        assert_eq!(results[1].key, "P2");
        assert_eq!(results[1].team, None);
    }
}

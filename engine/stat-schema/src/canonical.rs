//! # Column Canonicalization
//!
//! Datasets from different exporters name the same thing differently
//! (`player_id` vs `gsis_id`, `team` vs `team_abbr`). A declarative table of
//! (canonical field → ordered patterns) is resolved against the header by a
//! single routine, producing a [`FieldMap`].

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::dataset::Row;
use crate::error::{Result, SchemaError};

/// Column used for grouping when no player-id-like column exists
pub const DEFAULT_PLAYER_ID_COLUMN: &str = "player_id";

/// Placeholder shown when a row has no usable name
pub const MISSING_NAME: &str = "—";

/// Semantic role a column can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    PlayerId,
    PlayerDisplayName,
    PlayerName,
    Team,
    Season,
    Week,
    Position,
    HeadshotUrl,
    Opponent,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 9] = [
        CanonicalField::PlayerId,
        CanonicalField::PlayerDisplayName,
        CanonicalField::PlayerName,
        CanonicalField::Team,
        CanonicalField::Season,
        CanonicalField::Week,
        CanonicalField::Position,
        CanonicalField::HeadshotUrl,
        CanonicalField::Opponent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::PlayerId => "player_id",
            CanonicalField::PlayerDisplayName => "player_display_name",
            CanonicalField::PlayerName => "player_name",
            CanonicalField::Team => "team",
            CanonicalField::Season => "season",
            CanonicalField::Week => "week",
            CanonicalField::Position => "position",
            CanonicalField::HeadshotUrl => "headshot_url",
            CanonicalField::Opponent => "opponent",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the matching table
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: CanonicalField,
    /// Case-insensitive patterns, highest priority first
    pub patterns: &'static [&'static str],
    /// Column name assumed when nothing matches
    pub fallback: Option<&'static str>,
}

/// The standard matching table for nflverse-style weekly exports
pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: CanonicalField::PlayerId,
        patterns: &["^player_id$", "gsis_id", "nfl_id", "playerid"],
        fallback: Some(DEFAULT_PLAYER_ID_COLUMN),
    },
    FieldRule {
        field: CanonicalField::PlayerDisplayName,
        patterns: &["^player_display_name$", "full_name", "display_name", "^name$"],
        fallback: None,
    },
    FieldRule {
        field: CanonicalField::PlayerName,
        patterns: &["^player_name$", "abbr_name", "short_name", "player"],
        fallback: None,
    },
    FieldRule {
        field: CanonicalField::Team,
        patterns: &["^team$", "team_abbr", "team_code"],
        fallback: None,
    },
    FieldRule { field: CanonicalField::Season, patterns: &["^season$"], fallback: None },
    FieldRule { field: CanonicalField::Week, patterns: &["^week$"], fallback: None },
    FieldRule {
        field: CanonicalField::Position,
        patterns: &["^position$", "^pos$"],
        fallback: None,
    },
    FieldRule {
        field: CanonicalField::HeadshotUrl,
        patterns: &["headshot_url", "headshot", "photo_url"],
        fallback: None,
    },
    FieldRule {
        field: CanonicalField::Opponent,
        patterns: &["^opponent_team$", "^opponent$", "^opp_team$", "^opp$"],
        fallback: None,
    },
];

/// Canonical field → actual column name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap {
    columns: BTreeMap<CanonicalField, String>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for hand-made maps
    pub fn with(mut self, field: CanonicalField, column: impl Into<String>) -> Self {
        self.columns.insert(field, column.into());
        self
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    /// Grouping column for players; always resolves
    pub fn player_id(&self) -> &str {
        self.get(CanonicalField::PlayerId).unwrap_or(DEFAULT_PLAYER_ID_COLUMN)
    }

    /// True when `column` is claimed by any canonical field
    pub fn claims(&self, column: &str) -> bool {
        self.columns.values().any(|c| c == column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> + '_ {
        self.columns.iter().map(|(f, c)| (*f, c.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Fields from `required` that did not resolve
    pub fn missing(&self, required: &[CanonicalField]) -> Vec<CanonicalField> {
        required.iter().copied().filter(|f| !self.columns.contains_key(f)).collect()
    }

    pub fn require(&self, required: &[CanonicalField]) -> Result<()> {
        let missing = self.missing(required);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::MissingColumns { required: required.to_vec(), missing })
        }
    }

    /// Name to show for a row: display name, then short name, then id
    pub fn display_name(&self, row: &Row<'_>) -> String {
        [CanonicalField::PlayerDisplayName, CanonicalField::PlayerName]
            .into_iter()
            .filter_map(|f| self.get(f))
            .chain(std::iter::once(self.player_id()))
            .find_map(|column| row.get(column).and_then(|v| v.label()))
            .unwrap_or_else(|| MISSING_NAME.to_string())
    }

    /// Headshot link for a row, only when it is an http(s) URL
    pub fn headshot_url(&self, row: &Row<'_>) -> Option<String> {
        row.value(self.get(CanonicalField::HeadshotUrl))
            .label()
            .filter(|url| url.starts_with("http"))
    }
}

struct CompiledRule {
    field: CanonicalField,
    patterns: Vec<Regex>,
    fallback: Option<&'static str>,
}

/// A compiled matching table
pub struct ColumnResolver {
    rules: Vec<CompiledRule>,
}

impl ColumnResolver {
    /// Compile a matching table; any bad pattern is an error
    pub fn new(rules: &[FieldRule]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            let mut patterns = Vec::with_capacity(rule.patterns.len());
            for pattern in rule.patterns {
                patterns.push(compile(pattern).map_err(|source| SchemaError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })?);
            }
            compiled.push(CompiledRule { field: rule.field, patterns, fallback: rule.fallback });
        }
        Ok(Self { rules: compiled })
    }

    /// Shared resolver for [`FIELD_RULES`]
    pub fn standard() -> &'static ColumnResolver {
        static STANDARD: OnceLock<ColumnResolver> = OnceLock::new();
        STANDARD.get_or_init(|| Self::compile_lenient(FIELD_RULES))
    }

    fn compile_lenient(rules: &[FieldRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| CompiledRule {
                field: rule.field,
                patterns: rule
                    .patterns
                    .iter()
                    .filter_map(|p| match compile(p) {
                        Ok(re) => Some(re),
                        Err(e) => {
                            warn!("Skipping invalid column pattern {:?}: {}", p, e);
                            None
                        }
                    })
                    .collect(),
                fallback: rule.fallback,
            })
            .collect();
        Self { rules }
    }

    /// Resolve every rule against the header.
    ///
    /// Fields are resolved in table order; within a field, patterns are tried
    /// by priority and the first unclaimed column (header order) wins. Pattern
    /// priority beats header order: with `[short_name, player_name]` the
    /// short name field gets `player_name`, not the earlier column.
    pub fn resolve(&self, columns: &[String]) -> FieldMap {
        let mut map = FieldMap::new();
        let mut claimed: HashSet<&str> = HashSet::new();

        for rule in &self.rules {
            let hit = rule.patterns.iter().find_map(|re| {
                columns.iter().find(|c| !claimed.contains(c.as_str()) && re.is_match(c))
            });
            match (hit, rule.fallback) {
                (Some(column), _) => {
                    claimed.insert(column.as_str());
                    map.columns.insert(rule.field, column.clone());
                }
                (None, Some(fallback)) => {
                    debug!("No column for {}; falling back to {:?}", rule.field, fallback);
                    map.columns.insert(rule.field, fallback.to_string());
                }
                (None, None) => {}
            }
        }

        map
    }
}

fn compile(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::value::CellValue;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_standard_table_compiles() {
        assert!(ColumnResolver::new(FIELD_RULES).is_ok());
        assert_eq!(ColumnResolver::standard().rules.len(), FIELD_RULES.len());
        for (rule, compiled) in FIELD_RULES.iter().zip(&ColumnResolver::standard().rules) {
            assert_eq!(rule.patterns.len(), compiled.patterns.len());
        }
    }

    #[test]
    fn test_nflverse_header() {
        let header = cols(&[
            "player_id",
            "player_name",
            "player_display_name",
            "position",
            "position_group",
            "headshot_url",
            "recent_team",
            "season",
            "week",
            "opponent_team",
            "passing_yards",
        ]);
        let map = ColumnResolver::standard().resolve(&header);

        assert_eq!(map.get(CanonicalField::PlayerId), Some("player_id"));
        assert_eq!(map.get(CanonicalField::PlayerName), Some("player_name"));
        assert_eq!(map.get(CanonicalField::PlayerDisplayName), Some("player_display_name"));
        assert_eq!(map.get(CanonicalField::Position), Some("position"));
        assert_eq!(map.get(CanonicalField::HeadshotUrl), Some("headshot_url"));
        assert_eq!(map.get(CanonicalField::Season), Some("season"));
        assert_eq!(map.get(CanonicalField::Week), Some("week"));
        assert_eq!(map.get(CanonicalField::Opponent), Some("opponent_team"));
        // "recent_team" does not match ^team$, team_abbr or team_code
        assert_eq!(map.get(CanonicalField::Team), None);
    }

    #[test]
    fn test_alternate_names_case_insensitive() {
        let header = cols(&["GSIS_ID", "Full_Name", "Team_Abbr", "Season", "Week", "POS"]);
        let map = ColumnResolver::standard().resolve(&header);

        assert_eq!(map.get(CanonicalField::PlayerId), Some("GSIS_ID"));
        assert_eq!(map.get(CanonicalField::PlayerDisplayName), Some("Full_Name"));
        assert_eq!(map.get(CanonicalField::Team), Some("Team_Abbr"));
        assert_eq!(map.get(CanonicalField::Position), Some("POS"));
    }

    #[test]
    fn test_player_id_fallback() {
        let map = ColumnResolver::standard().resolve(&cols(&["team", "season", "week"]));
        assert_eq!(map.get(CanonicalField::PlayerId), Some(DEFAULT_PLAYER_ID_COLUMN));
        assert_eq!(FieldMap::new().player_id(), DEFAULT_PLAYER_ID_COLUMN);
    }

    #[test]
    fn test_column_claimed_once() {
        // "player" would match player_id's column too; it must not be reused
        let map = ColumnResolver::standard().resolve(&cols(&["player_id", "player"]));
        assert_eq!(map.get(CanonicalField::PlayerId), Some("player_id"));
        assert_eq!(map.get(CanonicalField::PlayerName), Some("player"));

        let map = ColumnResolver::standard().resolve(&cols(&["player_id"]));
        assert_eq!(map.get(CanonicalField::PlayerName), None);
    }

    #[test]
    fn test_pattern_priority_beats_header_order() {
        let map = ColumnResolver::standard().resolve(&cols(&["short_name", "player_name"]));
        assert_eq!(map.get(CanonicalField::PlayerName), Some("player_name"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        const BAD: &[FieldRule] =
            &[FieldRule { field: CanonicalField::Team, patterns: &["(unclosed"], fallback: None }];
        assert!(matches!(ColumnResolver::new(BAD), Err(SchemaError::InvalidPattern { .. })));
    }

    #[test]
    fn test_require() {
        let map = FieldMap::new().with(CanonicalField::Team, "team");
        assert!(map.require(&[CanonicalField::Team]).is_ok());
        let err = map.require(&[CanonicalField::Team, CanonicalField::Season, CanonicalField::Week]);
        match err {
            Err(err @ SchemaError::MissingColumns { .. }) => {
                assert_eq!(err.to_string(), "Missing required columns (team/season/week).");
                if let SchemaError::MissingColumns { missing, .. } = err {
                    assert_eq!(missing, vec![CanonicalField::Season, CanonicalField::Week]);
                }
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_display_name_fallbacks() {
        let ds = Dataset::new(
            cols(&["player_id", "player_name", "player_display_name", "headshot_url"]),
            vec![
                vec!["P1".into(), "J.Allen".into(), "Josh Allen".into(), "https://img/1.png".into()],
                vec!["P2".into(), "T.Kelce".into(), CellValue::Null, "img/2.png".into()],
                vec!["P3".into(), CellValue::Null, CellValue::Null, CellValue::Null],
                vec![CellValue::Null, CellValue::Null, CellValue::Null, CellValue::Null],
            ],
        );
        let map = ColumnResolver::standard().resolve(ds.columns());
        let names: Vec<String> = ds.rows().map(|r| map.display_name(&r)).collect();
        assert_eq!(names, vec!["Josh Allen", "T.Kelce", "P3", MISSING_NAME]);

        let shots: Vec<Option<String>> = ds.rows().map(|r| map.headshot_url(&r)).collect();
        assert_eq!(shots[0].as_deref(), Some("https://img/1.png"));
        assert_eq!(shots[1], None);
        assert_eq!(shots[2], None);
    }
}

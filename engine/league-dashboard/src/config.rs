//! Dashboard configuration management

use serde::{Deserialize, Serialize};
use stat_aggregator::{SortKey, SortOrder, DEFAULT_LIMIT};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DashboardError, Result};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "STATS_";

/// Main dashboard configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Input file locations
    pub data: DataConfig,

    /// Initial selections for the league view
    pub defaults: ViewDefaults,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Input file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Weekly player stats CSV
    pub players_csv: PathBuf,

    /// Weekly team stats CSV (headers are normalized on load)
    pub teams_csv: PathBuf,

    /// Team → [conference, division] JSON lookup
    pub divisions_json: PathBuf,
}

/// Initial selections for the league view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewDefaults {
    /// Metric shown first; falls back to the first detected metric
    pub metric: Option<String>,

    pub sort: SortKey,

    pub order: SortOrder,

    /// Leaderboard length
    pub limit: usize,

    /// Position selector (`ALL` for every position)
    pub position: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            players_csv: PathBuf::from("data/playerdata.csv"),
            teams_csv: PathBuf::from("data/teamdata.csv"),
            divisions_json: PathBuf::from("divisions.json"),
        }
    }
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            metric: None,
            sort: SortKey::Total,
            order: SortOrder::Descending,
            limit: DEFAULT_LIMIT,
            position: stat_aggregator::ALL.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl DashboardConfig {
    /// Defaults, then the optional TOML file, then `STATS_*` environment
    /// overrides; the result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                debug!("Loading configuration from file: {:?}", path);
                Self::load_from_file(path)?
            }
            None => Self::default(),
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DashboardError::io(path, e))?;
        toml::from_str(&content)
            .map_err(|source| DashboardError::ConfigParse { path: path.display().to_string(), source })
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| DashboardError::io(path, e))
    }

    /// Override with `STATS_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    /// Override fields from a key lookup (keys without the `STATS_` prefix)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("PLAYERS_CSV") {
            self.data.players_csv = PathBuf::from(path);
        }
        if let Some(path) = lookup("TEAMS_CSV") {
            self.data.teams_csv = PathBuf::from(path);
        }
        if let Some(path) = lookup("DIVISIONS_JSON") {
            self.data.divisions_json = PathBuf::from(path);
        }

        if let Some(metric) = lookup("METRIC") {
            self.defaults.metric = Some(metric);
        }
        if let Some(sort) = lookup("SORT") {
            self.defaults.sort = sort.parse().map_err(|e| DashboardError::invalid_config(format!("{e}")))?;
        }
        if let Some(limit) = lookup("TOP_N") {
            self.defaults.limit = limit
                .trim()
                .parse()
                .map_err(|_| DashboardError::invalid_config(format!("STATS_TOP_N is not a number: {limit}")))?;
        }
        if let Some(position) = lookup("POSITION") {
            self.defaults.position = position;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(DashboardError::invalid_config(format!("Invalid log level: {other}"))),
        }

        match self.logging.format.as_str() {
            "json" | "pretty" | "compact" => {}
            other => return Err(DashboardError::invalid_config(format!("Invalid log format: {other}"))),
        }

        if self.defaults.limit == 0 {
            return Err(DashboardError::invalid_config("Leaderboard limit must be at least 1"));
        }

        for (name, path) in [
            ("players_csv", &self.data.players_csv),
            ("teams_csv", &self.data.teams_csv),
            ("divisions_json", &self.data.divisions_json),
        ] {
            if path.as_os_str().is_empty() {
                return Err(DashboardError::invalid_config(format!("Empty path for {name}")));
            }
        }

        Ok(())
    }
}

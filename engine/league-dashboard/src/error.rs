//! Error types for the dashboard service

use std::path::Path;
use thiserror::Error;

use stat_schema::SchemaError;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors surfaced while loading or querying the dashboard
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Dataset loading or canonicalization failed
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A data or config file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The divisions lookup is not a `{team: [conference, division]}` object
    #[error("Invalid divisions file {path}: {source}")]
    Divisions {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Configuration values failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A query named a column that is not a detected metric
    #[error("Unknown metric '{0}'")]
    UnknownMetric(String),
}

impl DashboardError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.display().to_string(), source }
    }

    pub fn divisions(path: &Path, source: serde_json::Error) -> Self {
        Self::Divisions { path: path.display().to_string(), source }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

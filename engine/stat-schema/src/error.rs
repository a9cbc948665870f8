//! Error types for schema discovery and dataset loading

use thiserror::Error;

use crate::canonical::CanonicalField;

/// Result type alias for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors that can occur while loading or canonicalizing a dataset
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The dataset file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The CSV text could not be parsed
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// The file parsed but contained no data rows
    #[error("No rows found in {0}")]
    NoRows(String),

    /// A stylesheet was served where the dataset was expected
    #[error("Loaded CSS instead of CSV — check path/filename.")]
    StylesheetInsteadOfCsv,

    /// No column qualified as a numeric metric
    #[error("No numeric stat columns detected in CSV.")]
    NoMetrics,

    /// Canonical columns a consumer requires were not found
    #[error("Missing required columns ({}).", field_list(required))]
    MissingColumns {
        required: Vec<CanonicalField>,
        missing: Vec<CanonicalField>,
    },

    /// A column-matching pattern failed to compile
    #[error("Invalid column pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl SchemaError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn csv(path: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv { path: path.into(), source }
    }
}

fn field_list(fields: &[CanonicalField]) -> String {
    fields.iter().map(|f| f.as_str()).collect::<Vec<_>>().join("/")
}

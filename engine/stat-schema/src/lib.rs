//! # StatSchema
//!
//! Schema discovery for weekly NFL stat exports.
//!
//! Column names and order vary between exporters, so nothing here assumes a
//! fixed layout. A [`Dataset`] is loaded from CSV with every cell auto-typed;
//! [`Schema::discover`] then maps columns onto canonical roles (player id,
//! team, season, week, ...) and picks out the numeric metric columns.
//!
//! ## Usage
//!
//! ```rust
//! use stat_schema::{CanonicalField, Dataset, LoadOptions, Schema};
//!
//! let csv = "player_id,team,season,week,passing_yards\n\
//!            P1,BUF,2023,1,300\nP1,BUF,2023,2,100\nP2,MIA,2023,1,250\n\
//!            P2,MIA,2023,2,280\nP3,KC,2023,1,220\n";
//! let dataset = Dataset::from_csv_str(csv, &LoadOptions::default()).unwrap();
//! let schema = Schema::discover(&dataset);
//!
//! assert_eq!(schema.fields.get(CanonicalField::Team), Some("team"));
//! assert_eq!(schema.metrics, vec!["passing_yards".to_string()]);
//! ```

pub mod canonical;
pub mod dataset;
pub mod error;
pub mod labels;
pub mod metrics;
pub mod schema;
pub mod value;

pub use canonical::{
    CanonicalField, ColumnResolver, FieldMap, FieldRule, DEFAULT_PLAYER_ID_COLUMN, FIELD_RULES,
    MISSING_NAME,
};
pub use dataset::{Dataset, DatasetInfo, LoadOptions, Row};
pub use error::{Result, SchemaError};
pub use labels::{labelize, normalize_header};
pub use metrics::{detect_metrics, order_metrics, MIN_FINITE_VALUES, PREFERRED_METRICS};
pub use schema::Schema;
pub use value::{CellKey, CellValue};

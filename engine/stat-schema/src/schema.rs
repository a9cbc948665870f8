//! Field map + metric list for one dataset

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::canonical::{CanonicalField, ColumnResolver, FieldMap};
use crate::dataset::Dataset;
use crate::error::{Result, SchemaError};
use crate::metrics::detect_metrics;

/// What the canonicalizer learned about a dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Canonical field → column
    pub fields: FieldMap,
    /// Metric columns in display order
    pub metrics: Vec<String>,
}

impl Schema {
    /// Canonicalize with the standard matching table.
    ///
    /// A dataset without rows yields an empty schema; callers should report
    /// "no data" rather than treat it as a failure here.
    pub fn discover(dataset: &Dataset) -> Self {
        Self::discover_with(dataset, ColumnResolver::standard())
    }

    pub fn discover_with(dataset: &Dataset, resolver: &ColumnResolver) -> Self {
        if dataset.is_empty() {
            debug!("Dataset {} has no rows; schema is empty", dataset.source());
            return Self::default();
        }

        let fields = resolver.resolve(dataset.columns());
        let metrics = detect_metrics(dataset, &fields);

        info!(
            "Canonicalized {}: {} fields, {} metrics",
            dataset.source(),
            fields.len(),
            metrics.len()
        );
        debug!("Field map: {:?}", fields);
        debug!("Metrics: {:?}", metrics);

        Self { fields, metrics }
    }

    pub fn has_metrics(&self) -> bool {
        !self.metrics.is_empty()
    }

    pub fn has_metric(&self, metric: &str) -> bool {
        self.metrics.iter().any(|m| m == metric)
    }

    /// A dataset with no metric columns is unusable
    pub fn require_metrics(&self) -> Result<()> {
        if self.has_metrics() {
            Ok(())
        } else {
            Err(SchemaError::NoMetrics)
        }
    }

    pub fn require_fields(&self, required: &[CanonicalField]) -> Result<()> {
        self.fields.require(required)
    }
}

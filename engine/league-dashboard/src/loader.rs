//! Async loading of the league and team datasets

use stat_aggregator::{require_team_columns, team_chart_metrics, Divisions};
use stat_schema::{Dataset, LoadOptions, Schema, SchemaError};
use std::path::Path;
use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::session::{Dashboard, TeamDashboard};

/// Read the team → [conference, division] lookup
pub async fn load_divisions(path: &Path) -> Result<Divisions> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| DashboardError::io(path, e))?;
    let divisions = Divisions::from_json_str(&text).map_err(|e| DashboardError::divisions(path, e))?;
    info!("Loaded {} teams from {}", divisions.len(), path.display());
    Ok(divisions)
}

/// Load divisions and the weekly player CSV, then canonicalize.
///
/// Fails when either file is unusable or no metric column is detected.
pub async fn load_league(config: &DashboardConfig) -> Result<Dashboard> {
    let divisions = load_divisions(&config.data.divisions_json).await?;

    let dataset = Dataset::load_csv(&config.data.players_csv, &LoadOptions::default()).await?;
    let schema = Schema::discover(&dataset);
    schema.require_metrics()?;

    info!("League data ready: {} rows, metrics {:?}", dataset.len(), schema.metrics);
    Ok(Dashboard::new(dataset, schema, divisions))
}

/// Load the weekly team CSV with normalized headers.
///
/// Team, season and week columns are required, as is at least one metric to
/// chart. The divisions lookup is optional here; a missing or broken file
/// only logs a warning.
pub async fn load_team_data(config: &DashboardConfig) -> Result<TeamDashboard> {
    let options = LoadOptions { normalize_headers: true };
    let dataset = Dataset::load_csv(&config.data.teams_csv, &options).await?;
    let schema = Schema::discover(&dataset);
    require_team_columns(&schema.fields)?;
    if team_chart_metrics(dataset.columns(), &schema.metrics).is_empty() {
        return Err(SchemaError::NoMetrics.into());
    }

    let divisions = match load_divisions(&config.data.divisions_json).await {
        Ok(divisions) => Some(divisions),
        Err(e) => {
            warn!("Continuing without divisions: {}", e);
            None
        }
    };

    info!("Team data ready: {} rows, {} metrics", dataset.len(), schema.metrics.len());
    Ok(TeamDashboard::new(dataset, schema, divisions))
}

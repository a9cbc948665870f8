//! # LeagueDashboard
//!
//! Service layer for the weekly stats dashboard: configuration, logging,
//! async dataset loading and the query surface used by front ends.
//!
//! Loading happens once and must finish before any query runs. The loaded
//! [`Dashboard`] / [`TeamDashboard`] never change afterwards; every query is a
//! pure function of the snapshot and the caller's selections.

pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod session;

pub use config::{DashboardConfig, DataConfig, LoggingConfig, ViewDefaults};
pub use error::{DashboardError, Result};
pub use loader::{load_divisions, load_league, load_team_data};
pub use logging::initialize_logging_with_config;
pub use session::{Dashboard, PlayerProfile, Selection, Status, TeamDashboard};

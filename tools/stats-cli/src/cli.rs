//! # Command Line Interface
//!
//! Subcommands map one-to-one onto dashboard views. Status lines and logs
//! go to stderr; tables and `--json` output go to stdout.

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use league_dashboard::{
    load_league, load_team_data, Dashboard, DashboardConfig, Selection, Status, TeamDashboard,
};
use stat_aggregator::{LeaderboardView, SortKey, SortOrder};
use stat_schema::{labelize, DatasetInfo, Schema};

use crate::render;

/// Weekly NFL stats dashboard
#[derive(Parser)]
#[command(name = "stats-cli")]
#[command(about = "Leaderboards, player and team views over weekly NFL stat CSVs")]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Weekly player stats CSV (overrides config)
    #[arg(long)]
    pub players: Option<PathBuf>,

    /// Weekly team stats CSV (overrides config)
    #[arg(long)]
    pub teams: Option<PathBuf>,

    /// Divisions JSON (overrides config)
    #[arg(long)]
    pub divisions: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Log level (overrides config)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the detected field map and metric columns
    Schema {
        /// Inspect the team dataset instead of the player dataset
        #[arg(long)]
        teams: bool,
    },
    /// List seasons, conferences and divisions
    Seasons,
    /// Positions available within a season and team scope
    Positions {
        #[arg(short, long)]
        season: Option<i32>,
        #[arg(long, default_value = "ALL")]
        conference: String,
        #[arg(long, default_value = "ALL")]
        division: String,
    },
    /// Player leaderboard for one metric
    Leaders(LeadersArgs),
    /// Player name suggestions
    Search {
        query: String,
    },
    /// Weekly series for one player
    Player {
        /// Player id
        id: String,
        #[arg(short, long)]
        metric: Option<String>,
        #[arg(short, long)]
        season: Option<i32>,
    },
    /// Team offense against the opponent, week by week
    Team {
        /// Team code; defaults to the first team in the data
        code: Option<String>,
        #[arg(short, long)]
        metric: Option<String>,
        #[arg(short, long)]
        season: Option<i32>,
    },
}

#[derive(Args)]
pub struct LeadersArgs {
    /// Metric column; defaults to the configured or first detected metric
    #[arg(short, long)]
    pub metric: Option<String>,

    /// Season; defaults to the latest in the data
    #[arg(short, long)]
    pub season: Option<i32>,

    #[arg(long, default_value = "ALL")]
    pub conference: String,

    #[arg(long, default_value = "ALL")]
    pub division: String,

    /// Position; defaults to the configured position
    #[arg(short, long)]
    pub position: Option<String>,

    /// Exact display name (case-insensitive)
    #[arg(long)]
    pub player: Option<String>,

    /// total, games, mean, trimmed_mean, std_dev, cv, team, name
    #[arg(long)]
    pub sort: Option<SortKey>,

    #[arg(long, conflicts_with = "desc")]
    pub asc: bool,

    #[arg(long)]
    pub desc: bool,

    /// Rows to show
    #[arg(short, long, conflicts_with = "all")]
    pub limit: Option<usize>,

    /// Show every row
    #[arg(long)]
    pub all: bool,

    /// Include trimmed mean, standard deviation and CV columns
    #[arg(long)]
    pub advanced: bool,
}

impl Cli {
    /// Config file and `STATS_*` environment, then command-line overrides
    pub fn resolve_config(&self) -> Result<DashboardConfig> {
        let mut config = DashboardConfig::load(self.config.as_deref())?;

        if let Some(path) = &self.players {
            config.data.players_csv = path.clone();
        }
        if let Some(path) = &self.teams {
            config.data.teams_csv = path.clone();
        }
        if let Some(path) = &self.divisions {
            config.data.divisions_json = path.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Serialize)]
struct SchemaOutput<'a> {
    dataset: DatasetInfo,
    #[serde(flatten)]
    schema: &'a Schema,
}

#[derive(Serialize)]
struct SeasonsOutput<'a> {
    seasons: &'a [i32],
    default_season: Option<i32>,
    conferences: Vec<String>,
    divisions: Vec<String>,
}

#[derive(Serialize)]
struct LeadersOutput<'a, T: Serialize> {
    metric: &'a str,
    season: Option<i32>,
    view: LeaderboardView,
    results: T,
}

/// CLI handler
pub struct CliHandler {
    config: DashboardConfig,
    json: bool,
}

impl CliHandler {
    pub fn new(config: DashboardConfig, json: bool) -> Self {
        Self { config, json }
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Schema { teams } => self.show_schema(teams).await,
            Commands::Seasons => self.show_seasons().await,
            Commands::Positions { season, conference, division } => {
                let selected = Selection { season, conference, division, ..Selection::default() };
                self.show_positions(&selected).await
            }
            Commands::Leaders(args) => self.show_leaders(args).await,
            Commands::Search { query } => self.show_search(&query).await,
            Commands::Player { id, metric, season } => self.show_player(&id, metric.as_deref(), season).await,
            Commands::Team { code, metric, season } => {
                self.show_team(code.as_deref(), metric.as_deref(), season).await
            }
        }
    }

    async fn league(&self) -> Result<Dashboard> {
        let dashboard = load_league(&self.config).await?;
        self.report(&dashboard.status());
        Ok(dashboard)
    }

    async fn team_data(&self) -> Result<TeamDashboard> {
        let teams = load_team_data(&self.config).await?;
        self.report(&teams.status());
        Ok(teams)
    }

    fn report(&self, status: &Status) {
        let line = status.to_string();
        if status.is_ready() {
            eprintln!("{}", format!("✅ {line}").green());
        } else {
            eprintln!("{}", format!("❌ {line}").red());
        }
    }

    fn emit_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn title(&self, text: &str) {
        println!("{}", text.cyan().bold());
        println!("{}", "=".repeat(text.chars().count()));
    }

    async fn show_schema(&self, teams: bool) -> Result<()> {
        let (dataset, schema) = if teams {
            let data = self.team_data().await?;
            (data.dataset().info(), data.schema().clone())
        } else {
            let data = self.league().await?;
            (data.dataset().info(), data.schema().clone())
        };

        if self.json {
            return self.emit_json(&SchemaOutput { dataset, schema: &schema });
        }
        self.title(if teams { "📋 Team Dataset Schema" } else { "📋 Player Dataset Schema" });
        println!(
            "Source: {} ({} rows, loaded {})",
            dataset.source,
            dataset.rows,
            dataset.loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        print!("{}", render::schema_listing(&schema.fields, &schema.metrics));
        Ok(())
    }

    async fn show_seasons(&self) -> Result<()> {
        let dashboard = self.league().await?;
        let output = SeasonsOutput {
            seasons: dashboard.seasons(),
            default_season: dashboard.latest_season(),
            conferences: dashboard.divisions().conferences(),
            divisions: dashboard.divisions().divisions(None),
        };

        if self.json {
            return self.emit_json(&output);
        }
        self.title("📅 Seasons");
        let seasons: Vec<String> = output.seasons.iter().map(|s| s.to_string()).collect();
        println!("{:<13} {}", "Seasons:".bold(), seasons.join(", "));
        if let Some(season) = output.default_season {
            println!("{:<13} {}", "Default:".bold(), season);
        }
        println!("{:<13} {}", "Conferences:".bold(), output.conferences.join(", "));
        println!("{:<13} {}", "Divisions:".bold(), output.divisions.join(", "));
        Ok(())
    }

    async fn show_positions(&self, selected: &Selection) -> Result<()> {
        let dashboard = self.league().await?;
        let positions = dashboard.positions(selected);

        if self.json {
            return self.emit_json(&positions);
        }
        self.title("🏈 Positions");
        if positions.is_empty() {
            println!("{}", "No positions in this scope".yellow());
        }
        for position in positions {
            println!("  {position}");
        }
        Ok(())
    }

    async fn show_leaders(&self, args: LeadersArgs) -> Result<()> {
        let dashboard = self.league().await?;
        let defaults = &self.config.defaults;

        let metric = args
            .metric
            .as_deref()
            .or(defaults.metric.as_deref())
            .map(str::to_string)
            .or_else(|| dashboard.default_metric(None).map(str::to_string))
            .ok_or_else(|| anyhow!("No metric available"))?;

        let selected = Selection {
            season: args.season,
            conference: args.conference,
            division: args.division,
            position: args.position.unwrap_or_else(|| defaults.position.clone()),
            player: args.player,
        };
        let filter = dashboard.filter(&selected);

        let sort = args.sort.unwrap_or(defaults.sort);
        let order = if args.asc {
            SortOrder::Ascending
        } else if args.desc {
            SortOrder::Descending
        } else if args.sort.is_some() {
            sort.default_order()
        } else {
            defaults.order
        };
        let limit = if args.all { None } else { Some(args.limit.unwrap_or(defaults.limit)) };
        let view = LeaderboardView { sort, order, limit };
        debug!("Leaderboard filter {:?}, view {:?}", filter, view);

        let results = dashboard.leaderboard(&metric, &filter, &view)?;

        if self.json {
            return self.emit_json(&LeadersOutput { metric: &metric, season: filter.season, view, results });
        }

        let season = filter.season.map(|s| s.to_string()).unwrap_or_else(|| "all seasons".to_string());
        self.title(&format!("🏆 {} Leaders ({season})", labelize(&metric)));
        print!("{}", render::leaderboard_table(&metric, &results, args.advanced));
        Ok(())
    }

    async fn show_search(&self, query: &str) -> Result<()> {
        let dashboard = self.league().await?;
        let names = dashboard.search_players(query);

        if self.json {
            return self.emit_json(&names);
        }
        for name in names {
            println!("{name}");
        }
        Ok(())
    }

    async fn show_player(&self, player_id: &str, metric: Option<&str>, season: Option<i32>) -> Result<()> {
        let dashboard = self.league().await?;
        let profile = dashboard
            .player_profile(player_id, season)
            .ok_or_else(|| anyhow!("No rows for player {player_id}"))?;

        let metric = metric
            .map(str::to_string)
            .or_else(|| profile.metrics.first().cloned())
            .or_else(|| dashboard.default_metric(None).map(str::to_string))
            .ok_or_else(|| anyhow!("No metric available"))?;
        let series = dashboard.player_series(player_id, season, &metric)?;

        if self.json {
            return self.emit_json(&serde_json::json!({
                "profile": profile,
                "metric": metric,
                "series": series,
            }));
        }

        self.title(&format!("👤 {}", profile.display));
        println!(
            "{} {}   {} {}   {} {}",
            "Team:".bold(),
            profile.team.as_deref().unwrap_or("-"),
            "Pos:".bold(),
            profile.position.as_deref().unwrap_or("-"),
            "Season:".bold(),
            profile.season.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
        );
        if let Some(url) = &profile.headshot_url {
            println!("{} {}", "Headshot:".bold(), url);
        }
        let tabs: Vec<String> = profile.metrics.iter().map(|m| labelize(m)).collect();
        println!("{} {}", "Metrics:".bold(), tabs.join(" | "));
        println!();
        print!("{}", render::weekly_table(&metric, &series));
        Ok(())
    }

    async fn show_team(&self, code: Option<&str>, metric: Option<&str>, season: Option<i32>) -> Result<()> {
        let teams = self.team_data().await?;

        let team = code
            .map(|c| c.trim().to_uppercase())
            .or_else(|| teams.default_team())
            .ok_or_else(|| anyhow!("Team dataset has no team codes"))?;
        let season = season
            .or_else(|| teams.latest_season())
            .ok_or_else(|| anyhow!("Team dataset has no seasons"))?;
        let metric = metric
            .map(str::to_string)
            .or_else(|| teams.chart_metrics().into_iter().next())
            .ok_or_else(|| anyhow!("Team dataset has no metrics"))?;

        let points = teams.series(&team, season, &metric)?;

        if self.json {
            return self.emit_json(&serde_json::json!({
                "team": team,
                "season": season,
                "metric": metric,
                "division": teams.division_of(&team),
                "series": points,
            }));
        }

        let mut heading = format!("🏟  {team} {season}: {}", labelize(&metric));
        if let Some((conference, division)) = teams.division_of(&team) {
            heading.push_str(&format!(" ({conference} {division})"));
        }
        self.title(&heading);
        print!("{}", render::matchup_table(&team, &points));
        Ok(())
    }
}

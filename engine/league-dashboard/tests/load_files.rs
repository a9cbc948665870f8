//! End-to-end loading from files on disk

use league_dashboard::{load_league, load_team_data, DashboardConfig, DashboardError, Selection, Status};
use stat_aggregator::LeaderboardView;
use stat_schema::SchemaError;
use std::path::Path;
use tempfile::TempDir;

const PLAYERS: &str = "\
,player_id,player_display_name,team,season,week,position,receptions,receiving_yards
0,P1,Stefon Diggs,BUF,2023,1,WR,8,102
1,P1,Stefon Diggs,BUF,2023,2,WR,6,92
2,P2,Tyreek Hill,MIA,2023,1,WR,11,215
3,P2,Tyreek Hill,MIA,2023,2,WR,5,40
4,P3,Travis Kelce,KC,2023,1,TE,7,69
";

const TEAMS: &str = "\
Team,Season,Week,Opponent Team,Passing Yards
BUF,2023,1,NYJ,236
NYJ,2023,1,BUF,198
BUF,2023,2,LV,274
LV,2023,2,BUF,185
MIA,2023,1,LAC,466
";

const DIVISIONS: &str = r#"{"BUF": ["AFC", "East"], "MIA": ["AFC", "East"], "KC": ["AFC", "West"]}"#;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn config(dir: &TempDir, players: &str, teams: &str, divisions: Option<&str>) -> DashboardConfig {
    let mut config = DashboardConfig::default();
    config.data.players_csv = write(dir.path(), "players.csv", players);
    config.data.teams_csv = write(dir.path(), "teams.csv", teams);
    config.data.divisions_json = match divisions {
        Some(json) => write(dir.path(), "divisions.json", json),
        None => dir.path().join("missing.json"),
    };
    config
}

#[tokio::test]
async fn test_load_league() {
    let dir = tempfile::tempdir().unwrap();
    let dash = load_league(&config(&dir, PLAYERS, TEAMS, Some(DIVISIONS))).await.unwrap();

    assert_eq!(dash.status().to_string(), "Data OK — rows: 5");
    assert_eq!(dash.metrics(), &["receiving_yards".to_string(), "receptions".to_string()]);

    let selected = Selection { conference: "AFC".into(), division: "East".into(), ..Selection::default() };
    let board = dash
        .leaderboard("receiving_yards", &dash.filter(&selected), &LeaderboardView::default())
        .unwrap();
    let names: Vec<_> = board.iter().map(|r| r.display.as_str()).collect();
    assert_eq!(names, vec!["Tyreek Hill", "Stefon Diggs"]);
    assert_eq!(board[0].team.as_deref(), Some("MIA"));
}

#[tokio::test]
async fn test_missing_divisions_is_fatal_for_league() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_league(&config(&dir, PLAYERS, TEAMS, None)).await.unwrap_err();
    assert!(matches!(err, DashboardError::Io { .. }));
    assert!(Status::failed(&err).to_string().starts_with("Init error: Failed to read"));
}

#[tokio::test]
async fn test_broken_divisions_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_league(&config(&dir, PLAYERS, TEAMS, Some("[1, 2"))).await.unwrap_err();
    assert!(matches!(err, DashboardError::Divisions { .. }));
}

#[tokio::test]
async fn test_no_metrics_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let players = "player_id,season,week,note\nP1,2023,1,a\nP2,2023,1,b\n";
    let err = load_league(&config(&dir, players, TEAMS, Some(DIVISIONS))).await.unwrap_err();
    assert!(matches!(err, DashboardError::Schema(SchemaError::NoMetrics)));
    assert_eq!(Status::failed(&err).to_string(), "Init error: No numeric stat columns detected in CSV.");
}

#[tokio::test]
async fn test_stylesheet_served_instead_of_csv() {
    let dir = tempfile::tempdir().unwrap();
    let css = ":root {\n  --bg: #111;\n}\n";
    let err = load_league(&config(&dir, css, TEAMS, Some(DIVISIONS))).await.unwrap_err();
    assert!(matches!(err, DashboardError::Schema(SchemaError::StylesheetInsteadOfCsv)));
}

#[tokio::test]
async fn test_load_team_data_without_divisions() {
    let dir = tempfile::tempdir().unwrap();
    let teams = load_team_data(&config(&dir, PLAYERS, TEAMS, None)).await.unwrap();

    assert_eq!(teams.teams(), vec!["BUF", "LV", "MIA", "NYJ"]);
    assert_eq!(teams.division_of("BUF"), None);

    let points = teams.series("BUF", 2023, "passing_yards").unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[1].opponent, "LV");
    assert_eq!(points[1].defense, 185.0);
}

#[tokio::test]
async fn test_team_data_requires_game_columns() {
    let dir = tempfile::tempdir().unwrap();
    let teams = "Team,Opponent,Passing Yards\nBUF,NYJ,236\n";
    let err = load_team_data(&config(&dir, PLAYERS, teams, Some(DIVISIONS))).await.unwrap_err();
    assert_eq!(err.to_string(), "Missing required columns (team/season/week).");
}

#[tokio::test]
async fn test_team_data_without_metrics_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let teams = "Team,Season,Week,Opponent Team,Total Yards\nBUF,2023,1,NYJ,350\nNYJ,2023,1,BUF,290\nBUF,2023,2,LV,410\n";
    let err = load_team_data(&config(&dir, PLAYERS, teams, Some(DIVISIONS))).await.unwrap_err();
    assert!(matches!(err, DashboardError::Schema(SchemaError::NoMetrics)));
    assert_eq!(Status::failed(&err).to_string(), "Init error: No numeric stat columns detected in CSV.");
}

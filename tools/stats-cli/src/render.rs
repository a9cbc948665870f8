//! Plain-text tables for terminal output

use stat_aggregator::{AggregateResult, MatchupPoint, WeeklyPoint};
use stat_schema::{labelize, FieldMap};

/// Shown when a leaderboard comes back empty
pub const NO_RESULTS: &str = "No results — adjust filters.";

const NAME_WIDTH: usize = 24;

fn fixed1(value: f64) -> String {
    format!("{value:.1}")
}

/// Whole totals print without decimals, fractional ones with one
fn amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        fixed1(value)
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// Leaderboard rows; `advanced` adds trimmed mean, SD and CV columns
pub fn leaderboard_table(metric: &str, rows: &[AggregateResult], advanced: bool) -> String {
    if rows.is_empty() {
        return format!("{NO_RESULTS}\n");
    }

    let mut out = String::new();
    let mut header = format!("{:>3}  {:<NAME_WIDTH$}  {:<4}  {:>3}  {:>8}", "#", "Player", "Team", "GP", "Avg");
    if advanced {
        header.push_str(&format!("  {:>8}  {:>8}  {:>6}", "Bal Avg", "SD", "CV%"));
    }
    header.push_str(&format!("  {:>10}", truncate(&labelize(metric), 10)));
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"-".repeat(header.chars().count()));
    out.push('\n');

    for (rank, row) in rows.iter().enumerate() {
        let mut line = format!(
            "{:>3}  {:<NAME_WIDTH$}  {:<4}  {:>3}  {:>8}",
            rank + 1,
            truncate(&row.display, NAME_WIDTH),
            row.team.as_deref().unwrap_or("-"),
            row.stats.games,
            fixed1(row.stats.mean),
        );
        if advanced {
            line.push_str(&format!(
                "  {:>8}  {:>8}  {:>6}",
                fixed1(row.stats.trimmed_mean),
                fixed1(row.stats.std_dev),
                fixed1(row.stats.cv)
            ));
        }
        line.push_str(&format!("  {:>10}", amount(row.stats.total)));
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn weekly_table(metric: &str, points: &[WeeklyPoint]) -> String {
    let mut out = format!("{:>4}  {:>10}\n", "Week", truncate(&labelize(metric), 10));
    for point in points {
        out.push_str(&format!("{:>4}  {:>10}\n", point.week, amount(point.value)));
    }
    out
}

pub fn matchup_table(team: &str, points: &[MatchupPoint]) -> String {
    let mut out = format!("{:>4}  {:<4}  {:>10}  {:>10}\n", "Week", "Opp", team, "Opponent");
    for point in points {
        let opponent = if point.opponent.is_empty() { "-" } else { point.opponent.as_str() };
        out.push_str(&format!(
            "{:>4}  {:<4}  {:>10}  {:>10}\n",
            point.week,
            opponent,
            amount(point.offense),
            amount(point.defense)
        ));
    }
    out
}

/// Canonical field → column lines, then the metric list
pub fn schema_listing(fields: &FieldMap, metrics: &[String]) -> String {
    let mut out = String::from("Fields:\n");
    for (field, column) in fields.iter() {
        out.push_str(&format!("  {:<20} {}\n", field.as_str(), column));
    }
    out.push_str("Metrics:\n");
    for metric in metrics {
        out.push_str(&format!("  {:<20} {}\n", metric, labelize(metric)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use stat_aggregator::SummaryStats;
    use stat_schema::CanonicalField;

    fn result(display: &str, team: Option<&str>, values: Vec<f64>) -> AggregateResult {
        let games = values.len();
        AggregateResult {
            key: display.to_lowercase(),
            display: display.to_string(),
            team: team.map(str::to_string),
            headshot_url: None,
            stats: SummaryStats::compute(values, games),
        }
    }

    #[test]
    fn test_empty_leaderboard() {
        assert_eq!(leaderboard_table("passing_yards", &[], false), "No results — adjust filters.\n");
    }

    #[test]
    fn test_leaderboard_rows() {
        let rows = vec![result("Josh Allen", Some("BUF"), vec![300.0, 100.0])];
        let table = leaderboard_table("passing_yards", &rows, true);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Bal Avg"));
        assert!(lines[0].ends_with("Passing Y…"));
        assert!(lines[2].starts_with("  1  Josh Allen"));
        assert!(lines[2].contains("BUF"));
        assert!(lines[2].contains("200.0"));
        assert!(lines[2].contains("50.0"));
        assert!(lines[2].ends_with("400"));

        let basic = leaderboard_table("targets", &rows, false);
        assert!(!basic.contains("Bal Avg"));
        assert!(basic.lines().next().unwrap().ends_with("Targets"));
    }

    #[test]
    fn test_missing_team_prints_dash() {
        let rows = vec![result("Unknown", None, vec![1.5])];
        let table = leaderboard_table("targets", &rows, false);
        assert!(table.lines().nth(2).unwrap().contains(" -  "));
        assert!(table.ends_with("1.5\n"));
    }

    #[test]
    fn test_series_tables() {
        let weekly = weekly_table("receptions", &[WeeklyPoint { week: 1, value: 7.0 }]);
        assert_eq!(weekly.lines().nth(1), Some("   1           7"));

        let matchups = matchup_table(
            "BUF",
            &[MatchupPoint { week: 2, offense: 274.0, defense: 0.0, opponent: String::new() }],
        );
        assert!(matchups.lines().nth(1).unwrap().starts_with("   2  -   "));
    }

    #[test]
    fn test_schema_listing() {
        let fields = FieldMap::new().with(CanonicalField::Team, "recent_team");
        let listing = schema_listing(&fields, &["passing_yards".to_string()]);
        assert!(listing.contains("team                 recent_team"));
        assert!(listing.contains("passing_yards        Passing Yards"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Receiving Yards", 10), "Receiving…");
    }
}

//! Text rendering of normalized records for the terminal dashboard

use cricket_rust_core::models::{BattingRow, BowlingRow, LiveScore, MatchSummary};

const SEPARATOR: &str = "------------------------------------------------------------";

/// Header block for one live match
pub fn render_match_header(m: &MatchSummary) -> Vec<String> {
    let mut lines = vec![
        SEPARATOR.to_string(),
        format!("{}  [LIVE]  {}", m.teams, m.format),
        format!("{} - {}", m.series, m.match_desc),
        format!("Venue: {}, {}", m.venue, m.city),
        format!("Status: {}", m.status),
    ];
    if let Some(start) = m.start_time_utc() {
        lines.push(format!("Started: {}", start.format("%Y-%m-%d %H:%M UTC")));
    }
    lines
}

pub fn render_live_score(score: &LiveScore) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: {}    {}: {}",
        score.team1, score.team1_score, score.team2, score.team2_score
    )];
    if !score.current_over.is_empty() {
        lines.push(score.current_over.clone());
    }
    if !score.toss.is_empty() {
        lines.push(format!("Toss: {}", score.toss));
    }
    if !score.result.is_empty() {
        lines.push(format!("Result: {}", score.result));
    }
    lines.push(format!("Last updated: {}", score.last_updated));
    lines
}

/// Batting tables, one per team in first-appearance order
pub fn render_batting(rows: &[BattingRow]) -> Vec<String> {
    if rows.is_empty() {
        return vec!["No batting statistics available".to_string()];
    }

    let mut lines = Vec::new();
    for (team, team_rows) in group_by_team(rows, |r| r.team.as_str()) {
        lines.push(format!("{} - Batting", team));
        lines.push(format!(
            "  {:<24} {:>5} {:>5} {:>4} {:>4} {:>7}  {}",
            "Player", "R", "B", "4s", "6s", "SR", "Status"
        ));
        for r in team_rows {
            lines.push(format!(
                "  {:<24} {:>5} {:>5} {:>4} {:>4} {:>7.2}  {}",
                r.player, r.runs, r.balls, r.fours, r.sixes, r.strike_rate, r.status
            ));
        }
    }
    lines
}

/// Bowling tables, one per team in first-appearance order
pub fn render_bowling(rows: &[BowlingRow]) -> Vec<String> {
    if rows.is_empty() {
        return vec!["No bowling statistics available".to_string()];
    }

    let mut lines = Vec::new();
    for (team, team_rows) in group_by_team(rows, |r| r.team.as_str()) {
        lines.push(format!("{} - Bowling", team));
        lines.push(format!(
            "  {:<24} {:>5} {:>3} {:>4} {:>3} {:>6} {:>3} {:>3}",
            "Bowler", "O", "M", "R", "W", "Econ", "WD", "NB"
        ));
        for r in team_rows {
            lines.push(format!(
                "  {:<24} {:>5.1} {:>3} {:>4} {:>3} {:>6.2} {:>3} {:>3}",
                r.player, r.overs, r.maidens, r.runs, r.wickets, r.economy, r.wides, r.noballs
            ));
        }
    }
    lines
}

/// Group rows by team, keeping teams in the order they first appear and rows
/// in their original order.
pub fn group_by_team<'a, T, F>(rows: &'a [T], team: F) -> Vec<(&'a str, Vec<&'a T>)>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut groups: Vec<(&'a str, Vec<&'a T>)> = Vec::new();
    for row in rows {
        let name = team(row);
        match groups.iter_mut().find(|(t, _)| *t == name) {
            Some((_, members)) => members.push(row),
            None => groups.push((name, vec![row])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batter(team: &str, player: &str, runs: i64) -> BattingRow {
        BattingRow {
            match_id: Some(1),
            innings: 1,
            team: team.to_string(),
            player: player.to_string(),
            runs,
            balls: 10,
            fours: 1,
            sixes: 0,
            strike_rate: 125.0,
            status: "not out".to_string(),
        }
    }

    #[test]
    fn test_group_by_team_first_appearance() {
        let rows = vec![
            batter("NZ", "Young", 21),
            batter("SA", "Bavuma", 56),
            batter("NZ", "Conway", 2),
        ];
        let groups = group_by_team(&rows, |r| r.team.as_str());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "NZ");
        let names: Vec<&str> = groups[0].1.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(names, vec!["Young", "Conway"]);
        assert_eq!(groups[1].0, "SA");
    }

    #[test]
    fn test_render_batting() {
        let lines = render_batting(&[batter("IND", "Gill", 46)]);
        assert_eq!(lines[0], "IND - Batting");
        assert!(lines[2].contains("Gill"));
        assert!(lines[2].contains("125.00"));
        assert!(lines[2].ends_with("not out"));
    }

    #[test]
    fn test_render_bowling_keeps_over_fraction() {
        let bowler = |player: &str, overs: f64| BowlingRow {
            match_id: Some(1),
            innings: 1,
            team: "AUS".to_string(),
            player: player.to_string(),
            overs,
            maidens: 0,
            runs: 44,
            wickets: 2,
            economy: 4.4,
            wides: 1,
            noballs: 0,
        };
        let lines = render_bowling(&[bowler("Starc", 10.0), bowler("Zampa", 7.3)]);
        assert!(lines[2].contains(" 10.0 "));
        assert!(lines[3].contains("  7.3 "));
    }

    #[test]
    fn test_render_empty_tables() {
        assert_eq!(render_batting(&[]), vec!["No batting statistics available"]);
        assert_eq!(render_bowling(&[]), vec!["No bowling statistics available"]);
    }

    #[test]
    fn test_render_live_score_skips_blank_fields() {
        let score = LiveScore {
            match_id: Some(1),
            team1: "IND".to_string(),
            team2: "AUS".to_string(),
            team1_score: "120/3 (18.2 ov)".to_string(),
            team2_score: String::new(),
            current_over: String::new(),
            status: String::new(),
            state: String::new(),
            toss: String::new(),
            venue: " - ".to_string(),
            series: String::new(),
            match_format: String::new(),
            result: String::new(),
            last_updated: "2025-03-05 14:00:00".to_string(),
        };
        let lines = render_live_score(&score);
        assert_eq!(
            lines,
            vec![
                "IND: 120/3 (18.2 ov)    AUS: ".to_string(),
                "Last updated: 2025-03-05 14:00:00".to_string(),
            ]
        );
    }
}

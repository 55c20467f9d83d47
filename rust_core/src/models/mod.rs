// Flat records produced from Cricbuzz payloads
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Live match discovery
// ============================================================================

/// One live match discovered anywhere inside a live-matches payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// `None` when `matchId` is present but not an integer
    pub match_id: Option<i64>,
    pub team1: String,
    pub team2: String,
    /// Display string `"{team1} vs {team2}"`
    pub teams: String,
    pub format: String,
    pub venue: String,
    pub city: String,
    pub status: String,
    /// Raw `startDate` value (epoch milliseconds as text)
    pub start_time: Option<String>,
    pub series: String,
    pub match_desc: String,
    pub state: String,
}

impl MatchSummary {
    /// Parse `start_time` as epoch milliseconds
    pub fn start_time_utc(&self) -> Option<DateTime<Utc>> {
        let millis = self.start_time.as_deref()?.trim().parse::<i64>().ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }
}

// ============================================================================
// Live score
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveScore {
    pub match_id: Option<i64>,
    pub team1: String,
    pub team2: String,
    /// `"<runs>/<wickets> (<overs> ov)"`, empty until the innings exists
    pub team1_score: String,
    pub team2_score: String,
    /// `"Over <n>: <runs> runs"`, empty without an over summary
    pub current_over: String,
    pub status: String,
    pub state: String,
    pub toss: String,
    /// `"<ground> - <city>"`
    pub venue: String,
    pub series: String,
    pub match_format: String,
    pub result: String,
    /// Local wall-clock time of normalization, `YYYY-MM-DD HH:MM:SS`
    pub last_updated: String,
}

// ============================================================================
// Scorecard rows
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingRow {
    pub match_id: Option<i64>,
    pub innings: i64,
    pub team: String,
    pub player: String,
    pub runs: i64,
    pub balls: i64,
    pub fours: i64,
    pub sixes: i64,
    pub strike_rate: f64,
    /// Dismissal description, `"not out"` when absent
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlingRow {
    pub match_id: Option<i64>,
    pub innings: i64,
    pub team: String,
    pub player: String,
    pub overs: f64,
    pub maidens: i64,
    pub runs: i64,
    pub wickets: i64,
    pub economy: f64,
    pub wides: i64,
    pub noballs: i64,
}

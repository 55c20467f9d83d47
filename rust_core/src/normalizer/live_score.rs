//! Live score snapshot from a match-center payload.

use super::{display_or, int, is_truthy, text_or};
use crate::models::LiveScore;
use chrono::Local;
use serde_json::Value;

/// Timestamp layout of [`LiveScore::last_updated`]
pub const LAST_UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Shape a match-center payload into a [`LiveScore`].
///
/// Returns `None` only when `detail` is not an object. Any missing section
/// (`matchHeader`, `miniscore`, ...) yields empty fields.
pub fn shape_live_score(detail: &Value) -> Option<LiveScore> {
    if !detail.is_object() {
        return None;
    }

    let header = &detail["matchHeader"];
    let info = &header["matchInfo"];
    let venue_info = &info["venueInfo"];

    let mut score = LiveScore {
        match_id: int(&info["matchId"]),
        team1: text_or(&info["team1"]["teamSName"], ""),
        team2: text_or(&info["team2"]["teamSName"], ""),
        team1_score: String::new(),
        team2_score: String::new(),
        current_over: String::new(),
        status: text_or(&header["status"], ""),
        state: text_or(&header["state"], ""),
        toss: text_or(&info["tossResults"]["tossWinnerName"], ""),
        venue: format!(
            "{} - {}",
            text_or(&venue_info["ground"], ""),
            text_or(&venue_info["city"], "")
        ),
        series: text_or(&info["seriesName"], ""),
        match_format: text_or(&info["matchFormat"], ""),
        result: text_or(&header["result"]["resultText"], ""),
        last_updated: Local::now().format(LAST_UPDATED_FORMAT).to_string(),
    };

    let miniscore = &detail["miniscore"];
    if !is_truthy(miniscore) {
        return Some(score);
    }

    if let Some(innings) = miniscore["inningsScores"].as_array() {
        if let Some(first) = innings.first() {
            score.team1_score = format_innings(first);
        }
        if let Some(second) = innings.get(1) {
            score.team2_score = format_innings(second);
        }
    }

    let over = &miniscore["overSummary"];
    if over.as_object().is_some_and(|o| !o.is_empty()) {
        score.current_over = format!(
            "Over {}: {} runs",
            display_or(&over["overNum"], ""),
            display_or(&over["runs"], "0")
        );
    }

    Some(score)
}

/// `"<runs>/<wickets> (<overs> ov)"`
fn format_innings(innings: &Value) -> String {
    format!(
        "{}/{} ({} ov)",
        display_or(&innings["runs"], "0"),
        display_or(&innings["wickets"], "0"),
        display_or(&innings["overs"], "0")
    )
}

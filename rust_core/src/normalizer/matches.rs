//! Live match discovery.
//!
//! The live-matches payload groups matches under series and type buckets whose
//! depth varies between responses, so matches are found by walking the whole
//! tree rather than by following a fixed path.

use super::{int, is_truthy, text, text_or, walk};
use crate::models::MatchSummary;
use serde_json::{Map, Value};

/// Collect a [`MatchSummary`] for every object holding a `matchInfo` object
/// with a non-null `matchId`.
///
/// Results are in pre-order: a qualifying object precedes anything found
/// beneath it. Matches nested in more than one place are reported once per
/// occurrence.
pub fn extract_matches(tree: &Value) -> Vec<MatchSummary> {
    let mut matches = Vec::new();
    walk(tree, &mut |node| {
        if let Some(summary) = summarize(node) {
            matches.push(summary);
        }
    });
    matches
}

fn summarize(node: &Map<String, Value>) -> Option<MatchSummary> {
    let info = node.get("matchInfo").filter(|info| info.is_object())?;
    let match_id = info.get("matchId").filter(|id| !id.is_null())?;

    let team1 = text_or(&info["team1"]["teamSName"], "");
    let team2 = text_or(&info["team2"]["teamSName"], "");
    let teams = format!("{} vs {}", team1, team2);

    Some(MatchSummary {
        match_id: int(match_id),
        team1,
        team2,
        teams,
        format: first_truthy(&info["matchFormat"], &info["mFormat"]),
        venue: first_truthy(&info["venueInfo"]["ground"], &info["venue"]),
        city: text_or(&info["venueInfo"]["city"], ""),
        status: node.get("statusText").map(|v| text_or(v, "")).unwrap_or_default(),
        start_time: text(&info["startDate"]),
        series: text_or(&info["seriesName"], ""),
        match_desc: text_or(&info["matchDesc"], ""),
        state: text_or(&info["state"], ""),
    })
}

/// `preferred` when truthy, else `fallback`
fn first_truthy(preferred: &Value, fallback: &Value) -> String {
    if is_truthy(preferred) {
        text_or(preferred, "")
    } else {
        text_or(fallback, "")
    }
}

//! Batting and bowling rows from a scorecard payload.

use super::{float_or_zero, int, int_or_zero, text_or};
use crate::models::{BattingRow, BowlingRow};
use serde_json::Value;

/// Dismissal text for a batter with no `outDesc`
pub const NOT_OUT: &str = "not out";

/// Shape a scorecard payload into batting and bowling rows.
///
/// Rows follow innings order as given by `scoreCard`, then the insertion
/// order of each innings' player map. Player-id keys are not used.
pub fn shape_scorecard(card: &Value) -> (Vec<BattingRow>, Vec<BowlingRow>) {
    let mut batting = Vec::new();
    let mut bowling = Vec::new();

    if !card.is_object() {
        return (batting, bowling);
    }

    let match_id = int(&card["matchId"]);
    let innings_list = card["scoreCard"].as_array().map(Vec::as_slice).unwrap_or(&[]);

    for innings in innings_list.iter().filter(|i| i.is_object()) {
        let innings_number = int_or_zero(&innings["inningsId"]);
        let batting_team = text_or(&innings["batTeamName"], "");
        let bowling_team = text_or(&innings["bowlTeamName"], "");

        let batsmen = team_details(innings, "batTeamDetails", "battingTeamDetails", "batsmenData");
        for player in players(batsmen) {
            batting.push(BattingRow {
                match_id,
                innings: innings_number,
                team: batting_team.clone(),
                player: text_or(&player["name"], ""),
                runs: int_or_zero(&player["runs"]),
                balls: int_or_zero(&player["balls"]),
                fours: int_or_zero(&player["fours"]),
                sixes: int_or_zero(&player["sixes"]),
                strike_rate: float_or_zero(&player["strikeRate"]),
                status: player
                    .get("outDesc")
                    .filter(|v| !v.is_null())
                    .map(|v| text_or(v, NOT_OUT))
                    .unwrap_or_else(|| NOT_OUT.to_string()),
            });
        }

        let bowlers = team_details(innings, "bowlTeamDetails", "bowlingTeamDetails", "bowlersData");
        for player in players(bowlers) {
            bowling.push(BowlingRow {
                match_id,
                innings: innings_number,
                team: bowling_team.clone(),
                player: text_or(&player["name"], ""),
                overs: float_or_zero(&player["overs"]),
                maidens: int_or_zero(&player["maidens"]),
                runs: int_or_zero(&player["runs"]),
                wickets: int_or_zero(&player["wickets"]),
                economy: float_or_zero(&player["economy"]),
                wides: int_or_zero(&player["wides"]),
                noballs: int_or_zero(&player["noBalls"]),
            });
        }
    }

    (batting, bowling)
}

/// Player map of one side, read from `primary` or the long-form `fallback` key
fn team_details<'a>(innings: &'a Value, primary: &str, fallback: &str, data_key: &str) -> &'a Value {
    let details = &innings[primary];
    if details.is_object() {
        &details[data_key]
    } else {
        &innings[fallback][data_key]
    }
}

/// Player stat objects in map order
fn players(data: &Value) -> impl Iterator<Item = &Value> {
    data.as_object()
        .into_iter()
        .flat_map(|map| map.values())
        .filter(|player| player.is_object())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_player_map_order_is_insertion_order() {
        let card = json!({
            "matchId": 5,
            "scoreCard": [{
                "inningsId": 1,
                "batTeamName": "NZ",
                "batTeamDetails": {
                    "batsmenData": {
                        "bat_9": {"name": "Conway"},
                        "bat_1": {"name": "Ravindra"},
                        "bat_5": {"name": "Williamson"}
                    }
                }
            }]
        });

        let (batting, bowling) = shape_scorecard(&card);
        let names: Vec<&str> = batting.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(names, vec!["Conway", "Ravindra", "Williamson"]);
        assert!(bowling.is_empty());
    }

    #[test]
    fn test_long_form_details_key() {
        let card = json!({
            "scoreCard": [{
                "inningsId": 2,
                "bowlTeamName": "SA",
                "bowlingTeamDetails": {
                    "bowlersData": {"bowl_1": {"name": "Rabada", "wickets": 3, "noBalls": 1}}
                }
            }]
        });

        let (_, bowling) = shape_scorecard(&card);
        assert_eq!(bowling.len(), 1);
        assert_eq!(bowling[0].team, "SA");
        assert_eq!(bowling[0].wickets, 3);
        assert_eq!(bowling[0].noballs, 1);
        assert_eq!(bowling[0].economy, 0.0);
        assert_eq!(bowling[0].match_id, None);
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let card = json!({
            "scoreCard": [
                "not an innings",
                {"inningsId": 1, "batTeamDetails": {"batsmenData": {"a": 12, "b": {"name": "Latham"}}}}
            ]
        });

        let (batting, _) = shape_scorecard(&card);
        assert_eq!(batting.len(), 1);
        assert_eq!(batting[0].player, "Latham");
        assert_eq!(batting[0].status, NOT_OUT);
    }

    #[test]
    fn test_non_object_card() {
        let (batting, bowling) = shape_scorecard(&json!([1, 2, 3]));
        assert!(batting.is_empty());
        assert!(bowling.is_empty());
    }
}

//! Live match polling loop
//!
//! Each tick is independent: fetch the live list, normalize it, then fetch
//! and render every match's score and (optionally) scorecard. Nothing is
//! carried between ticks.

use crate::config::DashboardConfig;
use crate::render::{render_batting, render_bowling, render_live_score, render_match_header};
use anyhow::Result;
use cricket_rust_core::clients::MatchFeed;
use cricket_rust_core::models::MatchSummary;
use cricket_rust_core::normalizer::{extract_matches, shape_live_score, shape_scorecard};
use futures_util::future::join;
use std::future::Future;
use tracing::{debug, error, info, warn};

/// Outcome of one polling tick
#[derive(Debug, Default)]
pub struct TickReport {
    pub lines: Vec<String>,
    pub matches: usize,
    pub fetch_failures: usize,
}

pub struct Dashboard<F: MatchFeed> {
    feed: F,
    config: DashboardConfig,
}

impl<F: MatchFeed> Dashboard<F> {
    pub fn new(feed: F, config: DashboardConfig) -> Self {
        Self { feed, config }
    }

    /// Poll until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Poll until `shutdown` completes, during a tick or between ticks
    pub async fn run_until<S>(&self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        info!(
            "Polling live matches every {:?} (detailed={})",
            self.config.poll_interval, self.config.show_detailed
        );
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = self.run_once() => {}
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }

        info!("Shutting down dashboard");
        Ok(())
    }

    /// One tick, printed to stdout
    pub async fn run_once(&self) -> TickReport {
        let report = self.tick().await;
        for line in &report.lines {
            println!("{}", line);
        }
        report
    }

    pub async fn tick(&self) -> TickReport {
        let mut report = TickReport::default();

        let payload = match self.feed.live_matches().await {
            Ok(payload) => payload,
            Err(e) => {
                error!("Live matches fetch failed: {}", e);
                report.fetch_failures += 1;
                report.lines.push(format!("API Error: {}", e));
                return report;
            }
        };

        let mut matches = extract_matches(&payload);
        if matches.is_empty() {
            info!("No live matches found at the moment");
            debug!("Raw live payload: {}", payload);
            report.lines.push("No live matches found at the moment.".to_string());
            return report;
        }

        if self.config.max_matches > 0 {
            matches.truncate(self.config.max_matches);
        }
        report.matches = matches.len();
        report
            .lines
            .push(format!("Live Matches Overview ({} matches)", matches.len()));

        for m in &matches {
            self.render_match(m, &mut report).await;
        }

        report
    }

    async fn render_match(&self, m: &MatchSummary, report: &mut TickReport) {
        report.lines.extend(render_match_header(m));

        let Some(match_id) = m.match_id else {
            warn!("Skipping details for {} (no usable match id)", m.teams);
            return;
        };

        let scorecard = async {
            if self.config.show_detailed {
                Some(self.feed.match_scorecard(match_id).await)
            } else {
                None
            }
        };
        let (detail, scorecard) = join(self.feed.match_details(match_id), scorecard).await;

        match detail {
            Ok(detail) => {
                if let Some(score) = shape_live_score(&detail) {
                    report.lines.extend(render_live_score(&score));
                }
            }
            Err(e) => {
                warn!("Match {} details fetch failed: {}", match_id, e);
                report.fetch_failures += 1;
                report
                    .lines
                    .push(format!("Could not fetch scores for match {}", match_id));
            }
        }

        match scorecard {
            Some(Ok(card)) => {
                let (batting, bowling) = shape_scorecard(&card);
                if !batting.is_empty() || !bowling.is_empty() {
                    report.lines.extend(render_batting(&batting));
                    report.lines.extend(render_bowling(&bowling));
                }
            }
            Some(Err(e)) => {
                warn!("Match {} scorecard fetch failed: {}", match_id, e);
                report.fetch_failures += 1;
                report.lines.push(format!(
                    "Could not fetch detailed scorecard for match {}",
                    match_id
                ));
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cricket_rust_core::clients::FetchError;
    use serde_json::{json, Value};
    use std::time::{Duration, Instant};

    struct StubFeed {
        live: Value,
        fail_details: bool,
        delay: Duration,
    }

    impl StubFeed {
        fn new(live: Value) -> Self {
            Self { live, fail_details: false, delay: Duration::ZERO }
        }
    }

    #[async_trait]
    impl MatchFeed for StubFeed {
        async fn live_matches(&self) -> Result<Value, FetchError> {
            tokio::time::sleep(self.delay).await;
            if let Some(message) = cricket_rust_core::fetch_error(&self.live) {
                return Err(FetchError::Api(message));
            }
            Ok(self.live.clone())
        }

        async fn match_details(&self, match_id: i64) -> Result<Value, FetchError> {
            if self.fail_details {
                return Err(FetchError::Status {
                    url: format!("stub/{}", match_id),
                    status: 503,
                });
            }
            Ok(json!({
                "matchHeader": {
                    "matchInfo": {"matchId": match_id, "team1": {"teamSName": "IND"}, "team2": {"teamSName": "ENG"}},
                    "result": {"resultText": "IND won by 4 wkts"}
                },
                "miniscore": {"inningsScores": [{"runs": 248, "wickets": 10, "overs": 47.4}]}
            }))
        }

        async fn match_scorecard(&self, match_id: i64) -> Result<Value, FetchError> {
            Ok(json!({
                "matchId": match_id,
                "scoreCard": [{
                    "inningsId": 1,
                    "batTeamName": "ENG",
                    "bowlTeamName": "IND",
                    "batTeamDetails": {"batsmenData": {"bat_1": {"name": "Buttler", "runs": 52}}},
                    "bowlTeamDetails": {"bowlersData": {"bowl_1": {"name": "Jadeja", "wickets": 3}}}
                }]
            }))
        }
    }

    fn live_payload() -> Value {
        json!({"typeMatches": [{"seriesMatches": [{"seriesAdWrapper": {"matches": [
            {"matchInfo": {"matchId": 101, "team1": {"teamSName": "IND"}, "team2": {"teamSName": "ENG"}}},
            {"matchInfo": {"matchId": 102, "team1": {"teamSName": "SL"}, "team2": {"teamSName": "BAN"}}}
        ]}}]}]})
    }

    #[tokio::test]
    async fn test_tick_renders_every_match() {
        let dashboard = Dashboard::new(
            StubFeed::new(live_payload()),
            DashboardConfig::default(),
        );

        let report = dashboard.tick().await;
        assert_eq!(report.matches, 2);
        assert_eq!(report.fetch_failures, 0);
        assert!(report.lines.iter().any(|l| l == "IND vs ENG  [LIVE]  "));
        assert!(report.lines.iter().any(|l| l.starts_with("IND: 248/10 (47.4 ov)")));
        assert!(report.lines.iter().any(|l| l == "Result: IND won by 4 wkts"));
        assert!(report.lines.iter().any(|l| l == "ENG - Batting"));
        assert!(report.lines.iter().any(|l| l == "IND - Bowling"));
    }

    #[tokio::test]
    async fn test_tick_respects_max_matches_and_detail_flag() {
        let config = DashboardConfig {
            max_matches: 1,
            show_detailed: false,
            ..Default::default()
        };
        let dashboard = Dashboard::new(StubFeed::new(live_payload()), config);

        let report = dashboard.tick().await;
        assert_eq!(report.matches, 1);
        assert!(!report.lines.iter().any(|l| l.contains("Batting")));
    }

    #[tokio::test]
    async fn test_tick_reports_api_error() {
        let dashboard = Dashboard::new(
            StubFeed::new(json!({"error": "quota exceeded"})),
            DashboardConfig::default(),
        );

        let report = dashboard.tick().await;
        assert_eq!(report.fetch_failures, 1);
        assert_eq!(report.lines, vec!["API Error: Cricbuzz API error: quota exceeded"]);
    }

    #[tokio::test]
    async fn test_tick_with_no_matches() {
        let dashboard = Dashboard::new(
            StubFeed::new(json!({"typeMatches": []})),
            DashboardConfig::default(),
        );

        let report = dashboard.tick().await;
        assert_eq!(report.matches, 0);
        assert_eq!(report.lines, vec!["No live matches found at the moment."]);
    }

    #[tokio::test]
    async fn test_failed_details_only_affect_that_match() {
        let dashboard = Dashboard::new(
            StubFeed { fail_details: true, ..StubFeed::new(live_payload()) },
            DashboardConfig::default(),
        );

        let report = dashboard.tick().await;
        assert_eq!(report.matches, 2);
        assert_eq!(report.fetch_failures, 2);
        assert!(report.lines.iter().any(|l| l == "Could not fetch scores for match 101"));
        // Scorecards still render
        assert!(report.lines.iter().any(|l| l == "ENG - Batting"));
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_slow_tick() {
        let feed = StubFeed { delay: Duration::from_secs(30), ..StubFeed::new(live_payload()) };
        let dashboard = Dashboard::new(feed, DashboardConfig::default());

        let started = Instant::now();
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            dashboard.run_until(tokio::time::sleep(Duration::from_millis(50))),
        )
        .await;

        assert!(result.is_ok(), "shutdown was not observed during the tick");
        assert!(result.unwrap().is_ok());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_shutdown_between_ticks() {
        let dashboard = Dashboard::new(StubFeed::new(live_payload()), DashboardConfig::default());

        // The default poll interval is far longer than the timeout
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            dashboard.run_until(tokio::time::sleep(Duration::from_millis(200))),
        )
        .await;

        assert!(result.is_ok());
    }
}

//! Configuration constants and environment loading for the dashboard
//!
//! This module manages all runtime configuration:
//! - Polling interval and per-tick match limit
//! - Whether scorecards are fetched
//! - Table editor schema and row limit

use std::env;
use std::time::Duration;

/// Default polling interval in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Default number of rows loaded by the table editor
pub const DEFAULT_ROW_LIMIT: i64 = 100;

/// Default schema browsed by the table editor
pub const DEFAULT_SCHEMA: &str = "public";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub poll_interval: Duration,
    /// Fetch and render batting/bowling tables for each match
    pub show_detailed: bool,
    /// Matches rendered per tick, 0 for all
    pub max_matches: usize,
    pub schema: String,
    pub row_limit: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            show_detailed: true,
            max_matches: 0,
            schema: DEFAULT_SCHEMA.to_string(),
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        let poll_interval_secs = env::var("POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
            .clamp(5, 600);

        let show_detailed = env::var("SHOW_DETAILED")
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or(true);

        let max_matches = env::var("MAX_MATCHES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);

        let schema = env::var("DB_SCHEMA")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SCHEMA.to_string());

        let row_limit = env::var("ROW_LIMIT")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_ROW_LIMIT);

        Self {
            poll_interval: Duration::from_secs(poll_interval_secs),
            show_detailed,
            max_matches,
            schema,
            row_limit: clamp_row_limit(row_limit),
        }
    }
}

/// Row limits are kept within 1..=1000
pub fn clamp_row_limit(limit: i64) -> i64 {
    limit.clamp(1, 1000)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert!(config.show_detailed);
        assert_eq!(config.max_matches, 0);
        assert_eq!(config.schema, "public");
        assert_eq!(config.row_limit, 100);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_clamp_row_limit() {
        assert_eq!(clamp_row_limit(0), 1);
        assert_eq!(clamp_row_limit(250), 250);
        assert_eq!(clamp_row_limit(5000), 1000);
    }
}

use crate::normalizer::fetch_error;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_RAPIDAPI_HOST: &str = "cricbuzz-cricket.p.rapidapi.com";
pub const DEFAULT_BASE_URL: &str = "https://cricbuzz-cricket.p.rapidapi.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Why a Cricbuzz payload could not be obtained
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Cricbuzz client misconfigured: {0}")]
    Config(String),
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Cricbuzz returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("Invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Cricbuzz API error: {0}")]
    Api(String),
}

/// Credentials and endpoint settings for [`CricbuzzClient`]
#[derive(Debug, Clone)]
pub struct CricbuzzConfig {
    pub api_key: String,
    pub api_host: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for CricbuzzConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_host: DEFAULT_RAPIDAPI_HOST.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl CricbuzzConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("RAPIDAPI_KEY").unwrap_or_default(),
            api_host: env::var("RAPIDAPI_HOST")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_host),
            base_url: env::var("CRICBUZZ_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.base_url),
            timeout: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

/// Source of raw Cricbuzz payloads.
///
/// Implemented by [`CricbuzzClient`]; the dashboard only depends on this trait.
#[async_trait]
pub trait MatchFeed: Send + Sync {
    /// Payload listing the currently live matches
    async fn live_matches(&self) -> Result<Value, FetchError>;

    /// Match-center payload for one match
    async fn match_details(&self, match_id: i64) -> Result<Value, FetchError>;

    /// Full scorecard payload for one match
    async fn match_scorecard(&self, match_id: i64) -> Result<Value, FetchError>;
}

#[derive(Clone)]
pub struct CricbuzzClient {
    client: Client,
    config: CricbuzzConfig,
}

impl std::fmt::Debug for CricbuzzClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CricbuzzClient")
            .field("api_host", &self.config.api_host)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

impl CricbuzzClient {
    pub fn new(config: CricbuzzConfig) -> Result<Self, FetchError> {
        if config.api_key.trim().is_empty() {
            return Err(FetchError::Config("RAPIDAPI_KEY is not set".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CricbuzzConfig {
        &self.config
    }

    pub async fn fetch_live_matches(&self) -> Result<Value, FetchError> {
        self.get_json(&self.url("matches/v1/live")).await
    }

    pub async fn fetch_match_details(&self, match_id: i64) -> Result<Value, FetchError> {
        self.get_json(&self.url(&format!("mcenter/v1/{}", match_id)))
            .await
    }

    pub async fn fetch_match_scorecard(&self, match_id: i64) -> Result<Value, FetchError> {
        self.get_json(&self.url(&format!("mcenter/v1/{}/scard", match_id)))
            .await
    }

    fn url(&self, path: &str) -> String {
        endpoint_url(&self.config.base_url, path)
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!("GET {}", url);

        let resp = self
            .client
            .get(url)
            .header("x-rapidapi-key", &self.config.api_key)
            .header("x-rapidapi-host", &self.config.api_host)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let data: Value = resp.json().await.map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })?;

        check_payload(data)
    }
}

#[async_trait]
impl MatchFeed for CricbuzzClient {
    async fn live_matches(&self) -> Result<Value, FetchError> {
        self.fetch_live_matches().await
    }

    async fn match_details(&self, match_id: i64) -> Result<Value, FetchError> {
        self.fetch_match_details(match_id).await
    }

    async fn match_scorecard(&self, match_id: i64) -> Result<Value, FetchError> {
        self.fetch_match_scorecard(match_id).await
    }
}

/// Join base url and endpoint path with exactly one slash
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Reject bodies that carry an `error` sentinel
fn check_payload(data: Value) -> Result<Value, FetchError> {
    match fetch_error(&data) {
        Some(message) => Err(FetchError::Api(message)),
        None => Ok(data),
    }
}

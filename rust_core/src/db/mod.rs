//! Database connection pooling and configuration.
//!
//! This module provides:
//! - Pool creation with consistent timeout and connection settings
//! - Connection URL resolution from `DATABASE_URL` or discrete `DB_*` variables
//! - The generic table editor in [`tables`]

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::env;
use std::time::Duration;

pub mod tables;

/// Database pool configuration
#[derive(Debug, Clone)]
pub struct DbPoolConfig {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Timeout for acquiring a connection
    pub acquire_timeout: Duration,
    /// How long idle connections are kept alive
    pub idle_timeout: Duration,
}

impl Default for DbPoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(300), // 5 minutes
        }
    }
}

impl DbPoolConfig {
    /// Create config from environment variables with fallback to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_connections),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_connections),
            acquire_timeout: env::var("DB_ACQUIRE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
            idle_timeout: env::var("DB_IDLE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_timeout),
        }
    }
}

/// Discrete connection settings, used when `DATABASE_URL` is not set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConnectSettings {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

impl Default for DbConnectSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "cric_buzz".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
        }
    }
}

impl DbConnectSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("DB_HOST").unwrap_or(defaults.host),
            port: env::var("DB_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            dbname: env::var("DB_NAME").unwrap_or(defaults.dbname),
            user: env::var("DB_USER").unwrap_or(defaults.user),
            password: env::var("DB_PASSWORD").unwrap_or(defaults.password),
        }
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.dbname)
            .username(&self.user)
            .password(&self.password)
    }
}

/// Create a database connection pool with the given options and configuration.
pub async fn create_pool(options: PgConnectOptions, config: &DbPoolConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .connect_with(options)
        .await
        .context("Failed to create database connection pool")?;

    tracing::info!(
        "Database pool created: max={}, min={}, acquire_timeout={}s",
        config.max_connections,
        config.min_connections,
        config.acquire_timeout.as_secs()
    );

    Ok(pool)
}

/// Create a pool from the environment.
///
/// Uses `DATABASE_URL` when set, otherwise `DB_HOST`, `DB_PORT`, `DB_NAME`,
/// `DB_USER` and `DB_PASSWORD`.
pub async fn create_default_pool() -> Result<PgPool> {
    let options = match env::var("DATABASE_URL") {
        Ok(url) => url
            .parse::<PgConnectOptions>()
            .context("Failed to parse DATABASE_URL")?,
        Err(_) => DbConnectSettings::from_env().connect_options(),
    };

    create_pool(options, &DbPoolConfig::from_env()).await
}

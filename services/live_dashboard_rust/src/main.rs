//! Live Cricket Dashboard
//!
//! Terminal dashboard over the Cricbuzz API, plus a generic editor for the
//! tables of the configured Postgres schema.
//!
//! This service:
//! - Polls the live matches list and normalizes it into match summaries
//! - Fetches each match's live score and scorecard
//! - Renders scores and batting/bowling tables grouped by team
//! - Lists, shows and edits database tables on request

mod config;
mod dashboard;
mod editor;
mod render;

use anyhow::{Context, Result};
use config::DashboardConfig;
use cricket_rust_core::clients::{CricbuzzClient, CricbuzzConfig};
use cricket_rust_core::db::{create_default_pool, tables::TableEditor};
use dashboard::Dashboard;
use dotenv::dotenv;
use editor::{parse_command, Command};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = parse_command(&args)?;
    let config = DashboardConfig::from_env();

    match command {
        Command::Live | Command::Once => {
            let client = CricbuzzClient::new(CricbuzzConfig::from_env())
                .context("Failed to initialize Cricbuzz client")?;
            info!("Starting Live Cricket Dashboard ({:?})", client);

            let dashboard = Dashboard::new(client, config);
            if command == Command::Once {
                dashboard.run_once().await;
                Ok(())
            } else {
                dashboard.run().await
            }
        }
        command => {
            let pool = create_default_pool().await?;
            let table_editor = TableEditor::new(pool, config.schema.clone());
            editor::run(&table_editor, command, &config).await
        }
    }
}

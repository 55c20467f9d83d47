//! Cricket Core - Cricbuzz payload normalization and shared plumbing.
//!
//! This crate provides:
//! - Normalization of live-match, match-center and scorecard payloads into
//!   flat records (`normalizer`)
//! - The record types themselves (`models`)
//! - An HTTP client for the Cricbuzz RapidAPI endpoints (`clients`)
//! - Postgres pooling and a generic table editor (`db`)

pub mod clients;
pub mod db;
pub mod models;
pub mod normalizer;

pub use models::*;
pub use normalizer::{extract_matches, fetch_error, shape_live_score, shape_scorecard};

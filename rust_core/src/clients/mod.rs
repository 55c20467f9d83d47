pub mod cricbuzz;

// Re-export commonly used types
pub use cricbuzz::{CricbuzzClient, CricbuzzConfig, FetchError, MatchFeed};

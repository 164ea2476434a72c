pub mod config;
pub mod error;
pub mod leaderboard;
pub mod telemetry;

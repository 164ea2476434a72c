use super::domain::{Entry, SiteConfig};

/// Persistence abstraction for the two JSON documents the leaderboard owns.
///
/// Implementations must make each persist call atomic with respect to
/// readers of the underlying files (write-new-then-swap); the service layer
/// handles ordering across the two documents.
pub trait LeaderboardStore: Send + Sync {
    fn load_config(&self) -> Result<SiteConfig, StoreError>;
    fn persist_config(&self, config: &SiteConfig) -> Result<(), StoreError>;
    fn load_entries(&self) -> Result<Vec<Entry>, StoreError>;
    fn persist_entries(&self, entries: &[Entry]) -> Result<(), StoreError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed data file {file}: {source}")]
    Malformed {
        file: String,
        source: serde_json::Error,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

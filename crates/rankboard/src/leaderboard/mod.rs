//! Leaderboard domain: the weighted-scoring core plus the service, storage,
//! and HTTP surface that keep stored scores consistent with the mutable
//! scoring configuration.
//!
//! The scoring functions are pure and total; the service layer is the single
//! writer of the `computed` cache and recomputes every entry whenever the
//! configuration changes.

pub mod auth;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AdminCredentials, AspectRatings, Computed, ConfigPatch, Entry, EntryDraft, EntryId,
    EntryPatch, RatingLabel, ScoringConfig, SiteConfig, SiteConfigView,
};
pub use repository::{LeaderboardStore, StoreError};
pub use router::leaderboard_router;
pub use scoring::{bucket_tier, build_explanation, compute_computed, rating_to_value};
pub use service::{LeaderboardService, ServiceError};

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::leaderboard::domain::{
    AspectRatings, Entry, EntryId, ScoringConfig, SiteConfig,
};
use crate::leaderboard::repository::{LeaderboardStore, StoreError};
use crate::leaderboard::scoring::compute_computed;
use crate::leaderboard::service::LeaderboardService;

/// Store backed by plain mutexes so service and routing tests can run
/// without touching the filesystem.
#[derive(Default)]
pub(super) struct InMemoryStore {
    config: Mutex<SiteConfig>,
    entries: Mutex<Vec<Entry>>,
}

impl InMemoryStore {
    pub(super) fn with_config(config: SiteConfig) -> Self {
        Self {
            config: Mutex::new(config),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn with_state(config: SiteConfig, entries: Vec<Entry>) -> Self {
        Self {
            config: Mutex::new(config),
            entries: Mutex::new(entries),
        }
    }

    pub(super) fn persisted_entries(&self) -> Vec<Entry> {
        self.entries.lock().expect("entries mutex poisoned").clone()
    }

    pub(super) fn persisted_config(&self) -> SiteConfig {
        self.config.lock().expect("config mutex poisoned").clone()
    }
}

impl LeaderboardStore for InMemoryStore {
    fn load_config(&self) -> Result<SiteConfig, StoreError> {
        Ok(self.config.lock().expect("config mutex poisoned").clone())
    }

    fn persist_config(&self, config: &SiteConfig) -> Result<(), StoreError> {
        *self.config.lock().expect("config mutex poisoned") = config.clone();
        Ok(())
    }

    fn load_entries(&self) -> Result<Vec<Entry>, StoreError> {
        Ok(self.entries.lock().expect("entries mutex poisoned").clone())
    }

    fn persist_entries(&self, entries: &[Entry]) -> Result<(), StoreError> {
        *self.entries.lock().expect("entries mutex poisoned") = entries.to_vec();
        Ok(())
    }
}

/// Two equally weighted aspects, default value 3.
pub(super) fn equal_weight_config() -> ScoringConfig {
    let mut aspect_weights = BTreeMap::new();
    aspect_weights.insert("Movement".to_string(), 1.0);
    aspect_weights.insert("Attack".to_string(), 1.0);
    ScoringConfig {
        aspects: vec!["Movement".to_string(), "Attack".to_string()],
        aspect_weights,
        default_aspect_value: 3.0,
    }
}

pub(super) fn site_config_with(scoring: ScoringConfig) -> SiteConfig {
    SiteConfig {
        scoring,
        ..SiteConfig::starter()
    }
}

pub(super) fn ratings(pairs: &[(&str, &str)]) -> AspectRatings {
    pairs
        .iter()
        .map(|(aspect, label)| (aspect.to_string(), label.to_string()))
        .collect()
}

pub(super) fn entry_named(name: &str, aspects: AspectRatings, config: &SiteConfig) -> Entry {
    Entry {
        id: EntryId::generate(),
        name: name.to_string(),
        image: config.placeholder_image.clone(),
        computed: compute_computed(&aspects, &config.scoring),
        aspects,
        notes: String::new(),
    }
}

pub(super) fn service_with(
    store: Arc<InMemoryStore>,
) -> LeaderboardService<InMemoryStore> {
    LeaderboardService::new(store).expect("service boots from in-memory store")
}

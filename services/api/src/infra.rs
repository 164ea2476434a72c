use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use rankboard::leaderboard::auth::SessionManager;
use rankboard::leaderboard::domain::{Entry, EntryId, SiteConfig};
use rankboard::leaderboard::repository::{LeaderboardStore, StoreError};
use rankboard::leaderboard::scoring::compute_computed;
use rankboard::leaderboard::service::LeaderboardService;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Request context for the asset endpoints layered on top of the
/// leaderboard router.
#[derive(Clone)]
pub(crate) struct ApiContext {
    pub(crate) service: Arc<LeaderboardService<JsonFileStore>>,
    pub(crate) sessions: Arc<SessionManager>,
    pub(crate) assets_dir: PathBuf,
}

/// JSON-file persistence for the site config and the entry collection.
///
/// Each document is written to a `.tmp` sibling and renamed into place, so a
/// concurrent reader of the file sees either the old version or the new one,
/// never a torn write.
pub(crate) struct JsonFileStore {
    config_path: PathBuf,
    entries_path: PathBuf,
    seed_path: PathBuf,
}

impl JsonFileStore {
    /// Opens the store, creating the data directory and any missing files: a
    /// starter config, a sample seed collection, and entries copied from it.
    pub(crate) fn open(data_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(data_dir)?;

        let store = Self {
            config_path: data_dir.join("config.json"),
            entries_path: data_dir.join("entries.json"),
            seed_path: data_dir.join("seed-entries.json"),
        };

        if !store.config_path.exists() {
            store.write_json(&store.config_path, &SiteConfig::starter())?;
        }
        if !store.seed_path.exists() {
            let config = store.load_config()?;
            store.write_json(&store.seed_path, &seed_entries(&config))?;
        }
        if !store.entries_path.exists() {
            let seed: Vec<Entry> = store.read_json(&store.seed_path)?;
            store.write_json(&store.entries_path, &seed)?;
        }

        Ok(store)
    }

    /// Replaces the entry collection with the seed entries, rescored against
    /// the current config.
    pub(crate) fn reset_to_seed(&self) -> Result<Vec<Entry>, StoreError> {
        let config = self.load_config()?;
        let mut entries: Vec<Entry> = self.read_json(&self.seed_path)?;
        for entry in &mut entries {
            entry.computed = compute_computed(&entry.aspects, &config.scoring);
        }
        self.persist_entries(&entries)?;
        Ok(entries)
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, StoreError> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
            file: path.display().to_string(),
            source,
        })
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let payload = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Malformed {
            file: path.display().to_string(),
            source,
        })?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl LeaderboardStore for JsonFileStore {
    fn load_config(&self) -> Result<SiteConfig, StoreError> {
        self.read_json(&self.config_path)
    }

    fn persist_config(&self, config: &SiteConfig) -> Result<(), StoreError> {
        self.write_json(&self.config_path, config)
    }

    fn load_entries(&self) -> Result<Vec<Entry>, StoreError> {
        self.read_json(&self.entries_path)
    }

    fn persist_entries(&self, entries: &[Entry]) -> Result<(), StoreError> {
        self.write_json(&self.entries_path, &entries)
    }
}

fn sample_entry(name: &str, ratings: &[(&str, &str)], config: &SiteConfig) -> Entry {
    let aspects = ratings
        .iter()
        .map(|(aspect, label)| (aspect.to_string(), label.to_string()))
        .collect();
    Entry {
        id: EntryId::generate(),
        name: name.to_string(),
        image: config.placeholder_image.clone(),
        computed: compute_computed(&aspects, &config.scoring),
        aspects,
        notes: "Sample entry".to_string(),
    }
}

fn seed_entries(config: &SiteConfig) -> Vec<Entry> {
    vec![
        sample_entry(
            "GooberPrime",
            &[
                ("Movement", "HT2"),
                ("Attack", "HT3"),
                ("Defense", "HT2"),
                ("Utility", "HT3"),
            ],
            config,
        ),
        sample_entry(
            "DashWiz",
            &[
                ("Movement", "HT1"),
                ("Attack", "HT3"),
                ("Defense", "HT4"),
                ("Utility", "HT2"),
            ],
            config,
        ),
        sample_entry(
            "Crumbler",
            &[
                ("Movement", "HT4"),
                ("Attack", "HT4"),
                ("Defense", "HT3"),
                ("Utility", "LT5"),
            ],
            config,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankboard::leaderboard::domain::ConfigPatch;

    #[test]
    fn open_seeds_missing_data_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::open(dir.path()).expect("store opens");

        assert!(dir.path().join("config.json").exists());
        assert!(dir.path().join("seed-entries.json").exists());
        assert!(dir.path().join("entries.json").exists());

        let entries = store.load_entries().expect("entries load");
        assert_eq!(entries.len(), 3);
        let config = store.load_config().expect("config loads");
        for entry in &entries {
            assert_eq!(
                entry.computed,
                compute_computed(&entry.aspects, &config.scoring)
            );
        }
    }

    #[test]
    fn persisted_state_survives_a_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let store = JsonFileStore::open(dir.path()).expect("store opens");
            let mut config = store.load_config().expect("config loads");
            config.site_title = "Renamed".to_string();
            store.persist_config(&config).expect("config persists");
            store.persist_entries(&[]).expect("entries persist");
        }

        let store = JsonFileStore::open(dir.path()).expect("store reopens");
        assert_eq!(
            store.load_config().expect("config loads").site_title,
            "Renamed"
        );
        assert!(store.load_entries().expect("entries load").is_empty());
        assert!(!dir.path().join("entries.json.tmp").exists());
    }

    #[test]
    fn reset_to_seed_rescores_under_the_current_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::open(dir.path()).expect("store opens");

        let service =
            LeaderboardService::new(Arc::new(JsonFileStore::open(dir.path()).expect("opens")))
                .expect("service boots");
        service
            .update_config(ConfigPatch {
                default_aspect_value: Some(5.0),
                aspects: Some(vec!["Luck".to_string()]),
                aspect_weights: Some(Default::default()),
                ..ConfigPatch::default()
            })
            .expect("config updates");

        let entries = store.reset_to_seed().expect("reseed succeeds");
        assert_eq!(entries.len(), 3);
        // No seed entry rates "Luck", so every score collapses to the new
        // default value.
        for entry in entries {
            assert_eq!(entry.computed.score, 5.00);
            assert_eq!(entry.computed.percent, 100);
        }
    }
}

use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use super::domain::{
    ConfigPatch, Entry, EntryDraft, EntryId, EntryPatch, SiteConfig, SiteConfigView,
};
use super::repository::{LeaderboardStore, StoreError};
use super::scoring::{build_explanation, compute_computed};

/// Service enforcing the consistency rule between ratings, config, and the
/// cached `computed` field.
///
/// All writes funnel through the inner `RwLock`: a mutation persists through
/// the store and only then swaps the in-process snapshot, so readers never
/// observe a half-recomputed batch and a config change can never interleave
/// with an entry edit reading stale policy.
pub struct LeaderboardService<S> {
    store: Arc<S>,
    state: RwLock<LeaderboardState>,
}

struct LeaderboardState {
    config: SiteConfig,
    entries: Vec<Entry>,
}

impl<S> LeaderboardService<S>
where
    S: LeaderboardStore + 'static,
{
    /// Loads config and entries, recomputing every score against the current
    /// config in case it changed while the service was down.
    pub fn new(store: Arc<S>) -> Result<Self, ServiceError> {
        let config = store.load_config()?;
        let mut entries = store.load_entries()?;
        for entry in &mut entries {
            entry.computed = compute_computed(&entry.aspects, &config.scoring);
        }
        store.persist_entries(&entries)?;

        debug!(entries = entries.len(), "leaderboard state loaded");

        Ok(Self {
            store,
            state: RwLock::new(LeaderboardState { config, entries }),
        })
    }

    pub fn config_view(&self) -> SiteConfigView {
        let state = self.state.read().expect("state lock poisoned");
        SiteConfigView::from(&state.config)
    }

    pub fn entries(&self) -> Vec<Entry> {
        let state = self.state.read().expect("state lock poisoned");
        state.entries.clone()
    }

    pub fn entry(&self, id: EntryId) -> Result<Entry, ServiceError> {
        let state = self.state.read().expect("state lock poisoned");
        state
            .entries
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }

    /// Audit-trail text for an entry, built from the same per-aspect
    /// resolution that produced its stored score.
    pub fn explanation(&self, id: EntryId) -> Result<String, ServiceError> {
        let state = self.state.read().expect("state lock poisoned");
        let entry = state
            .entries
            .iter()
            .find(|entry| entry.id == id)
            .ok_or(ServiceError::NotFound)?;
        Ok(build_explanation(&entry.aspects, &state.config.scoring))
    }

    pub fn verify_admin(&self, username: &str, password: &str) -> bool {
        let state = self.state.read().expect("state lock poisoned");
        let credentials = &state.config.admin_credentials;
        username == credentials.username && password == credentials.password
    }

    /// Creates an entry with a freshly computed score.
    pub fn create_entry(&self, draft: EntryDraft) -> Result<Entry, ServiceError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::NameRequired);
        }

        let mut state = self.state.write().expect("state lock poisoned");

        let image = draft
            .image
            .filter(|image| !image.is_empty())
            .unwrap_or_else(|| state.config.placeholder_image.clone());

        let entry = Entry {
            id: EntryId::generate(),
            name,
            image,
            computed: compute_computed(&draft.aspects, &state.config.scoring),
            aspects: draft.aspects,
            notes: draft.notes.unwrap_or_default(),
        };

        let mut entries = state.entries.clone();
        entries.push(entry.clone());
        self.store.persist_entries(&entries)?;
        state.entries = entries;

        info!(id = %entry.id, name = %entry.name, "entry created");
        Ok(entry)
    }

    /// Applies a partial update, merging `aspects` into the existing map, and
    /// recomputes the score before the change becomes visible.
    pub fn patch_entry(&self, id: EntryId, patch: EntryPatch) -> Result<Entry, ServiceError> {
        let mut state = self.state.write().expect("state lock poisoned");

        let mut entries = state.entries.clone();
        let slot = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(ServiceError::NotFound)?;

        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ServiceError::NameRequired);
            }
            slot.name = name;
        }
        if let Some(image) = patch.image {
            slot.image = if image.is_empty() {
                state.config.placeholder_image.clone()
            } else {
                image
            };
        }
        if let Some(aspects) = patch.aspects {
            slot.aspects.extend(aspects);
        }
        if let Some(notes) = patch.notes {
            slot.notes = notes;
        }
        slot.computed = compute_computed(&slot.aspects, &state.config.scoring);

        let updated = slot.clone();
        self.store.persist_entries(&entries)?;
        state.entries = entries;

        debug!(id = %updated.id, "entry updated");
        Ok(updated)
    }

    pub fn delete_entry(&self, id: EntryId) -> Result<(), ServiceError> {
        let mut state = self.state.write().expect("state lock poisoned");

        let mut entries = state.entries.clone();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Err(ServiceError::NotFound);
        }

        self.store.persist_entries(&entries)?;
        state.entries = entries;

        debug!(%id, "entry deleted");
        Ok(())
    }

    /// Applies a config patch and recomputes every entry's score as one batch
    /// under the write lock, so no reader can see the new policy paired with
    /// old scores.
    pub fn update_config(&self, patch: ConfigPatch) -> Result<SiteConfigView, ServiceError> {
        let mut state = self.state.write().expect("state lock poisoned");

        if !state.config.allow_config_edit {
            return Err(ServiceError::EditingDisabled);
        }

        let mut config = state.config.clone();
        patch.apply(&mut config);

        let mut entries = state.entries.clone();
        for entry in &mut entries {
            entry.computed = compute_computed(&entry.aspects, &config.scoring);
        }

        self.store.persist_config(&config)?;
        self.store.persist_entries(&entries)?;

        info!(
            entries = entries.len(),
            "site config updated; all scores recomputed"
        );

        state.config = config;
        state.entries = entries;
        Ok(SiteConfigView::from(&state.config))
    }
}

/// Error raised by the leaderboard service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("entry name is required")]
    NameRequired,
    #[error("entry not found")]
    NotFound,
    #[error("config editing is disabled")]
    EditingDisabled,
    #[error(transparent)]
    Store(#[from] StoreError),
}

//! Favorites management
//!
//! The set lives under one key of a [`KeyValueStore`] as a JSON array of
//! movies. Every mutation is written back before it returns and then
//! announced on a broadcast channel, since in-process views never see the
//! store change on their own.

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::error::{ReelError, Result};
use crate::storage::kv::KeyValueStore;
use crate::types::MovieSummary;

/// Store key holding the serialized set
pub const FAVORITES_KEY: &str = "favorites";

const CHANNEL_CAPACITY: usize = 16;

/// Broadcast after the set changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoritesChanged {
    pub count: usize,
}

/// Ordered favorites, unique by id
pub struct Favorites<S> {
    store: S,
    entries: Vec<MovieSummary>,
    notify: broadcast::Sender<FavoritesChanged>,
}

/// Decode a stored value; absent or unreadable values yield an empty set.
/// Unreadable records are skipped so one bad entry does not cost the rest.
fn decode(raw: Option<String>) -> Vec<MovieSummary> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let records = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
        Ok(records) => records,
        Err(e) => {
            let err = ReelError::StorageCorruption(e.to_string());
            warn!(error = %err, "ignoring stored favorites");
            return Vec::new();
        }
    };

    let entries = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            serde_json::from_value::<MovieSummary>(record)
                .inspect_err(|e| warn!(index, error = %e, "skipping unreadable favorite"))
                .ok()
        })
        .collect();
    dedup(entries)
}

fn dedup(mut entries: Vec<MovieSummary>) -> Vec<MovieSummary> {
    let mut seen = std::collections::HashSet::new();
    entries.retain(|m| seen.insert(m.id.clone()));
    entries
}

impl<S: KeyValueStore> Favorites<S> {
    /// Empty set over `store`; call [`Favorites::load`] to read it
    pub fn new(store: S) -> Self {
        let (notify, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            store,
            entries: Vec::new(),
            notify,
        }
    }

    /// Open and load in one step
    pub async fn open(store: S) -> Self {
        let mut favorites = Self::new(store);
        favorites.load().await;
        favorites
    }

    /// Load favorites from the store. Never fails: a missing, unreadable or
    /// corrupt value leaves an empty set.
    pub async fn load(&mut self) {
        let raw = match self.store.get(FAVORITES_KEY).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "favorites store unreadable");
                None
            }
        };
        self.entries = decode(raw);
        debug!(count = self.entries.len(), "favorites loaded");
    }

    /// Re-read the store, e.g. after another instance changed it.
    /// Subscribers are notified when the content differs.
    pub async fn reload(&mut self) -> bool {
        let before = std::mem::take(&mut self.entries);
        self.load().await;
        let changed = before != self.entries;
        if changed {
            self.announce();
        }
        changed
    }

    async fn save(&self) -> Result<()> {
        let content = serde_json::to_string(&self.entries)?;
        self.store.set(FAVORITES_KEY, &content).await
    }

    fn announce(&self) {
        // No receivers is fine
        let _ = self.notify.send(FavoritesChanged {
            count: self.entries.len(),
        });
    }

    /// Add `movie` if absent, remove it if present. Returns whether it is a
    /// favorite afterwards.
    ///
    /// The store is re-read first so changes written by another instance
    /// are kept. The new set is persisted before returning. If the write
    /// fails the in-memory set is rolled back and the error returned.
    pub async fn toggle(&mut self, movie: &MovieSummary) -> Result<bool> {
        self.load().await;
        let previous = self.entries.clone();

        let now_favorite = match self.entries.iter().position(|m| m.id == movie.id) {
            Some(index) => {
                self.entries.remove(index);
                false
            }
            None => {
                self.entries.push(movie.clone());
                true
            }
        };

        if let Err(e) = self.save().await {
            self.entries = previous;
            return Err(e);
        }

        debug!(id = %movie.id, now_favorite, count = self.entries.len(), "favorites updated");
        self.announce();
        Ok(now_favorite)
    }

    /// Remove every favorite
    pub async fn clear(&mut self) -> Result<()> {
        self.load().await;
        if self.entries.is_empty() {
            return Ok(());
        }
        let previous = std::mem::take(&mut self.entries);
        if let Err(e) = self.save().await {
            self.entries = previous;
            return Err(e);
        }
        self.announce();
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|m| m.id == id)
    }

    pub fn all(&self) -> &[MovieSummary] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Listen for changes made through this instance
    pub fn subscribe(&self) -> broadcast::Receiver<FavoritesChanged> {
        self.notify.subscribe()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

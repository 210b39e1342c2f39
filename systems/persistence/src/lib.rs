#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Checkpoint and high-score persistence.
//!
//! Records are stored as JSON blobs behind the [`Store`] trait so the game
//! never depends on a particular backend. Store failures and corrupt blobs are
//! logged and treated as absent data; they never interrupt a run.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use neon_onslaught_core::{Event, HighScore, SaveRecord, HIGH_SCORE_KEY, SAVE_GAME_KEY};
use serde::Serialize;
use thiserror::Error;

/// Failure reported by a [`Store`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not read or write the entry.
    #[error("i/o failure on `{key}`")]
    Io {
        /// Entry being accessed.
        key: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The backend refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value storage for string blobs.
pub trait Store {
    /// Writes `blob` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError>;

    /// Reads the blob stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Removes `key`. Removing a missing key succeeds.
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process store backed by an ordered map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Store for MemoryStore {
    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        let _ = self.entries.insert(key.to_owned(), blob.to_owned());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        let _ = self.entries.remove(key);
        Ok(())
    }
}

/// Configuration parameters required to construct the persistence system.
#[derive(Clone, Debug)]
pub struct Config {
    save_key: String,
    high_score_key: String,
}

impl Config {
    /// Creates a configuration using the standard storage keys.
    #[must_use]
    pub fn new() -> Self {
        Self::with_keys(SAVE_GAME_KEY, HIGH_SCORE_KEY)
    }

    /// Creates a configuration storing records under custom keys.
    #[must_use]
    pub fn with_keys(save_key: impl Into<String>, high_score_key: impl Into<String>) -> Self {
        Self {
            save_key: save_key.into(),
            high_score_key: high_score_key.into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// System that writes checkpoints and high scores in response to world events.
#[derive(Clone, Debug, Default)]
pub struct Persistence {
    config: Config,
}

impl Persistence {
    /// Creates a new persistence system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Persists progress described by `events`.
    ///
    /// `checkpoint` is the world's checkpoint after the events were produced;
    /// it is written when a wave was cleared. A finished run records its score
    /// if it beats the stored one and discards the checkpoint.
    pub fn handle(
        &mut self,
        events: &[Event],
        checkpoint: Option<&SaveRecord>,
        store: &mut dyn Store,
    ) {
        for event in events {
            match event {
                Event::WaveCleared { wave } => {
                    let Some(record) = checkpoint else {
                        continue;
                    };
                    self.write(store, &self.config.save_key, record);
                    debug!("checkpoint saved after wave {wave}");
                }
                Event::RunEnded { outcome, stats } => {
                    let candidate = HighScore::from_stats(stats);
                    if self.high_score(store).is_improved_by(&candidate) {
                        self.write(store, &self.config.high_score_key, &candidate);
                        info!(
                            "new high score: wave {} with {} kills",
                            candidate.wave, candidate.kills
                        );
                    }
                    if let Err(error) = store.delete(&self.config.save_key) {
                        warn!("failed to discard checkpoint after {outcome:?}: {error}");
                    }
                }
                _ => {}
            }
        }
    }

    /// Removes and returns the stored checkpoint.
    ///
    /// A corrupt checkpoint is discarded and reported as absent.
    pub fn take_save(&self, store: &mut dyn Store) -> Option<SaveRecord> {
        let blob = self.read(store, &self.config.save_key)?;
        if let Err(error) = store.delete(&self.config.save_key) {
            warn!("failed to remove consumed checkpoint: {error}");
        }
        match serde_json::from_str(&blob) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!("ignoring corrupt checkpoint: {error}");
                None
            }
        }
    }

    /// Reports whether a checkpoint is waiting to be continued.
    #[must_use]
    pub fn has_save(&self, store: &dyn Store) -> bool {
        self.read(store, &self.config.save_key).is_some()
    }

    /// Best recorded run, or an empty score when none is readable.
    #[must_use]
    pub fn high_score(&self, store: &dyn Store) -> HighScore {
        let Some(blob) = self.read(store, &self.config.high_score_key) else {
            return HighScore::default();
        };
        serde_json::from_str(&blob).unwrap_or_else(|error| {
            warn!("ignoring corrupt high score: {error}");
            HighScore::default()
        })
    }

    fn read(&self, store: &dyn Store, key: &str) -> Option<String> {
        store.load(key).unwrap_or_else(|error| {
            warn!("failed to read `{key}`: {error}");
            None
        })
    }

    fn write<T: Serialize>(&self, store: &mut dyn Store, key: &str, value: &T) {
        let blob = match serde_json::to_string(value) {
            Ok(blob) => blob,
            Err(error) => {
                warn!("failed to encode `{key}`: {error}");
                return;
            }
        };
        if let Err(error) = store.save(key, &blob) {
            warn!("failed to write `{key}`: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_overwrites_and_deletes() {
        let mut store = MemoryStore::new();
        store.save("a", "1").expect("save");
        store.save("a", "2").expect("save");
        assert_eq!(store.load("a").expect("load"), Some("2".to_owned()));
        assert_eq!(store.len(), 1);
        store.delete("a").expect("delete");
        store.delete("a").expect("deleting twice is fine");
        assert!(store.is_empty());
        assert_eq!(store.load("a").expect("load"), None);
    }

    #[test]
    fn corrupt_high_score_reads_as_default() {
        let persistence = Persistence::default();
        let mut store = MemoryStore::new();
        store.save(HIGH_SCORE_KEY, "{not json").expect("save");
        assert_eq!(persistence.high_score(&store), HighScore::default());
    }

    #[test]
    fn corrupt_checkpoint_is_dropped_on_take() {
        let persistence = Persistence::default();
        let mut store = MemoryStore::new();
        store.save(SAVE_GAME_KEY, "[]").expect("save");
        assert!(persistence.has_save(&store));
        assert_eq!(persistence.take_save(&mut store), None);
        assert!(!persistence.has_save(&store));
    }

    #[test]
    fn custom_keys_are_respected() {
        let mut persistence = Persistence::new(Config::with_keys("slot", "best"));
        let mut store = MemoryStore::new();
        let stats = neon_onslaught_core::RunStats {
            wave: 4,
            kills: 9,
            ..Default::default()
        };
        persistence.handle(
            &[Event::RunEnded {
                outcome: neon_onslaught_core::RunOutcome::Defeat,
                stats,
            }],
            None,
            &mut store,
        );
        assert!(store.load("best").expect("load").is_some());
        assert!(store.load(HIGH_SCORE_KEY).expect("load").is_none());
    }
}

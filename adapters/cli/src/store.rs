//! JSON file backend for checkpoints and high scores.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use log::warn;
use neon_onslaught_system_persistence::{Store, StoreError};

/// Keeps every entry in one JSON object on disk, rewritten on each change.
#[derive(Debug)]
pub(crate) struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store; an
    /// unreadable one is reported and replaced on the next write.
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|error| {
                warn!("discarding unreadable store {}: {error}", path.display());
                BTreeMap::new()
            }),
            Err(error) if error.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    key: path.display().to_string(),
                    source,
                })
            }
        };
        Ok(Self { path, entries })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, key: &str) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(&self.entries)
            .map_err(|error| StoreError::Unavailable(error.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                key: key.to_owned(),
                source,
            })?;
        }
        fs::write(&self.path, contents).map_err(|source| StoreError::Io {
            key: key.to_owned(),
            source,
        })
    }
}

impl Store for FileStore {
    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        let _ = self.entries.insert(key.to_owned(), blob.to_owned());
        self.flush(key)
    }

    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_none() {
            return Ok(());
        }
        self.flush(key)
    }
}

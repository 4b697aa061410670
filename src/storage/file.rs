// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON-file-backed store.
//!
//! The whole map lives in one document. Every write rewrites it through a
//! temporary file that is renamed into place, so a crash never leaves a
//! half-written store behind.

use crate::error::{AppError, Result};
use crate::storage::{HandleId, KeyValueStore, StorageEvents, StorageSubscription};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Key-value store persisted to a JSON file.
pub struct FileStore {
    path: Arc<PathBuf>,
    data: Arc<Mutex<BTreeMap<String, String>>>,
    events: StorageEvents,
    id: HandleId,
}

impl FileStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let data: BTreeMap<String, String> = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Store file is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        tracing::debug!(path = %path.display(), keys = data.len(), "Opened local store");

        Ok(Self {
            path: Arc::new(path),
            data: Arc::new(Mutex::new(data)),
            events: StorageEvents::new(),
            id: HandleId::next(),
        })
    }

    /// Another handle on the same file and map.
    pub fn handle(&self) -> Self {
        Self {
            path: self.path.clone(),
            data: self.data.clone(),
            events: self.events.clone(),
            id: HandleId::next(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn flush(&self, data: &BTreeMap<String, String>) -> Result<()> {
        let raw = serde_json::to_vec_pretty(data)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw)
            .and_then(|_| std::fs::rename(&tmp, &*self.path))
            .map_err(|e| {
                AppError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
            })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        {
            let mut data = self.lock();
            let previous = data.insert(key.to_string(), value.to_string());
            if let Err(e) = self.flush(&data) {
                // Keep memory and disk in agreement.
                match previous {
                    Some(old) => data.insert(key.to_string(), old),
                    None => data.remove(key),
                };
                return Err(e);
            }
        }
        self.events.publish(self.id, key, Some(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        {
            let mut data = self.lock();
            let Some(previous) = data.remove(key) else {
                return Ok(());
            };
            if let Err(e) = self.flush(&data) {
                data.insert(key.to_string(), previous);
                return Err(e);
            }
        }
        self.events.publish(self.id, key, None);
        Ok(())
    }

    fn subscribe(&self) -> StorageSubscription {
        self.events.subscribe(self.id)
    }
}

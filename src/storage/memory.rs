// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store. Nothing survives the process.

use crate::error::Result;
use crate::storage::{HandleId, KeyValueStore, StorageEvents, StorageSubscription};
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory key-value store.
pub struct MemoryStore {
    data: Arc<DashMap<String, String>>,
    events: StorageEvents,
    id: HandleId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
            events: StorageEvents::new(),
            id: HandleId::next(),
        }
    }

    /// Another handle on the same data (a second browsing context).
    pub fn handle(&self) -> Self {
        Self {
            data: self.data.clone(),
            events: self.events.clone(),
            id: HandleId::next(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        self.events.publish(self.id, key, Some(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.data.remove(key).is_some() {
            self.events.publish(self.id, key, None);
        }
        Ok(())
    }

    fn subscribe(&self) -> StorageSubscription {
        self.events.subscribe(self.id)
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistent local key-value store.
//!
//! Reads and writes are synchronous and atomic per key; nothing spans keys.
//! Each store handle stands for one browsing context. A change made through
//! one handle is announced to every *other* handle of the same store.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Key names as constants.
pub mod keys {
    pub const FAVORITES: &str = "favorites";
    pub const WATCH_DATA: &str = "watchData";
    pub const AUTH_SESSION: &str = "auth.session";
}

/// Buffered change notifications per store before slow receivers lag.
const EVENT_CAPACITY: usize = 64;

/// Key-value storage with change notifications.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Subscribe to changes made through other handles of this store.
    fn subscribe(&self) -> StorageSubscription;
}

/// A change to one key.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageEvent {
    pub key: String,
    /// `None` when the key was removed
    pub new_value: Option<String>,
    origin: u64,
}

/// Identity of a store handle, used to filter out a handle's own writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HandleId(u64);

impl HandleId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Notification fan-out shared by all handles of one store.
#[derive(Clone)]
pub(crate) struct StorageEvents {
    tx: broadcast::Sender<StorageEvent>,
}

impl StorageEvents {
    pub(crate) fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub(crate) fn publish(&self, origin: HandleId, key: &str, new_value: Option<&str>) {
        // No receivers is fine: nobody is watching.
        let _ = self.tx.send(StorageEvent {
            key: key.to_string(),
            new_value: new_value.map(str::to_string),
            origin: origin.0,
        });
    }

    pub(crate) fn subscribe(&self, origin: HandleId) -> StorageSubscription {
        StorageSubscription {
            rx: self.tx.subscribe(),
            origin,
        }
    }
}

/// Receiver of changes made through other handles.
pub struct StorageSubscription {
    rx: broadcast::Receiver<StorageEvent>,
    origin: HandleId,
}

impl StorageSubscription {
    /// Wait for the next foreign change. Returns `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<StorageEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.origin == self.origin.0 => continue,
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Storage subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next foreign change if one is already queued.
    pub fn try_recv(&mut self) -> Option<StorageEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if event.origin == self.origin.0 => continue,
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Storage subscriber lagged, events dropped");
                }
                Err(_) => return None,
            }
        }
    }
}

/// Read and decode a JSON value. Corrupt data is treated as absent.
pub fn get_json<T: serde::de::DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding corrupt stored value");
            Ok(None)
        }
    }
}

/// Encode and write a JSON value.
pub fn set_json<T: serde::Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

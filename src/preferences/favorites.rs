// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorites list kept on the device.
//!
//! Views displaying the list register through [`Favorites::subscribe`]. They
//! hear about changes made in the same context through an explicit observer
//! channel and about changes made in other contexts through storage
//! notifications.

use crate::error::Result;
use crate::models::FavoriteEntry;
use crate::storage::{self, keys, KeyValueStore, StorageSubscription};
use std::sync::Arc;
use tokio::sync::broadcast;

const OBSERVER_CAPACITY: usize = 32;

/// What happened to the favorites list.
#[derive(Debug, Clone, PartialEq)]
pub enum FavoritesChange {
    Added(FavoriteEntry),
    Removed(u64),
    /// Changed in another context, or notifications were missed. Re-read the list.
    External,
}

/// Favorites tracking over the local store.
#[derive(Clone)]
pub struct Favorites {
    store: Arc<dyn KeyValueStore>,
    observers: broadcast::Sender<FavoritesChange>,
}

impl Favorites {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (observers, _) = broadcast::channel(OBSERVER_CAPACITY);
        Self { store, observers }
    }

    /// All favorites in insertion order.
    pub fn list(&self) -> Result<Vec<FavoriteEntry>> {
        Ok(storage::get_json(&*self.store, keys::FAVORITES)?.unwrap_or_default())
    }

    pub fn is_favorite(&self, id: u64) -> Result<bool> {
        Ok(self.list()?.iter().any(|fav| fav.id == id))
    }

    /// Append `entry` unless its ID is already present. Returns whether it was inserted.
    pub fn add(&self, entry: FavoriteEntry) -> Result<bool> {
        let mut favorites = self.list()?;
        if favorites.iter().any(|fav| fav.id == entry.id) {
            return Ok(false);
        }

        favorites.push(entry.clone());
        storage::set_json(&*self.store, keys::FAVORITES, &favorites)?;
        tracing::info!(movie_id = entry.id, title = %entry.title, "Added favorite");
        self.notify(FavoritesChange::Added(entry));
        Ok(true)
    }

    /// Remove by ID. Absent IDs are a no-op.
    pub fn remove(&self, id: u64) -> Result<()> {
        let mut favorites = self.list()?;
        let before = favorites.len();
        favorites.retain(|fav| fav.id != id);
        if favorites.len() == before {
            return Ok(());
        }

        storage::set_json(&*self.store, keys::FAVORITES, &favorites)?;
        tracing::info!(movie_id = id, "Removed favorite");
        self.notify(FavoritesChange::Removed(id));
        Ok(())
    }

    /// Flip membership for a card control. Returns whether the item is now a favorite.
    pub fn toggle(&self, entry: FavoriteEntry) -> Result<bool> {
        if self.is_favorite(entry.id)? {
            self.remove(entry.id)?;
            Ok(false)
        } else {
            self.add(entry)?;
            Ok(true)
        }
    }

    /// Register an observer of list changes.
    pub fn subscribe(&self) -> FavoritesSubscription {
        FavoritesSubscription {
            local: self.observers.subscribe(),
            storage: self.store.subscribe(),
        }
    }

    fn notify(&self, change: FavoritesChange) {
        // Fine if no view is open.
        let _ = self.observers.send(change);
    }
}

/// Receiver side of [`Favorites::subscribe`].
pub struct FavoritesSubscription {
    local: broadcast::Receiver<FavoritesChange>,
    storage: StorageSubscription,
}

impl FavoritesSubscription {
    /// Wait for the next change. `None` once both sources are closed.
    pub async fn recv(&mut self) -> Option<FavoritesChange> {
        loop {
            tokio::select! {
                local = self.local.recv() => match local {
                    Ok(change) => return Some(change),
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        return Some(FavoritesChange::External)
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                },
                event = self.storage.recv() => match event {
                    Some(event) if event.key == keys::FAVORITES => {
                        return Some(FavoritesChange::External)
                    }
                    Some(_) => continue,
                    None => return None,
                },
            }
        }
    }
}

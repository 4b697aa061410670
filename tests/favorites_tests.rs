// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorites persistence and change notifications.

use cinema_client::models::FavoriteEntry;
use cinema_client::preferences::{Favorites, FavoritesChange};
use cinema_client::storage::{keys, FileStore, KeyValueStore, MemoryStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

mod common;

fn interstellar() -> FavoriteEntry {
    FavoriteEntry::from(&common::movie(42, "Interstellar", &[878]))
}

#[test]
fn test_favorite_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    {
        let favorites = Favorites::new(Arc::new(FileStore::open(&path).unwrap()));
        assert!(favorites.add(interstellar()).unwrap());
    }

    let favorites = Favorites::new(Arc::new(FileStore::open(&path).unwrap()));
    assert!(favorites.is_favorite(42).unwrap());
    let list = favorites.list().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].title, "Interstellar");

    favorites.remove(42).unwrap();
    let reopened = Favorites::new(Arc::new(FileStore::open(&path).unwrap()));
    assert!(!reopened.is_favorite(42).unwrap());
    assert!(reopened.list().unwrap().is_empty());
}

#[test]
fn test_entries_are_stored_as_full_records() {
    let store = Arc::new(MemoryStore::new());
    let favorites = Favorites::new(store.clone());
    favorites.add(interstellar()).unwrap();

    let raw = store.get(keys::FAVORITES).unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored[0]["id"], 42);
    assert_eq!(stored[0]["title"], "Interstellar");
    assert_eq!(stored[0]["poster_path"], "/poster-42.jpg");
}

#[test]
fn test_corrupt_list_reads_as_empty() {
    let store = Arc::new(MemoryStore::new());
    store.set(keys::FAVORITES, "[{\"id\": ").unwrap();

    let favorites = Favorites::new(store);
    assert!(favorites.list().unwrap().is_empty());
    assert!(favorites.add(interstellar()).unwrap());
    assert_eq!(favorites.list().unwrap().len(), 1);
}

#[tokio::test]
async fn test_same_context_observers_hear_changes() {
    let favorites = Favorites::new(Arc::new(MemoryStore::new()));
    let mut changes = favorites.subscribe();

    favorites.add(interstellar()).unwrap();
    favorites.remove(42).unwrap();
    // Removing again changes nothing and notifies nobody.
    favorites.remove(42).unwrap();
    favorites.add(FavoriteEntry::from(&common::movie(7, "Se7en", &[]))).unwrap();

    let wait = Duration::from_secs(1);
    assert_eq!(
        timeout(wait, changes.recv()).await.unwrap(),
        Some(FavoritesChange::Added(interstellar()))
    );
    assert_eq!(
        timeout(wait, changes.recv()).await.unwrap(),
        Some(FavoritesChange::Removed(42))
    );
    assert!(matches!(
        timeout(wait, changes.recv()).await.unwrap(),
        Some(FavoritesChange::Added(entry)) if entry.id == 7
    ));
}

#[tokio::test]
async fn test_other_context_changes_arrive_as_external() {
    let tab_a = MemoryStore::new();
    let tab_b = tab_a.handle();

    let favorites_a = Favorites::new(Arc::new(tab_a));
    let favorites_b = Favorites::new(Arc::new(tab_b));
    let mut changes_a = favorites_a.subscribe();

    favorites_b.add(interstellar()).unwrap();

    let change = timeout(Duration::from_secs(1), changes_a.recv())
        .await
        .unwrap();
    assert_eq!(change, Some(FavoritesChange::External));
    assert!(favorites_a.is_favorite(42).unwrap());
}

#[tokio::test]
async fn test_unrelated_keys_do_not_notify() {
    let tab_a = MemoryStore::new();
    let tab_b = tab_a.handle();
    let favorites_a = Favorites::new(Arc::new(tab_a));
    let mut changes_a = favorites_a.subscribe();

    tab_b.set(keys::WATCH_DATA, r#"{"date":"2026-10-17","count":1}"#).unwrap();

    assert!(timeout(Duration::from_millis(100), changes_a.recv())
        .await
        .is_err());
}

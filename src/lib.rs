// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Cinema client: browse a movie catalog, keep favorites, and watch within
//! a daily free-tier allowance.
//!
//! This crate provides the client core (local preferences, auth session
//! state, catalog and auth provider clients, route guarding) and a terminal
//! front-end on top of it.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod player;
pub mod preferences;
pub mod services;
pub mod state;
pub mod storage;
pub mod time_utils;
pub mod validation;

use config::Config;
use error::Result;
use player::PlaybackGate;
use preferences::{Favorites, WatchLimiter};
use services::{CatalogClient, EmbedPlayer, SupabaseAuthClient, TmdbClient};
use state::{AuthStore, CatalogStore};
use std::sync::Arc;
use storage::{FileStore, KeyValueStore};
use time_utils::{Clock, SystemClock};
use tokio::task::JoinHandle;

/// Shared application context, built once at startup.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub favorites: Favorites,
    pub auth: Arc<AuthStore>,
    pub catalog: CatalogStore,
    pub player: PlaybackGate,
    storage_watcher: JoinHandle<()>,
}

impl AppContext {
    /// Open the local store, wire the services and restore the session.
    pub async fn start(config: Config) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(config.store_path())?);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let catalog: Arc<dyn CatalogClient> = Arc::new(TmdbClient::from_config(&config));
        let auth_client = Arc::new(SupabaseAuthClient::from_config(
            &config,
            store.clone(),
            clock.clone(),
        ));

        Ok(Self::assemble(config, store, clock, catalog, auth_client).await)
    }

    /// Wire an already-built store and collaborators.
    pub async fn assemble(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        catalog: Arc<dyn CatalogClient>,
        auth_client: Arc<SupabaseAuthClient>,
    ) -> Self {
        let storage_watcher = auth_client.watch_storage();
        let auth = AuthStore::new(auth_client);
        auth.start();

        let player = PlaybackGate::new(
            WatchLimiter::new(store.clone(), clock),
            config.free_daily_limit,
            EmbedPlayer::new(&config.player_embed_url),
        );

        let ctx = Self {
            favorites: Favorites::new(store.clone()),
            catalog: CatalogStore::new(catalog),
            config,
            store,
            auth,
            player,
            storage_watcher,
        };

        ctx.auth.init().await;
        tracing::debug!(
            authenticated = ctx.auth.state().is_authenticated(),
            "Application context ready"
        );
        ctx
    }

    /// Stop background listeners.
    pub fn shutdown(&self) {
        self.auth.shutdown();
        self.storage_watcher.abort();
    }
}

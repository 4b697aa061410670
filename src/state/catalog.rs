// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog state container: fetched lists plus loading/error status.

use crate::error::Result;
use crate::models::{Genre, Movie, MovieDetails};
use crate::services::CatalogClient;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Similar titles shown on a movie page.
const SIMILAR_MOVIES: usize = 12;

/// Snapshot published to views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub popular: Vec<Movie>,
    pub top_rated: Vec<Movie>,
    pub search_results: Vec<Movie>,
    pub search_query: String,
    pub genres: Vec<Genre>,
    /// Genre shown on the categories page and its movies
    pub selected_genre: Option<u64>,
    pub genre_movies: Vec<Movie>,
    /// Requests in flight
    pub pending: u32,
    pub error: Option<String>,
}

impl CatalogState {
    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }
}

/// A movie page: details plus titles from its first genre.
#[derive(Debug, Clone)]
pub struct MovieView {
    pub details: MovieDetails,
    pub similar: Vec<Movie>,
}

pub struct CatalogStore {
    catalog: Arc<dyn CatalogClient>,
    state: watch::Sender<CatalogState>,
    search_ticket: AtomicU64,
}

impl CatalogStore {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        let (state, _) = watch::channel(CatalogState::default());
        Self {
            catalog,
            state,
            search_ticket: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.state.subscribe()
    }

    pub async fn fetch_popular(&self) {
        self.start();
        let result = self.catalog.list_popular(1).await;
        self.finish(result, "Could not load popular movies", |state, movies| {
            state.popular = movies
        });
    }

    pub async fn fetch_top_rated(&self) {
        self.start();
        let result = self.catalog.list_top_rated(1).await;
        self.finish(result, "Could not load top rated movies", |state, movies| {
            state.top_rated = movies
        });
    }

    pub async fn fetch_genres(&self) {
        self.start();
        let result = self.catalog.list_genres().await;
        self.finish(result, "Could not load genres", |state, genres| {
            state.genres = genres
        });
    }

    pub async fn fetch_by_genre(&self, genre_id: u64) {
        self.start();
        self.state
            .send_modify(|state| state.selected_genre = Some(genre_id));
        let result = self.catalog.list_by_genre(genre_id, 1).await;
        self.finish(result, "Could not load movies for this genre", |state, movies| {
            if state.selected_genre == Some(genre_id) {
                state.genre_movies = movies;
            }
        });
    }

    pub fn set_search_query(&self, query: &str) {
        let query = query.to_string();
        self.state.send_modify(|state| state.search_query = query);
    }

    /// Search the catalog. A blank query clears results without a request.
    /// Only the newest search may publish its results.
    pub async fn search(&self, query: &str) {
        let ticket = self.search_ticket.fetch_add(1, Ordering::SeqCst) + 1;

        if query.trim().is_empty() {
            self.state.send_modify(|state| state.search_results.clear());
            return;
        }

        self.start();
        let result = self.catalog.search(query.trim(), 1).await;
        if self.search_ticket.load(Ordering::SeqCst) != ticket {
            // Neither results nor errors of a superseded search are shown.
            tracing::debug!(query, "Dropping superseded search");
            self.state
                .send_modify(|state| state.pending = state.pending.saturating_sub(1));
            return;
        }
        self.finish(result, "Could not search movies", |state, movies| {
            state.search_results = movies;
        });
    }

    /// Load a movie page. Page-level state: nothing is stored in the container.
    pub async fn movie_page(&self, id: u64) -> Result<MovieView> {
        let details = self.catalog.get_details(id).await?;

        let similar = match details.genres.first() {
            Some(genre) => match self.catalog.list_by_genre(genre.id, 1).await {
                Ok(movies) => movies
                    .into_iter()
                    .filter(|m| m.id != details.id)
                    .take(SIMILAR_MOVIES)
                    .collect(),
                Err(e) => {
                    // Details alone still make a usable page.
                    tracing::warn!(movie_id = id, error = %e, "Could not load similar movies");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(MovieView { details, similar })
    }

    /// Mark a request in flight and clear the previous error.
    fn start(&self) {
        self.state.send_modify(|state| {
            state.pending += 1;
            state.error = None;
        });
    }

    fn finish<T>(
        &self,
        result: Result<T>,
        failure: &str,
        apply: impl FnOnce(&mut CatalogState, T),
    ) {
        self.state.send_modify(|state| {
            state.pending = state.pending.saturating_sub(1);
            match result {
                Ok(value) => apply(state, value),
                Err(e) => {
                    tracing::warn!(error = %e, "{}", failure);
                    state.error = Some(format!("{}. {}", failure, e.user_message()));
                }
            }
        });
    }
}

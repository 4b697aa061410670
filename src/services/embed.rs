// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Third-party embed player.

use crate::error::{AppError, Result};

/// Builds embed URLs and checks that the player page loads.
#[derive(Clone)]
pub struct EmbedPlayer {
    http: reqwest::Client,
    base_url: String,
}

impl EmbedPlayer {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn embed_url(&self, movie_id: u64) -> String {
        format!("{}/{}", self.base_url, movie_id)
    }

    /// Load the player page. Success means content can be delivered.
    pub async fn probe(&self, movie_id: u64) -> Result<()> {
        let url = self.embed_url(movie_id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        tracing::warn!(movie_id, %status, "Embed player failed to load");
        if status.as_u16() == 404 {
            return Err(AppError::NotFound(url));
        }
        Err(AppError::Provider(format!("Player unavailable (HTTP {})", status)))
    }
}

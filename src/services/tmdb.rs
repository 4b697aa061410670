// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TMDB API client for the movie catalog.
//!
//! Handles:
//! - Popular / top-rated / per-genre listings
//! - Free-text search
//! - Movie details with credits and videos
//! - Genre list

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Genre, GenreList, Movie, MovieDetails, MoviePage};
use async_trait::async_trait;
use serde::Deserialize;

/// Read-only access to the movie catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn list_popular(&self, page: u32) -> Result<Vec<Movie>>;

    async fn list_top_rated(&self, page: u32) -> Result<Vec<Movie>>;

    async fn list_by_genre(&self, genre_id: u64, page: u32) -> Result<Vec<Movie>>;

    async fn search(&self, query: &str, page: u32) -> Result<Vec<Movie>>;

    /// Fails with [`AppError::NotFound`] when the ID does not exist.
    async fn get_details(&self, id: u64) -> Result<MovieDetails>;

    async fn list_genres(&self) -> Result<Vec<Genre>>;
}

/// TMDB v3 API client.
#[derive(Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(api_key: String, language: String) -> Self {
        Self::with_base_url("https://api.themoviedb.org/3".to_string(), api_key, language)
    }

    /// Client pointed at another host (tests, proxies).
    pub fn with_base_url(base_url: String, api_key: String, language: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            language,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_base_url(
            config.tmdb_base_url.clone(),
            config.tmdb_api_key.clone(),
            config.language.clone(),
        )
    }

    async fn list(&self, path: &str, extra: &[(&str, String)]) -> Result<Vec<Movie>> {
        let page: MoviePage = self.get_json(path, extra).await?;
        tracing::debug!(
            path,
            page = page.page,
            results = page.results.len(),
            total = page.total_results,
            "Catalog page fetched"
        );
        Ok(page.results)
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        extra: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(extra)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            match status.as_u16() {
                404 => return Err(AppError::NotFound(body)),
                401 => return Err(AppError::Provider("Invalid catalog API key".to_string())),
                429 => {
                    tracing::warn!("TMDB rate limit hit (429)");
                    return Err(AppError::Provider(AppError::PROVIDER_RATE_LIMIT.to_string()));
                }
                _ => return Err(AppError::Provider(format!("HTTP {}: {}", status, body))),
            }
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn list_popular(&self, page: u32) -> Result<Vec<Movie>> {
        self.list("/movie/popular", &[("page", page.to_string())])
            .await
    }

    async fn list_top_rated(&self, page: u32) -> Result<Vec<Movie>> {
        self.list("/movie/top_rated", &[("page", page.to_string())])
            .await
    }

    async fn list_by_genre(&self, genre_id: u64, page: u32) -> Result<Vec<Movie>> {
        self.list(
            "/discover/movie",
            &[
                ("with_genres", genre_id.to_string()),
                ("page", page.to_string()),
            ],
        )
        .await
    }

    async fn search(&self, query: &str, page: u32) -> Result<Vec<Movie>> {
        self.list(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn get_details(&self, id: u64) -> Result<MovieDetails> {
        let path = format!("/movie/{}", id);
        self.get_json(
            &path,
            &[("append_to_response", "credits,videos".to_string())],
        )
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound(format!("movie {}", id)),
            other => other,
        })
    }

    async fn list_genres(&self) -> Result<Vec<Genre>> {
        let list: GenreList = self.get_json("/genre/movie/list", &[]).await?;
        Ok(list.genres)
    }
}

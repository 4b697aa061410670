// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local use.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Movie catalog (TMDB) ---
    /// TMDB v3 API key
    pub tmdb_api_key: String,
    /// TMDB API base URL
    pub tmdb_base_url: String,
    /// Base URL for poster/backdrop images
    pub tmdb_image_base_url: String,
    /// Language requested for catalog metadata
    pub language: String,

    // --- Auth provider (Supabase) ---
    /// Project URL, e.g. https://xyz.supabase.co
    pub supabase_url: String,
    /// Public anon key sent as `apikey`
    pub supabase_anon_key: String,

    // --- Playback ---
    /// Embed player base URL; the movie ID is appended
    pub player_embed_url: String,
    /// Daily views allowed on the free tier
    pub free_daily_limit: u32,

    /// Directory holding the local preference store
    pub data_dir: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            tmdb_api_key: "test_api_key".to_string(),
            tmdb_base_url: "http://localhost:9001/3".to_string(),
            tmdb_image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            supabase_url: "http://localhost:9002".to_string(),
            supabase_anon_key: "test_anon_key".to_string(),
            player_embed_url: DEFAULT_PLAYER_EMBED_URL.to_string(),
            free_daily_limit: DEFAULT_FREE_DAILY_LIMIT,
            data_dir: PathBuf::from(".cinema-test"),
        }
    }
}

const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
const DEFAULT_LANGUAGE: &str = "pt-BR";
const DEFAULT_PLAYER_EMBED_URL: &str = "https://vidsrc.to/embed/movie";
const DEFAULT_FREE_DAILY_LIMIT: u32 = 3;
const DEFAULT_DATA_DIR: &str = ".cinema";

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let free_daily_limit = match env::var("FREE_DAILY_LIMIT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("FREE_DAILY_LIMIT", raw))?,
            Err(_) => DEFAULT_FREE_DAILY_LIMIT,
        };

        Ok(Self {
            tmdb_api_key: env::var("TMDB_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("TMDB_API_KEY"))?,
            tmdb_base_url: env::var("TMDB_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_TMDB_BASE_URL.to_string()),
            tmdb_image_base_url: env::var("TMDB_IMAGE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_BASE_URL.to_string()),
            language: env::var("CATALOG_LANGUAGE").unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string()),
            supabase_url: env::var("SUPABASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_URL"))?,
            supabase_anon_key: env::var("SUPABASE_ANON_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_ANON_KEY"))?,
            player_embed_url: env::var("PLAYER_EMBED_URL")
                .unwrap_or_else(|_| DEFAULT_PLAYER_EMBED_URL.to_string()),
            free_daily_limit,
            data_dir: env::var("CINEMA_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
        })
    }

    /// Path of the JSON file backing the local preference store.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

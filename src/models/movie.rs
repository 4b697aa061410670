// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog models as returned by the movie-metadata API.

use serde::{Deserialize, Serialize};

/// Catalog item as it appears in list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    /// Release date as `YYYY-MM-DD`; empty for unreleased titles
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

impl Movie {
    /// Four-digit year, if the release date has one.
    pub fn release_year(&self) -> Option<&str> {
        release_year(&self.release_date)
    }
}

/// Full movie record, including credits and videos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    /// Minutes
    pub runtime: Option<u32>,
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub credits: Option<Credits>,
    pub videos: Option<Videos>,
}

impl MovieDetails {
    pub fn release_year(&self) -> Option<&str> {
        release_year(&self.release_date)
    }

    /// First YouTube trailer, if any.
    pub fn trailer(&self) -> Option<&Video> {
        self.videos.as_ref()?.results.iter().find(|v| {
            v.site.eq_ignore_ascii_case("youtube") && v.kind.eq_ignore_ascii_case("trailer")
        })
    }

    /// Billed cast, in order, capped at `limit`.
    pub fn top_cast(&self, limit: usize) -> &[CastMember] {
        match &self.credits {
            Some(credits) => &credits.cast[..credits.cast.len().min(limit)],
            None => &[],
        }
    }

    /// Runtime rendered as `2h 49m`.
    pub fn runtime_label(&self) -> Option<String> {
        let minutes = self.runtime.filter(|m| *m > 0)?;
        Some(format!("{}h {}m", minutes / 60, minutes % 60))
    }
}

fn release_year(date: &str) -> Option<&str> {
    date.get(..4).filter(|y| y.chars().all(|c| c.is_ascii_digit()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Videos {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

impl Video {
    pub fn watch_url(&self) -> Option<String> {
        self.site
            .eq_ignore_ascii_case("youtube")
            .then(|| format!("https://www.youtube.com/watch?v={}", self.key))
    }
}

/// Paginated list envelope used by list and search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// Envelope of the genre list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Image URL for a poster/backdrop path, with a placeholder when missing.
pub fn image_url(base_url: &str, path: Option<&str>, size: &str) -> String {
    match path {
        Some(path) if !path.is_empty() => format!("{}/{}{}", base_url, size, path),
        _ => PLACEHOLDER_IMAGE_URL.to_string(),
    }
}

pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/500x750?text=No+Image";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_tolerates_missing_optional_fields() {
        let json = r#"{"id": 157336, "title": "Interstellar", "poster_path": null}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 157336);
        assert_eq!(movie.backdrop_path, None);
        assert_eq!(movie.release_date, "");
        assert_eq!(movie.release_year(), None);
    }

    #[test]
    fn test_details_trailer_and_runtime() {
        let json = r#"{
            "id": 157336,
            "title": "Interstellar",
            "release_date": "2014-11-05",
            "runtime": 169,
            "genres": [{"id": 878, "name": "Ficção científica"}],
            "videos": {"results": [
                {"key": "abc", "site": "Vimeo", "type": "Trailer"},
                {"key": "zSWdZVtXT7E", "site": "YouTube", "type": "Teaser"},
                {"key": "2LqzF5WauAw", "site": "YouTube", "type": "Trailer"}
            ]}
        }"#;
        let details: MovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.release_year(), Some("2014"));
        assert_eq!(details.runtime_label().as_deref(), Some("2h 49m"));
        let trailer = details.trailer().unwrap();
        assert_eq!(trailer.key, "2LqzF5WauAw");
        assert_eq!(
            trailer.watch_url().as_deref(),
            Some("https://www.youtube.com/watch?v=2LqzF5WauAw")
        );
        assert!(details.top_cast(5).is_empty());
    }

    #[test]
    fn test_image_url_placeholder() {
        let base = "https://image.tmdb.org/t/p";
        assert_eq!(
            image_url(base, Some("/poster.jpg"), "w500"),
            "https://image.tmdb.org/t/p/w500/poster.jpg"
        );
        assert_eq!(image_url(base, None, "w500"), PLACEHOLDER_IMAGE_URL);
        assert_eq!(image_url(base, Some(""), "w500"), PLACEHOLDER_IMAGE_URL);
    }
}

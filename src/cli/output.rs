// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plain-text rendering of pages.

use crate::models::{image_url, AdminOverview, FavoriteEntry, Genre, Movie, Plan, SessionUser};
use crate::state::MovieView;
use crate::validation::FormErrors;
use std::fmt::Write;

/// Cast members shown on a movie page.
const CAST_SHOWN: usize = 10;

pub fn movie_list(title: &str, movies: &[Movie]) -> String {
    let mut out = format!("{}\n", title);
    if movies.is_empty() {
        out.push_str("  No movies found.\n");
        return out;
    }
    for movie in movies {
        let _ = writeln!(
            out,
            "  {:>8}  {} ({})  ★ {:.1}",
            movie.id,
            movie.title,
            movie.release_year().unwrap_or("N/A"),
            movie.vote_average
        );
    }
    out
}

pub fn genres(genres: &[Genre]) -> String {
    let mut out = String::from("Genres\n");
    for genre in genres {
        let _ = writeln!(out, "  {:>6}  {}", genre.id, genre.name);
    }
    out
}

pub fn movie_page(view: &MovieView, image_base_url: &str, is_favorite: bool) -> String {
    let movie = &view.details;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} ({}){}",
        movie.title,
        movie.release_year().unwrap_or("N/A"),
        if is_favorite { "  ♥" } else { "" }
    );
    if let Some(tagline) = movie.tagline.as_deref().filter(|t| !t.is_empty()) {
        let _ = writeln!(out, "\"{}\"", tagline);
    }

    let mut facts = vec![format!("★ {:.1}", movie.vote_average)];
    if let Some(runtime) = movie.runtime_label() {
        facts.push(runtime);
    }
    if !movie.genres.is_empty() {
        let names: Vec<&str> = movie.genres.iter().map(|g| g.name.as_str()).collect();
        facts.push(names.join(", "));
    }
    let _ = writeln!(out, "{}", facts.join(" · "));
    let _ = writeln!(
        out,
        "Poster: {}",
        image_url(image_base_url, movie.poster_path.as_deref(), "w500")
    );

    if !movie.overview.is_empty() {
        let _ = writeln!(out, "\n{}", movie.overview);
    }

    let cast = movie.top_cast(CAST_SHOWN);
    if !cast.is_empty() {
        out.push_str("\nCast\n");
        for member in cast {
            if member.character.is_empty() {
                let _ = writeln!(out, "  {}", member.name);
            } else {
                let _ = writeln!(out, "  {} as {}", member.name, member.character);
            }
        }
    }

    if let Some(url) = movie.trailer().and_then(|t| t.watch_url()) {
        let _ = writeln!(out, "\nTrailer: {}", url);
    }

    if !view.similar.is_empty() {
        out.push('\n');
        out.push_str(&movie_list("Similar movies", &view.similar));
    }
    out
}

pub fn favorites(entries: &[FavoriteEntry]) -> String {
    let mut out = String::from("Favorites\n");
    if entries.is_empty() {
        out.push_str("  You have not added any favorites yet.\n");
        return out;
    }
    for entry in entries {
        let year = entry.release_date.get(..4).unwrap_or("N/A");
        let _ = writeln!(
            out,
            "  {:>8}  {} ({})  ★ {:.1}",
            entry.id, entry.title, year, entry.vote_average
        );
    }
    out
}

pub fn dashboard(user: &SessionUser, favorites: usize, allowance: Option<(u32, u32)>) -> String {
    let mut out = format!("Welcome, {}\n", user.username);
    let _ = writeln!(out, "  Email:        {}", user.email);
    let _ = writeln!(out, "  Plan:         {}", user.subscription.as_str());
    if let Some(since) = user.created_at.get(..10) {
        let _ = writeln!(out, "  Member since: {}", since);
    }
    let _ = writeln!(out, "  Favorites:    {}", favorites);
    match allowance {
        Some((remaining, limit)) => {
            let _ = writeln!(out, "  Views left:   {} of {} today", remaining, limit);
        }
        None => out.push_str("  Views left:   unlimited\n"),
    }
    if user.is_admin {
        out.push_str("  Role:         admin\n");
    }
    out
}

pub fn plans(plans: &[Plan], current: Option<&SessionUser>) -> String {
    let mut out = String::from("Plans\n");
    for plan in plans {
        let marker = match current {
            Some(user) if user.subscription == plan.tier => "  (current)",
            _ => "",
        };
        let _ = writeln!(out, "\n  {}  {}{}", plan.name, plan.price_label(), marker);
        for feature in plan.features {
            let _ = writeln!(out, "    - {}", feature);
        }
        if let Some(limit) = plan.daily_limit {
            let _ = writeln!(out, "    - {} movies per day", limit);
        }
    }
    out
}

pub fn admin(user: &SessionUser, overview: &AdminOverview) -> String {
    let mut out = format!("Admin panel\n  Hello, {}.\n", user.username);

    let stats = &overview.stats;
    out.push_str("\n  Overview\n");
    let _ = writeln!(out, "    Total users:   {}", stats.total_users);
    let _ = writeln!(out, "    Premium users: {}", stats.premium_users);
    let _ = writeln!(out, "    Active today:  {}", stats.active_today);
    let _ = writeln!(out, "    Total views:   {}", stats.total_views);

    out.push_str("\n  Recent activity\n");
    for item in &overview.recent_activity {
        let _ = writeln!(out, "    {} ({}, {})", item.message, item.username, item.when);
    }

    out.push_str("\n  Users\n");
    for row in &overview.users {
        let _ = writeln!(
            out,
            "    {:<10} {:<24} {:<8} last login {}",
            row.username,
            row.email,
            row.subscription.as_str(),
            row.last_login
        );
    }
    out
}

pub fn limit_reached(limit: u32) -> String {
    format!(
        "You have watched {} movies today, the free plan limit.\n\
         Upgrade to Premium for unlimited movies: cinema plans\n",
        limit
    )
}

pub fn form_errors(errors: &FormErrors) -> String {
    let mut out = String::new();
    for (field, message) in errors {
        let _ = writeln!(out, "  {}: {}", field, message);
    }
    out
}

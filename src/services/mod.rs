// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! External collaborators: movie catalog, auth provider, embed player.

pub mod embed;
pub mod supabase;
pub mod tmdb;

pub use embed::EmbedPlayer;
pub use supabase::{
    AuthClient, AuthEvent, ChangeOrigin, SessionChange, SignUpOutcome, SupabaseAuthClient,
};
pub use tmdb::{CatalogClient, TmdbClient};

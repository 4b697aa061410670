// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod admin;
pub mod favorite;
pub mod movie;
pub mod plan;
pub mod user;
pub mod watch;

pub use admin::{admin_overview, AdminActivity, AdminOverview, AdminStats, AdminUserRow};
pub use favorite::FavoriteEntry;
pub use movie::{
    image_url, CastMember, Credits, Genre, GenreList, Movie, MovieDetails, MoviePage, Video,
    Videos,
};
pub use plan::{plans, Plan};
pub use user::{
    ProviderUser, Session, SessionUser, SignUpProfile, SubscriptionTier, UserMetadata,
    DEFAULT_USERNAME,
};
pub use watch::WatchCounter;

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-device preferences: favorites and the daily watch limit.

pub mod favorites;
pub mod watch_limit;

pub use favorites::{Favorites, FavoritesChange, FavoritesSubscription};
pub use watch_limit::WatchLimiter;

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! State containers consumed by the view layer.

pub mod auth;
pub mod catalog;
pub mod guard;

pub use auth::{AuthState, AuthStatus, AuthStore};
pub use catalog::{CatalogState, CatalogStore, MovieView};
pub use guard::{guard, Access, Route};

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route table and auth-based route guarding.

use crate::state::auth::AuthState;
use std::fmt;

/// Every page of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Movie(u64),
    Search,
    Categories,
    Favorites,
    Login,
    Register,
    Recover,
    Dashboard,
    Admin,
    Subscription,
    Confirmed,
}

impl Route {
    /// Parse a path such as `/movie/42`. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Route::Home,
            ["movie", id] => Route::Movie(id.parse().ok()?),
            ["search"] => Route::Search,
            ["categories"] => Route::Categories,
            ["favorites"] => Route::Favorites,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["recover"] => Route::Recover,
            ["dashboard"] => Route::Dashboard,
            ["admin"] => Route::Admin,
            ["subscription"] => Route::Subscription,
            ["confirmed"] => Route::Confirmed,
            _ => return None,
        };
        Some(route)
    }

    /// Routes that require a signed-in user.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard | Route::Admin | Route::Subscription)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Movie(id) => write!(f, "/movie/{}", id),
            Route::Search => write!(f, "/search"),
            Route::Categories => write!(f, "/categories"),
            Route::Favorites => write!(f, "/favorites"),
            Route::Login => write!(f, "/login"),
            Route::Register => write!(f, "/register"),
            Route::Recover => write!(f, "/recover"),
            Route::Dashboard => write!(f, "/dashboard"),
            Route::Admin => write!(f, "/admin"),
            Route::Subscription => write!(f, "/subscription"),
            Route::Confirmed => write!(f, "/confirmed"),
        }
    }
}

/// What the view layer should do with a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    /// Auth state not decided yet: show a pending indicator, do not redirect.
    Pending,
    Redirect(Route),
}

/// Decide access to `route` given the current auth state.
pub fn guard(route: Route, auth: &AuthState) -> Access {
    match route {
        Route::Login if auth.is_authenticated() => Access::Redirect(Route::Dashboard),
        route if route.is_protected() => {
            if !auth.is_resolved() {
                Access::Pending
            } else if !auth.is_authenticated() {
                Access::Redirect(Route::Login)
            } else if route == Route::Admin && !auth.is_admin() {
                Access::Redirect(Route::Dashboard)
            } else {
                Access::Allow
            }
        }
        _ => Access::Allow,
    }
}

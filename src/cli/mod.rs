// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Terminal front-end.
//!
//! Each subcommand maps to one page of the application and runs through
//! the route guard before anything is rendered.

pub mod commands;
pub mod output;

use clap::{Args, Parser, Subcommand};

pub use commands::run;

/// Cinema - browse movies, keep favorites, watch within your daily allowance
#[derive(Parser, Debug)]
#[command(name = "cinema", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Popular movies right now
    Popular,

    /// Highest rated movies
    TopRated,

    /// List movie genres
    Genres,

    /// Movies in a genre
    Genre { id: u64 },

    /// Search the catalog by title
    Search { query: String },

    /// Movie details, cast, trailer and similar titles
    Movie { id: u64 },

    /// Your favorite movies
    Favorites,

    /// Add a movie to favorites
    Favorite { id: u64 },

    /// Remove a movie from favorites
    Unfavorite { id: u64 },

    /// Play a movie in the embed player
    Watch { id: u64 },

    /// Sign in
    Login(LoginArgs),

    /// Sign out
    Logout,

    /// Create an account
    Register(RegisterArgs),

    /// Send a password recovery email
    Recover(RecoverArgs),

    /// Account overview
    Dashboard,

    /// Subscription plans
    Plans,

    /// Admin panel (admins only)
    Admin,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// Repeat the password
    #[arg(long)]
    pub confirm_password: String,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RecoverArgs {
    #[arg(long)]
    pub email: String,
}

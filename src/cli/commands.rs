// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subcommand handlers.

use crate::cli::{output, Command, LoginArgs, RecoverArgs, RegisterArgs};
use crate::error::Result;
use crate::models::{admin_overview, plans, FavoriteEntry, SignUpProfile, SubscriptionTier};
use crate::player::PlaybackOutcome;
use crate::services::SignUpOutcome;
use crate::state::{guard, Access, AuthState, Route};
use crate::validation::{self, LoginForm, RecoverForm, RegisterForm};
use crate::AppContext;
use std::process::ExitCode;

/// Page each command renders.
fn route_for(command: &Command) -> Route {
    match command {
        Command::Popular | Command::TopRated => Route::Home,
        Command::Genres | Command::Genre { .. } => Route::Categories,
        Command::Search { .. } => Route::Search,
        Command::Movie { id } | Command::Watch { id } => Route::Movie(*id),
        Command::Favorites | Command::Favorite { .. } | Command::Unfavorite { .. } => {
            Route::Favorites
        }
        Command::Login(_) => Route::Login,
        Command::Logout | Command::Dashboard => Route::Dashboard,
        Command::Register(_) => Route::Register,
        Command::Recover(_) => Route::Recover,
        Command::Plans => Route::Subscription,
        Command::Admin => Route::Admin,
    }
}

/// Run one command against the context.
///
/// Failures the user can act on (validation, rejected sign-in, guarded
/// pages) print a message and yield a failing exit code. Remote errors are
/// returned.
pub async fn run(ctx: &AppContext, command: Command) -> Result<ExitCode> {
    let route = route_for(&command);
    let mut auth = ctx.auth.state();

    if guard(route, &auth) == Access::Pending {
        auth = ctx.auth.resolved().await;
    }
    match guard(route, &auth) {
        Access::Allow => {}
        Access::Redirect(Route::Login) => {
            println!("Sign in to open {}: cinema login --email <EMAIL> --password <PASSWORD>", route);
            return Ok(ExitCode::FAILURE);
        }
        Access::Redirect(Route::Dashboard) if route == Route::Login => {
            if let Some(user) = auth.user() {
                println!("Already signed in as {}.", user.email);
            }
            return Ok(ExitCode::SUCCESS);
        }
        Access::Redirect(to) => {
            println!("You do not have access to {}. Try {}.", route, to);
            return Ok(ExitCode::FAILURE);
        }
        Access::Pending => {
            println!("Still checking your session, try again.");
            return Ok(ExitCode::FAILURE);
        }
    }

    tracing::debug!(%route, "Running command");

    match command {
        Command::Popular => {
            ctx.catalog.fetch_popular().await;
            catalog_page(ctx, |s| output::movie_list("Popular movies", &s.popular))
        }
        Command::TopRated => {
            ctx.catalog.fetch_top_rated().await;
            catalog_page(ctx, |s| output::movie_list("Top rated", &s.top_rated))
        }
        Command::Genres => {
            ctx.catalog.fetch_genres().await;
            catalog_page(ctx, |s| output::genres(&s.genres))
        }
        Command::Genre { id } => {
            ctx.catalog.fetch_genres().await;
            ctx.catalog.fetch_by_genre(id).await;
            catalog_page(ctx, |s| {
                let name = s
                    .genres
                    .iter()
                    .find(|g| g.id == id)
                    .map(|g| g.name.clone())
                    .unwrap_or_else(|| format!("Genre {}", id));
                output::movie_list(&name, &s.genre_movies)
            })
        }
        Command::Search { query } => {
            ctx.catalog.set_search_query(&query);
            ctx.catalog.search(&query).await;
            catalog_page(ctx, |s| {
                output::movie_list(&format!("Results for \"{}\"", s.search_query), &s.search_results)
            })
        }
        Command::Movie { id } => {
            let view = ctx.catalog.movie_page(id).await?;
            let favorite = ctx.favorites.is_favorite(id)?;
            print!(
                "{}",
                output::movie_page(&view, &ctx.config.tmdb_image_base_url, favorite)
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Favorites => {
            print!("{}", output::favorites(&ctx.favorites.list()?));
            Ok(ExitCode::SUCCESS)
        }
        Command::Favorite { id } => {
            let view = ctx.catalog.movie_page(id).await?;
            if ctx.favorites.add(FavoriteEntry::from(&view.details))? {
                println!("Added {} to favorites.", view.details.title);
            } else {
                println!("{} is already in your favorites.", view.details.title);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Unfavorite { id } => {
            ctx.favorites.remove(id)?;
            println!("Removed {} from favorites.", id);
            Ok(ExitCode::SUCCESS)
        }
        Command::Watch { id } => watch(ctx, &auth, id).await,
        Command::Login(args) => login(ctx, args).await,
        Command::Logout => {
            ctx.auth.sign_out().await;
            println!("Signed out.");
            Ok(ExitCode::SUCCESS)
        }
        Command::Register(args) => register(ctx, args).await,
        Command::Recover(args) => recover(ctx, args).await,
        Command::Dashboard => {
            let Some(user) = auth.user() else {
                return Ok(ExitCode::FAILURE);
            };
            let allowance = match user.subscription {
                SubscriptionTier::Free => {
                    Some((ctx.player.remaining_today()?, ctx.player.daily_limit()))
                }
                SubscriptionTier::Premium => None,
            };
            print!(
                "{}",
                output::dashboard(user, ctx.favorites.list()?.len(), allowance)
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Admin => {
            let Some(user) = auth.user() else {
                return Ok(ExitCode::FAILURE);
            };
            print!("{}", output::admin(user, &admin_overview()));
            Ok(ExitCode::SUCCESS)
        }
        Command::Plans => {
            print!(
                "{}",
                output::plans(&plans(ctx.config.free_daily_limit), auth.user())
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print a catalog page, or the container's error.
fn catalog_page(
    ctx: &AppContext,
    render: impl FnOnce(&crate::state::CatalogState) -> String,
) -> Result<ExitCode> {
    let state = ctx.catalog.state();
    if let Some(error) = &state.error {
        eprintln!("{}", error);
        return Ok(ExitCode::FAILURE);
    }
    print!("{}", render(&state));
    Ok(ExitCode::SUCCESS)
}

async fn watch(ctx: &AppContext, auth: &AuthState, id: u64) -> Result<ExitCode> {
    match ctx.player.play(auth, id).await? {
        PlaybackOutcome::Started {
            embed_url,
            views_today,
        } => {
            println!("Now playing: {}", embed_url);
            if let Some(count) = views_today {
                let limit = ctx.player.daily_limit();
                println!(
                    "{} of {} free views used today.",
                    count.min(limit),
                    limit
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        PlaybackOutcome::LimitReached { limit } => {
            print!("{}", output::limit_reached(limit));
            Ok(ExitCode::FAILURE)
        }
        PlaybackOutcome::Failed { embed_url, message } => {
            eprintln!("Could not load the player ({}): {}", embed_url, message);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn login(ctx: &AppContext, args: LoginArgs) -> Result<ExitCode> {
    let form = LoginForm {
        email: args.email,
        password: args.password,
    };
    if let Err(errors) = validation::check(&form) {
        eprint!("{}", output::form_errors(&errors));
        return Ok(ExitCode::FAILURE);
    }

    ctx.auth.sign_in(&form.email, &form.password).await;
    let state = ctx.auth.state();
    match (state.user(), state.error.as_deref()) {
        (Some(user), _) => {
            println!("Signed in as {}.", user.username);
            Ok(ExitCode::SUCCESS)
        }
        (None, Some(error)) => {
            eprintln!("{}", error);
            Ok(ExitCode::FAILURE)
        }
        (None, None) => Ok(ExitCode::FAILURE),
    }
}

async fn register(ctx: &AppContext, args: RegisterArgs) -> Result<ExitCode> {
    let form = RegisterForm {
        username: args.username,
        email: args.email,
        password: args.password,
        confirm_password: args.confirm_password,
    };
    if let Err(errors) = validation::check(&form) {
        eprint!("{}", output::form_errors(&errors));
        return Ok(ExitCode::FAILURE);
    }

    let profile = SignUpProfile::new(form.username.trim());
    match ctx.auth.sign_up(&form.email, &form.password, &profile).await? {
        SignUpOutcome::SignedIn(user) => {
            println!("Welcome, {}! Your account is ready.", user.username);
        }
        SignUpOutcome::ConfirmationRequired(user) => {
            println!(
                "Account created. Check {} for a confirmation link.",
                user.email
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn recover(ctx: &AppContext, args: RecoverArgs) -> Result<ExitCode> {
    let form = RecoverForm { email: args.email };
    if let Err(errors) = validation::check(&form) {
        eprint!("{}", output::form_errors(&errors));
        return Ok(ExitCode::FAILURE);
    }

    ctx.auth.reset_password(&form.email).await?;
    println!("If {} has an account, a recovery link is on its way.", form.email);
    Ok(ExitCode::SUCCESS)
}

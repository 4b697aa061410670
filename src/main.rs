// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cinema terminal client
//!
//! Browses the movie catalog, keeps favorites on this device, and plays
//! movies within the free tier's daily allowance.

use anyhow::Context;
use cinema_client::{
    cli::{self, Cli},
    config::Config,
    AppContext,
};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            let message = match e.downcast_ref::<cinema_client::error::AppError>() {
                Some(app) => app.user_message(),
                None => format!("{:#}", e),
            };
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(store = %config.store_path().display(), "Starting cinema client");

    let ctx = AppContext::start(config).await?;
    let result = cli::run(&ctx, args.command).await;
    ctx.shutdown();

    Ok(result?)
}

/// Initialize structured JSON logging on stderr.
fn init_logging(verbose: bool) {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("cinema_client={},warn", level))
    });

    tracing_subscriber::registry().with(filter).with(format).init();
}

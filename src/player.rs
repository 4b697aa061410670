// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Playback gate for the free tier.
//!
//! A view asks for a ticket before showing the player. The ticket is
//! settled exactly once: `loaded` when the player delivered content (the
//! only case that counts a view), `failed` otherwise.

use crate::error::Result;
use crate::models::SubscriptionTier;
use crate::preferences::WatchLimiter;
use crate::services::EmbedPlayer;
use crate::state::AuthState;

/// Outcome of asking to play a movie.
#[derive(Debug, PartialEq)]
pub enum PlaybackDecision {
    Allowed(PlaybackTicket),
    /// Gated state, not an error: show the upgrade prompt.
    LimitReached { limit: u32 },
}

/// Permission to start one playback.
#[derive(Debug, PartialEq)]
#[must_use = "a ticket must be settled with `loaded` or `failed`"]
pub struct PlaybackTicket {
    pub movie_id: u64,
    pub embed_url: String,
    /// Whether a successful load counts against the daily limit
    pub metered: bool,
}

/// Result of a full play attempt through [`PlaybackGate::play`].
#[derive(Debug, PartialEq)]
pub enum PlaybackOutcome {
    LimitReached { limit: u32 },
    Started {
        embed_url: String,
        /// Today's count after this view, for metered users
        views_today: Option<u32>,
    },
    Failed { embed_url: String, message: String },
}

pub struct PlaybackGate {
    limiter: WatchLimiter,
    daily_limit: u32,
    player: EmbedPlayer,
}

impl PlaybackGate {
    pub fn new(limiter: WatchLimiter, daily_limit: u32, player: EmbedPlayer) -> Self {
        Self {
            limiter,
            daily_limit,
            player,
        }
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Views left today for a metered user.
    pub fn remaining_today(&self) -> Result<u32> {
        Ok(self
            .daily_limit
            .saturating_sub(self.limiter.today_count()?))
    }

    /// Only signed-in free-tier users are metered.
    fn is_metered(auth: &AuthState) -> bool {
        auth.is_authenticated() && auth.subscription() == SubscriptionTier::Free
    }

    /// Decide whether `movie_id` may be played. Never counts a view.
    pub fn request(&self, auth: &AuthState, movie_id: u64) -> Result<PlaybackDecision> {
        let metered = Self::is_metered(auth);
        if metered && self.limiter.has_reached_limit(self.daily_limit)? {
            tracing::info!(movie_id, limit = self.daily_limit, "Daily limit reached");
            return Ok(PlaybackDecision::LimitReached {
                limit: self.daily_limit,
            });
        }

        Ok(PlaybackDecision::Allowed(PlaybackTicket {
            movie_id,
            embed_url: self.player.embed_url(movie_id),
            metered,
        }))
    }

    /// The player delivered content. Returns today's count if the view was metered.
    pub fn loaded(&self, ticket: PlaybackTicket) -> Result<Option<u32>> {
        if !ticket.metered {
            return Ok(None);
        }
        let count = self.limiter.increment_today_count()?;
        tracing::info!(movie_id = ticket.movie_id, count, "Counted free-tier view");
        Ok(Some(count))
    }

    /// The player failed to load. Nothing is counted.
    pub fn failed(&self, ticket: PlaybackTicket) {
        tracing::info!(movie_id = ticket.movie_id, "Playback failed, view not counted");
    }

    /// Request, load and settle in one go.
    pub async fn play(&self, auth: &AuthState, movie_id: u64) -> Result<PlaybackOutcome> {
        let ticket = match self.request(auth, movie_id)? {
            PlaybackDecision::Allowed(ticket) => ticket,
            PlaybackDecision::LimitReached { limit } => {
                return Ok(PlaybackOutcome::LimitReached { limit })
            }
        };

        let embed_url = ticket.embed_url.clone();
        match self.player.probe(movie_id).await {
            Ok(()) => Ok(PlaybackOutcome::Started {
                embed_url,
                views_today: self.loaded(ticket)?,
            }),
            Err(e) => {
                self.failed(ticket);
                Ok(PlaybackOutcome::Failed {
                    embed_url,
                    message: e.user_message(),
                })
            }
        }
    }
}

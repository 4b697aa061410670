// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily watch counter and free-tier playback gate.

use axum::{http::StatusCode, routing::get, Router};
use chrono::{Duration, NaiveDate};
use cinema_client::models::{SessionUser, SubscriptionTier};
use cinema_client::player::{PlaybackDecision, PlaybackGate, PlaybackOutcome};
use cinema_client::preferences::WatchLimiter;
use cinema_client::services::EmbedPlayer;
use cinema_client::state::{AuthState, AuthStatus};
use cinema_client::storage::{keys, KeyValueStore, MemoryStore};
use cinema_client::time_utils::ManualClock;
use std::sync::Arc;

mod common;

fn setup(date: NaiveDate) -> (Arc<MemoryStore>, Arc<ManualClock>, WatchLimiter) {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::at_date(date));
    let limiter = WatchLimiter::new(store.clone(), clock.clone());
    (store, clock, limiter)
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn signed_in(tier: SubscriptionTier) -> AuthState {
    AuthState {
        status: AuthStatus::Authenticated(SessionUser {
            id: "u-1".to_string(),
            email: "ana@example.com".to_string(),
            username: "ana".to_string(),
            is_admin: false,
            subscription: tier,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }),
        error: None,
    }
}

#[test]
fn test_count_starts_at_zero() {
    let (_, _, limiter) = setup(day(2026, 10, 17));
    assert_eq!(limiter.today_count().unwrap(), 0);
}

#[test]
fn test_increments_accumulate_within_a_day() {
    let (_, _, limiter) = setup(day(2026, 10, 17));

    for expected in 1..=5 {
        assert_eq!(limiter.increment_today_count().unwrap(), expected);
    }
    assert_eq!(limiter.today_count().unwrap(), 5);
}

#[test]
fn test_count_resets_on_a_new_day() {
    let (store, clock, limiter) = setup(day(2026, 10, 17));
    limiter.increment_today_count().unwrap();
    limiter.increment_today_count().unwrap();

    clock.advance(Duration::days(1));
    assert_eq!(limiter.today_count().unwrap(), 0);

    // The first view of the new day overwrites the stale record.
    assert_eq!(limiter.increment_today_count().unwrap(), 1);
    let raw = store.get(keys::WATCH_DATA).unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["date"], "2026-10-18");
    assert_eq!(stored["count"], 1);
}

#[test]
fn test_has_reached_limit() {
    let (_, _, limiter) = setup(day(2026, 10, 17));

    for _ in 0..3 {
        assert!(!limiter.has_reached_limit(3).unwrap());
        limiter.increment_today_count().unwrap();
    }
    assert!(limiter.has_reached_limit(3).unwrap());
    assert!(limiter.has_reached_limit(0).unwrap());
}

#[test]
fn test_corrupt_record_reads_as_zero() {
    let (store, _, limiter) = setup(day(2026, 10, 17));
    store.set(keys::WATCH_DATA, "{not json").unwrap();

    assert_eq!(limiter.today_count().unwrap(), 0);
    assert_eq!(limiter.increment_today_count().unwrap(), 1);
}

#[test]
fn test_free_user_blocked_after_three_views() {
    let (_, _, limiter) = setup(day(2026, 10, 17));
    let gate = PlaybackGate::new(
        limiter.clone(),
        3,
        EmbedPlayer::new("https://player.test/embed/movie"),
    );
    let auth = signed_in(SubscriptionTier::Free);

    for view in 1..=3 {
        let PlaybackDecision::Allowed(ticket) = gate.request(&auth, 100 + view).unwrap() else {
            panic!("view {} should be allowed", view);
        };
        assert!(ticket.metered);
        assert_eq!(gate.loaded(ticket).unwrap(), Some(view as u32));
    }

    assert_eq!(
        gate.request(&auth, 104).unwrap(),
        PlaybackDecision::LimitReached { limit: 3 }
    );
    // Being turned away does not count.
    assert_eq!(limiter.today_count().unwrap(), 3);
    assert_eq!(gate.remaining_today().unwrap(), 0);
}

#[test]
fn test_failed_load_is_not_counted() {
    let (_, _, limiter) = setup(day(2026, 10, 17));
    let gate = PlaybackGate::new(limiter.clone(), 3, EmbedPlayer::new("https://player.test"));
    let auth = signed_in(SubscriptionTier::Free);

    let PlaybackDecision::Allowed(ticket) = gate.request(&auth, 7).unwrap() else {
        panic!("should be allowed");
    };
    gate.failed(ticket);
    assert_eq!(limiter.today_count().unwrap(), 0);
}

#[test]
fn test_premium_and_anonymous_are_unmetered() {
    let (_, _, limiter) = setup(day(2026, 10, 17));
    for _ in 0..3 {
        limiter.increment_today_count().unwrap();
    }
    let gate = PlaybackGate::new(limiter.clone(), 3, EmbedPlayer::new("https://player.test"));

    for auth in [
        signed_in(SubscriptionTier::Premium),
        AuthState {
            status: AuthStatus::Anonymous,
            error: None,
        },
    ] {
        let PlaybackDecision::Allowed(ticket) = gate.request(&auth, 7).unwrap() else {
            panic!("unmetered users are never limited");
        };
        assert!(!ticket.metered);
        assert_eq!(gate.loaded(ticket).unwrap(), None);
    }
    assert_eq!(limiter.today_count().unwrap(), 3);
}

#[tokio::test]
async fn test_play_counts_only_successful_loads() {
    let app = Router::new()
        .route("/embed/{id}", get(|| async { "<html>player</html>" }))
        .route("/broken/{id}", get(|| async { StatusCode::BAD_GATEWAY }));
    let base = common::serve(app).await;

    let (_, _, limiter) = setup(day(2026, 10, 17));
    let auth = signed_in(SubscriptionTier::Free);

    let broken = PlaybackGate::new(
        limiter.clone(),
        3,
        EmbedPlayer::new(&format!("{}/broken", base)),
    );
    let outcome = broken.play(&auth, 42).await.unwrap();
    assert!(matches!(outcome, PlaybackOutcome::Failed { .. }));
    assert_eq!(limiter.today_count().unwrap(), 0);

    let working = PlaybackGate::new(
        limiter.clone(),
        3,
        EmbedPlayer::new(&format!("{}/embed", base)),
    );
    let outcome = working.play(&auth, 42).await.unwrap();
    assert_eq!(
        outcome,
        PlaybackOutcome::Started {
            embed_url: format!("{}/embed/42", base),
            views_today: Some(1),
        }
    );
}

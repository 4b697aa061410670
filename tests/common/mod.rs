// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

#![allow(dead_code)]

use async_trait::async_trait;
use cinema_client::error::{AppError, Result};
use cinema_client::models::{
    Genre, Movie, MovieDetails, ProviderUser, Session, SessionUser, SignUpProfile, UserMetadata,
};
use cinema_client::services::{
    AuthClient, AuthEvent, CatalogClient, ChangeOrigin, SessionChange, SignUpOutcome,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, oneshot, Notify};

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn provider_user(id: &str, email: &str, username: &str) -> ProviderUser {
    ProviderUser {
        id: id.to_string(),
        email: Some(email.to_string()),
        user_metadata: UserMetadata {
            username: Some(username.to_string()),
            is_admin: Some(false),
            subscription: Some("free".to_string()),
        },
        created_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

pub fn session_for(user: ProviderUser, expires_at: i64) -> Session {
    Session {
        access_token: format!("access-{}", user.id),
        refresh_token: format!("refresh-{}", user.id),
        expires_at,
        user,
    }
}

pub fn movie(id: u64, title: &str, genre_ids: &[u64]) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/poster-{}.jpg", id)),
        backdrop_path: None,
        overview: format!("Overview of {}", title),
        release_date: "2014-11-05".to_string(),
        vote_average: 8.4,
        genre_ids: genre_ids.to_vec(),
    }
}

pub fn details(id: u64, title: &str, genres: &[Genre]) -> MovieDetails {
    MovieDetails {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/poster-{}.jpg", id)),
        backdrop_path: None,
        overview: format!("Overview of {}", title),
        release_date: "2014-11-05".to_string(),
        vote_average: 8.4,
        runtime: Some(169),
        tagline: None,
        status: "Released".to_string(),
        budget: 0,
        revenue: 0,
        genres: genres.to_vec(),
        credits: None,
        videos: None,
    }
}

// ---------------------------------------------------------------------------
// Fake auth provider
// ---------------------------------------------------------------------------

/// In-memory auth provider whose calls can be held open by the test.
pub struct FakeAuthClient {
    accounts: Mutex<HashMap<String, (String, ProviderUser)>>,
    session: Mutex<Option<Session>>,
    sign_in_gate: Mutex<Option<oneshot::Receiver<()>>>,
    sign_up_gate: Mutex<Option<oneshot::Receiver<()>>>,
    sign_out_gate: Mutex<Option<oneshot::Receiver<()>>>,
    sign_in_failure: Mutex<Option<AppError>>,
    fail_sign_out: AtomicBool,
    confirm_sign_ups: AtomicBool,
    sign_in_calls: AtomicUsize,
    sign_out_calls: AtomicUsize,
    /// Notified when a sign-in call reaches the provider
    pub sign_in_started: Notify,
    /// Notified when a sign-out call reaches the provider
    pub sign_out_started: Notify,
    /// Notified when a sign-up call reaches the provider
    pub sign_up_started: Notify,
    changes: broadcast::Sender<SessionChange>,
}

impl FakeAuthClient {
    pub fn new() -> Arc<Self> {
        let (changes, _) = broadcast::channel(16);
        Arc::new(Self {
            accounts: Mutex::new(HashMap::new()),
            session: Mutex::new(None),
            sign_in_gate: Mutex::new(None),
            sign_up_gate: Mutex::new(None),
            sign_out_gate: Mutex::new(None),
            sign_in_failure: Mutex::new(None),
            fail_sign_out: AtomicBool::new(false),
            confirm_sign_ups: AtomicBool::new(false),
            sign_in_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
            sign_in_started: Notify::new(),
            sign_out_started: Notify::new(),
            sign_up_started: Notify::new(),
            changes,
        })
    }

    pub fn with_account(self: Arc<Self>, email: &str, password: &str, user: ProviderUser) -> Arc<Self> {
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), (password.to_string(), user));
        self
    }

    pub fn set_session(&self, session: Option<Session>) {
        *self.session.lock().unwrap() = session;
    }

    pub fn session(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }

    /// Hold the next sign-in until the returned sender fires.
    pub fn gate_sign_in(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.sign_in_gate.lock().unwrap() = Some(rx);
        tx
    }

    /// Hold the next sign-up until the returned sender fires.
    pub fn gate_sign_up(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.sign_up_gate.lock().unwrap() = Some(rx);
        tx
    }

    /// Hold the next sign-out until the returned sender fires.
    pub fn gate_sign_out(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.sign_out_gate.lock().unwrap() = Some(rx);
        tx
    }

    /// Make the next sign-in fail with `error`.
    pub fn fail_next_sign_in(&self, error: AppError) {
        *self.sign_in_failure.lock().unwrap() = Some(error);
    }

    /// Make the remote part of sign-out fail.
    pub fn fail_sign_out(&self) {
        self.fail_sign_out.store(true, Ordering::SeqCst);
    }

    /// Require email confirmation for new accounts.
    pub fn require_confirmation(&self) {
        self.confirm_sign_ups.store(true, Ordering::SeqCst);
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    /// Simulate an unsolicited provider-side change.
    pub fn push_change(&self, event: AuthEvent, session: Option<Session>) {
        self.set_session(session.clone());
        let _ = self.changes.send(SessionChange {
            event,
            session,
            origin: ChangeOrigin::Provider,
        });
    }

    fn open_session(&self, user: ProviderUser) -> SessionUser {
        let session = session_for(user, i64::MAX);
        let session_user = session.session_user();
        self.set_session(Some(session.clone()));
        let _ = self.changes.send(SessionChange {
            event: AuthEvent::SignedIn,
            session: Some(session),
            origin: ChangeOrigin::Explicit,
        });
        session_user
    }
}

#[async_trait]
impl AuthClient for FakeAuthClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &SignUpProfile,
    ) -> Result<SignUpOutcome> {
        let gate = self.sign_up_gate.lock().unwrap().take();
        self.sign_up_started.notify_one();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let mut user = provider_user(&format!("user-{}", email), email, &profile.username);
        user.user_metadata.subscription = Some(profile.subscription.as_str().to_string());
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), (password.to_string(), user.clone()));

        if self.confirm_sign_ups.load(Ordering::SeqCst) {
            return Ok(SignUpOutcome::ConfirmationRequired(
                SessionUser::from_provider(&user),
            ));
        }
        Ok(SignUpOutcome::SignedIn(self.open_session(user)))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.sign_in_gate.lock().unwrap().take();
        self.sign_in_started.notify_one();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if let Some(error) = self.sign_in_failure.lock().unwrap().take() {
            return Err(error);
        }

        let account = self.accounts.lock().unwrap().get(email).cloned();
        match account {
            Some((expected, user)) if expected == password => Ok(self.open_session(user)),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn sign_out(&self) -> Result<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.sign_out_gate.lock().unwrap().take();
        self.sign_out_started.notify_one();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        self.set_session(None);
        let _ = self.changes.send(SessionChange {
            event: AuthEvent::SignedOut,
            session: None,
            origin: ChangeOrigin::Explicit,
        });

        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(AppError::Network("connection reset".to_string()));
        }
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>> {
        Ok(self.session())
    }

    async fn reset_password(&self, email: &str) -> Result<()> {
        if self.accounts.lock().unwrap().contains_key(email) {
            Ok(())
        } else {
            Err(AppError::Provider("User not found".to_string()))
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }
}

// ---------------------------------------------------------------------------
// Fake catalog
// ---------------------------------------------------------------------------

/// In-memory movie catalog.
#[derive(Default)]
pub struct FakeCatalog {
    pub popular: Vec<Movie>,
    pub top_rated: Vec<Movie>,
    pub genres: Vec<Genre>,
    pub movies: Vec<Movie>,
    pub details: HashMap<u64, MovieDetails>,
    /// Searches for this query wait until the sender fires
    search_gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    failing: AtomicBool,
    pub search_calls: AtomicUsize,
}

impl FakeCatalog {
    /// A small catalog: two genres, four movies.
    pub fn sample() -> Self {
        let sci_fi = Genre {
            id: 878,
            name: "Science Fiction".to_string(),
        };
        let drama = Genre {
            id: 18,
            name: "Drama".to_string(),
        };
        let movies = vec![
            movie(157336, "Interstellar", &[878, 18]),
            movie(27205, "Inception", &[878]),
            movie(603, "The Matrix", &[878]),
            movie(13, "Forrest Gump", &[18]),
        ];

        let mut catalog = Self {
            popular: movies[..2].to_vec(),
            top_rated: movies[2..].to_vec(),
            genres: vec![sci_fi.clone(), drama.clone()],
            movies,
            ..Self::default()
        };
        catalog.details.insert(
            157336,
            details(157336, "Interstellar", &[sci_fi.clone(), drama]),
        );
        catalog
            .details
            .insert(27205, details(27205, "Inception", &[sci_fi]));
        catalog
    }

    /// Fail every call with a network error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn gate_search(&self, query: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.search_gates
            .lock()
            .unwrap()
            .insert(query.to_string(), rx);
        tx
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Network("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn list_popular(&self, _page: u32) -> Result<Vec<Movie>> {
        self.check()?;
        Ok(self.popular.clone())
    }

    async fn list_top_rated(&self, _page: u32) -> Result<Vec<Movie>> {
        self.check()?;
        Ok(self.top_rated.clone())
    }

    async fn list_by_genre(&self, genre_id: u64, _page: u32) -> Result<Vec<Movie>> {
        self.check()?;
        Ok(self
            .movies
            .iter()
            .filter(|m| m.genre_ids.contains(&genre_id))
            .cloned()
            .collect())
    }

    async fn search(&self, query: &str, _page: u32) -> Result<Vec<Movie>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.search_gates.lock().unwrap().remove(query);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.check()?;
        let needle = query.to_lowercase();
        Ok(self
            .movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn get_details(&self, id: u64) -> Result<MovieDetails> {
        self.check()?;
        self.details
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("movie {}", id)))
    }

    async fn list_genres(&self) -> Result<Vec<Genre>> {
        self.check()?;
        Ok(self.genres.clone())
    }
}

// ---------------------------------------------------------------------------
// In-process HTTP servers
// ---------------------------------------------------------------------------

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{}", addr)
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication state container.
//!
//! Mirrors the auth provider's session into a single [`AuthState`]:
//!
//! ```text
//! Unknown -> Loading -> { Authenticated(user), Anonymous }
//!              ^                    |
//!              +--------------------+  (every sign-in / sign-out / restore)
//! ```
//!
//! Every explicit action takes a ticket when it starts. Its result is only
//! committed if no newer explicit action has started since, so a slow
//! sign-in can never overwrite a later sign-out. Calls that open a session
//! reach the provider one at a time, so the persisted session always
//! belongs to the last one to run. Unsolicited session changes from the
//! provider are applied directly, without `Loading`.

use crate::error::{AppError, Result};
use crate::models::{SessionUser, SignUpProfile, SubscriptionTier};
use crate::services::{AuthClient, ChangeOrigin, SessionChange, SignUpOutcome};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{broadcast, watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;

/// Shown when the stored session could not be checked at startup.
pub const SESSION_CHECK_FAILED: &str = "Could not verify your session.";

/// Returned when a newer sign-in or sign-out started before a queued sign-up ran.
pub const SIGN_UP_SUPERSEDED: &str = "Sign-up was cancelled by a newer sign-in or sign-out.";

/// Where the state machine currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthStatus {
    /// Before the first session check.
    Unknown,
    /// An explicit action is in flight.
    Loading,
    Authenticated(SessionUser),
    Anonymous,
}

/// Snapshot published to views.
///
/// The derived flags are methods over `status`, so they can never disagree
/// with the current user.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub status: AuthStatus,
    /// User-facing message from the last failed action; cleared on the next attempt
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            status: AuthStatus::Unknown,
            error: None,
        }
    }
}

impl AuthState {
    pub fn user(&self) -> Option<&SessionUser> {
        match &self.status {
            AuthStatus::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|u| u.is_admin)
    }

    /// Anonymous users count as free tier.
    pub fn subscription(&self) -> SubscriptionTier {
        self.user()
            .map(|u| u.subscription)
            .unwrap_or(SubscriptionTier::Free)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, AuthStatus::Loading)
    }

    /// True once the machine has settled on Authenticated or Anonymous.
    pub fn is_resolved(&self) -> bool {
        matches!(
            self.status,
            AuthStatus::Authenticated(_) | AuthStatus::Anonymous
        )
    }
}

/// Dependency-injected auth state container.
pub struct AuthStore {
    auth: Arc<dyn AuthClient>,
    state: watch::Sender<AuthState>,
    /// Ticket of the newest explicit action
    latest: Mutex<u64>,
    /// Held across provider calls that open a session
    sign_in_lock: AsyncMutex<()>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl AuthStore {
    pub fn new(auth: Arc<dyn AuthClient>) -> Arc<Self> {
        let (state, _) = watch::channel(AuthState::default());
        Arc::new(Self {
            auth,
            state,
            latest: Mutex::new(0),
            sign_in_lock: AsyncMutex::new(()),
            listener: Mutex::new(None),
        })
    }

    /// Start mirroring provider session changes. Call once at startup.
    pub fn start(self: &Arc<Self>) {
        let mut changes = self.auth.subscribe();
        let store = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => {
                        let Some(store) = store.upgrade() else { break };
                        store.apply_change(change);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Missed session changes, re-reading session");
                        let Some(store) = store.upgrade() else { break };
                        store.resync().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            tracing::debug!("Session change listener stopped");
        });

        if let Some(previous) = self.lock_listener().replace(handle) {
            previous.abort();
        }
    }

    /// Stop listening for session changes.
    pub fn shutdown(&self) {
        if let Some(handle) = self.lock_listener().take() {
            handle.abort();
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Wait until the state is Authenticated or Anonymous.
    pub async fn resolved(&self) -> AuthState {
        let mut rx = self.state.subscribe();
        let state = match rx.wait_for(AuthState::is_resolved).await {
            Ok(state) => state.clone(),
            // Sender lives in self, so this cannot close while we hold &self.
            Err(_) => self.state(),
        };
        state
    }

    /// Restore the session at application start.
    pub async fn init(&self) {
        let ticket = self.begin();

        let (status, error) = self.session_status().await;
        self.commit(ticket, status, error);
    }

    /// Sign in with email and password.
    ///
    /// Credential failures surface a generic message; other failures keep
    /// the provider's detail.
    pub async fn sign_in(&self, email: &str, password: &str) {
        let ticket = self.begin();
        let _serialized = self.sign_in_lock.lock().await;
        if self.superseded(ticket) {
            tracing::debug!(ticket, "Sign-in superseded before reaching the provider");
            return;
        }

        match self.auth.sign_in(email, password).await {
            Ok(user) => self.commit_session(ticket, user).await,
            Err(e) => {
                tracing::info!(error = %e, "Sign-in failed");
                self.commit(ticket, AuthStatus::Anonymous, Some(e.user_message()));
            }
        }
    }

    /// Sign out. Local state always ends Anonymous, even if the provider call fails.
    pub async fn sign_out(&self) {
        let ticket = self.begin();

        if let Err(e) = self.auth.sign_out().await {
            tracing::warn!(error = %e, "Provider sign-out failed, clearing local state anyway");
        }

        self.commit(ticket, AuthStatus::Anonymous, None);
    }

    /// Create an account. Auto-confirmed accounts are signed in immediately;
    /// otherwise the state goes back to whatever session the provider holds.
    ///
    /// Errors are returned to the caller rather than stored in the state.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &SignUpProfile,
    ) -> Result<SignUpOutcome> {
        let ticket = self.begin();
        let _serialized = self.sign_in_lock.lock().await;
        if self.superseded(ticket) {
            return Err(AppError::Provider(SIGN_UP_SUPERSEDED.to_string()));
        }

        let outcome = match self.auth.sign_up(email, password, profile).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let (status, _) = self.session_status().await;
                self.commit(ticket, status, None);
                return Err(e);
            }
        };

        match &outcome {
            SignUpOutcome::SignedIn(user) => self.commit_session(ticket, user.clone()).await,
            SignUpOutcome::ConfirmationRequired(_) => {
                let (status, error) = self.session_status().await;
                self.commit(ticket, status, error);
            }
        }
        Ok(outcome)
    }

    /// Ask the provider to send a password recovery email.
    pub async fn reset_password(&self, email: &str) -> Result<()> {
        self.auth.reset_password(email).await
    }

    /// Mirror an unsolicited session change.
    ///
    /// Results of our own explicit calls are ignored here; the action that
    /// made the call commits them under its ticket.
    pub fn apply_change(&self, change: SessionChange) {
        if change.origin == ChangeOrigin::Explicit {
            return;
        }

        let status = match &change.session {
            Some(session) => AuthStatus::Authenticated(session.session_user()),
            None => AuthStatus::Anonymous,
        };
        tracing::debug!(event = ?change.event, authenticated = change.session.is_some(), "Session changed");

        self.state.send_if_modified(|state| {
            if state.status == status {
                return false;
            }
            state.status = status;
            state.error = None;
            true
        });
    }

    async fn resync(&self) {
        match self.auth.get_session().await {
            Ok(session) => {
                let status = match session {
                    Some(session) => AuthStatus::Authenticated(session.session_user()),
                    None => AuthStatus::Anonymous,
                };
                self.state.send_modify(|state| state.status = status);
            }
            Err(e) => tracing::warn!(error = %e, "Session re-read failed"),
        }
    }

    /// Status and error for whatever session the provider currently holds.
    async fn session_status(&self) -> (AuthStatus, Option<String>) {
        match self.auth.get_session().await {
            Ok(Some(session)) => (AuthStatus::Authenticated(session.session_user()), None),
            Ok(None) => (AuthStatus::Anonymous, None),
            Err(e) => {
                tracing::warn!(error = %e, "Session check failed");
                (AuthStatus::Anonymous, Some(SESSION_CHECK_FAILED.to_string()))
            }
        }
    }

    /// Commit a session the provider just opened for `ticket`.
    ///
    /// Must run while holding `sign_in_lock`, so no newer session can have
    /// been persisted yet. A superseded session is revoked: a newer sign-out
    /// wants none, and a newer sign-in opens its own once it gets the lock.
    async fn commit_session(&self, ticket: u64, user: SessionUser) {
        let user_id = user.id.clone();
        if self.commit(ticket, AuthStatus::Authenticated(user), None) {
            tracing::info!(user_id = %user_id, "Sign-in applied");
        } else {
            tracing::info!(user_id = %user_id, "Revoking superseded sign-in");
            if let Err(e) = self.auth.sign_out().await {
                tracing::warn!(error = %e, "Failed to revoke superseded sign-in");
            }
        }
    }

    /// Take a new ticket and enter Loading.
    fn begin(&self) -> u64 {
        let mut latest = self.lock_latest();
        *latest += 1;
        self.state.send_replace(AuthState {
            status: AuthStatus::Loading,
            error: None,
        });
        *latest
    }

    /// Publish the result of the action holding `ticket`, unless it was superseded.
    fn commit(&self, ticket: u64, status: AuthStatus, error: Option<String>) -> bool {
        let latest = self.lock_latest();
        if *latest != ticket {
            tracing::debug!(ticket, latest = *latest, "Dropping stale auth result");
            return false;
        }
        self.state.send_replace(AuthState { status, error });
        true
    }

    fn superseded(&self, ticket: u64) -> bool {
        *self.lock_latest() != ticket
    }

    fn lock_latest(&self) -> MutexGuard<'_, u64> {
        self.latest.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_listener(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.listener.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for AuthStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}

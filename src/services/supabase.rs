// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase Auth (GoTrue) client.
//!
//! Handles:
//! - Sign up / sign in with email and password
//! - Sign out (local session is always cleared)
//! - Password recovery emails
//! - Session persistence in the local store, with refresh when expiring
//! - Session-change notifications, including changes made in other contexts

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{ProviderUser, Session, SessionUser, SignUpProfile};
use crate::storage::{self, keys, KeyValueStore};
use crate::time_utils::Clock;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Refresh the access token when it expires within this margin.
const SESSION_REFRESH_MARGIN_SECS: i64 = 60;

const CHANGE_CAPACITY: usize = 16;

/// Kind of session change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Who caused a session change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Result of this client's own sign-in, sign-up or sign-out call.
    Explicit,
    /// Token refresh, expiry, or a change made in another context.
    Provider,
}

/// Notification sent whenever the provider session changes.
#[derive(Debug, Clone)]
pub struct SessionChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
    pub origin: ChangeOrigin,
}

/// Result of a sign-up.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// Auto-confirmed account; a session was opened.
    SignedIn(SessionUser),
    /// The provider sent a confirmation email; no session yet.
    ConfirmationRequired(SessionUser),
}

/// External identity provider.
#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &SignUpProfile,
    ) -> Result<SignUpOutcome>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser>;

    async fn sign_out(&self) -> Result<()>;

    /// Current session, refreshed if it is about to expire.
    async fn get_session(&self) -> Result<Option<Session>>;

    async fn reset_password(&self, email: &str) -> Result<()>;

    /// Session-change notifications, independent of explicit calls.
    fn subscribe(&self) -> broadcast::Receiver<SessionChange>;
}

/// Token grant response.
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    #[serde(default)]
    expires_at: Option<i64>,
    user: ProviderUser,
}

/// Sign-up returns a session for auto-confirmed accounts, otherwise the bare user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(ProviderUser),
}

/// Error body. GoTrue versions disagree on field names.
#[derive(Debug, Default, Deserialize)]
struct GoTrueError {
    error: Option<String>,
    error_description: Option<String>,
    error_code: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl GoTrueError {
    fn is_credential_error(&self) -> bool {
        self.error.as_deref() == Some("invalid_grant")
            || self.error_code.as_deref() == Some("invalid_credentials")
    }

    fn detail(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

/// Supabase Auth client with locally persisted session.
pub struct SupabaseAuthClient {
    http: reqwest::Client,
    auth_url: String,
    anon_key: String,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    changes: broadcast::Sender<SessionChange>,
}

impl SupabaseAuthClient {
    pub fn new(
        supabase_url: &str,
        anon_key: String,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            http: reqwest::Client::new(),
            auth_url: format!("{}/auth/v1", supabase_url.trim_end_matches('/')),
            anon_key,
            store,
            clock,
            changes,
        }
    }

    pub fn from_config(
        config: &Config,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(
            &config.supabase_url,
            config.supabase_anon_key.clone(),
            store,
            clock,
        )
    }

    /// Forward session changes made through other store handles as
    /// provider-origin notifications. Runs until the store goes away.
    pub fn watch_storage(self: &Arc<Self>) -> JoinHandle<()> {
        let mut storage = self.store.subscribe();
        let client = Arc::downgrade(self);

        tokio::spawn(async move {
            while let Some(event) = storage.recv().await {
                if event.key != keys::AUTH_SESSION {
                    continue;
                }
                let Some(client) = client.upgrade() else {
                    break;
                };

                let session: Option<Session> = event
                    .new_value
                    .as_deref()
                    .and_then(|raw| serde_json::from_str(raw).ok());
                let auth_event = if session.is_some() {
                    AuthEvent::SignedIn
                } else {
                    AuthEvent::SignedOut
                };
                tracing::debug!(event = ?auth_event, "Session changed in another context");
                client.emit(auth_event, session, ChangeOrigin::Provider);
            }
        })
    }

    fn emit(&self, event: AuthEvent, session: Option<Session>, origin: ChangeOrigin) {
        // Nobody listening is fine.
        let _ = self.changes.send(SessionChange {
            event,
            session,
            origin,
        });
    }

    fn stored_session(&self) -> Result<Option<Session>> {
        storage::get_json(&*self.store, keys::AUTH_SESSION)
    }

    fn persist_session(&self, session: Option<&Session>) -> Result<()> {
        match session {
            Some(session) => storage::set_json(&*self.store, keys::AUTH_SESSION, session),
            None => self.store.remove(keys::AUTH_SESSION),
        }
    }

    fn session_from_tokens(&self, tokens: TokenResponse) -> Session {
        let expires_at = tokens
            .expires_at
            .unwrap_or_else(|| self.clock.now_utc().timestamp() + tokens.expires_in);
        Session {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at,
            user: tokens.user,
        }
    }

    async fn grant(&self, grant_type: &str, body: serde_json::Value) -> Result<TokenResponse> {
        let response = self
            .http
            .post(format!("{}/token", self.auth_url))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response_json(response).await
    }

    async fn refresh(&self, session: &Session) -> Result<Session> {
        let tokens = self
            .grant(
                "refresh_token",
                serde_json::json!({ "refresh_token": session.refresh_token }),
            )
            .await?;
        Ok(self.session_from_tokens(tokens))
    }

    /// Check response status and return error if not successful.
    async fn check_response(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error: GoTrueError = serde_json::from_str(&body).unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("Auth provider rate limit hit (429)");
            return Err(AppError::Provider(AppError::PROVIDER_RATE_LIMIT.to_string()));
        }

        if matches!(status.as_u16(), 400 | 401) && error.is_credential_error() {
            return Err(AppError::InvalidCredentials);
        }

        let detail = error
            .detail()
            .unwrap_or_else(|| format!("HTTP {}: {}", status, body));
        Err(AppError::Provider(detail))
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        self.check_response(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl AuthClient for SupabaseAuthClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &SignUpProfile,
    ) -> Result<SignUpOutcome> {
        let response = self
            .http
            .post(format!("{}/signup", self.auth_url))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": profile,
            }))
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        match self.check_response_json(response).await? {
            SignUpResponse::Session(tokens) => {
                let session = self.session_from_tokens(tokens);
                let user = session.session_user();
                self.persist_session(Some(&session))?;
                tracing::info!(user_id = %user.id, "Signed up and signed in");
                self.emit(AuthEvent::SignedIn, Some(session), ChangeOrigin::Explicit);
                Ok(SignUpOutcome::SignedIn(user))
            }
            SignUpResponse::User(user) => {
                let user = SessionUser::from_provider(&user);
                tracing::info!(user_id = %user.id, "Signed up, confirmation pending");
                Ok(SignUpOutcome::ConfirmationRequired(user))
            }
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser> {
        let tokens = self
            .grant(
                "password",
                serde_json::json!({ "email": email, "password": password }),
            )
            .await?;

        let session = self.session_from_tokens(tokens);
        let user = session.session_user();
        self.persist_session(Some(&session))?;
        tracing::info!(user_id = %user.id, "Signed in");
        self.emit(AuthEvent::SignedIn, Some(session), ChangeOrigin::Explicit);
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        // Drop the local session first; the remote revoke is best-effort.
        let session = self.stored_session()?;
        self.persist_session(None)?;
        self.emit(AuthEvent::SignedOut, None, ChangeOrigin::Explicit);

        let Some(session) = session else {
            return Ok(());
        };

        let response = self
            .http
            .post(format!("{}/logout", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response(response).await?;
        tracing::info!(user_id = %session.user.id, "Signed out");
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>> {
        let Some(session) = self.stored_session()? else {
            return Ok(None);
        };

        let now = self.clock.now_utc().timestamp();
        if !session.expires_within(now, SESSION_REFRESH_MARGIN_SECS) {
            return Ok(Some(session));
        }

        match self.refresh(&session).await {
            Ok(refreshed) => {
                self.persist_session(Some(&refreshed))?;
                tracing::debug!(user_id = %refreshed.user.id, "Session refreshed");
                self.emit(
                    AuthEvent::TokenRefreshed,
                    Some(refreshed.clone()),
                    ChangeOrigin::Provider,
                );
                Ok(Some(refreshed))
            }
            // Offline: keep the session for a later attempt.
            Err(e @ AppError::Network(_)) => Err(e),
            Err(e) => {
                tracing::info!(error = %e, "Session refresh rejected, signing out locally");
                self.persist_session(None)?;
                self.emit(AuthEvent::SignedOut, None, ChangeOrigin::Provider);
                Ok(None)
            }
        }
    }

    async fn reset_password(&self, email: &str) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/recover", self.auth_url))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response(response).await?;
        tracing::info!("Password recovery email requested");
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }
}

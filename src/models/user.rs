// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User and session models, projected from the auth provider.

use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Username shown when the profile has none.
pub const DEFAULT_USERNAME: &str = "Usuário";

/// Subscription tier. Cosmetic: no payment flow backs it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Premium => "premium",
        }
    }
}

/// Profile fields the provider keeps in `user_metadata`.
///
/// Every field is optional; defaults are applied only in
/// [`SessionUser::from_provider`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "isAdmin")]
    pub is_admin: Option<bool>,
    /// Raw tier string; anything other than "premium" is free
    #[serde(default)]
    pub subscription: Option<String>,
}

/// User record as returned by the auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_metadata")]
    pub user_metadata: UserMetadata,
    #[serde(default)]
    pub created_at: String,
}

/// Metadata is free-form on the provider side. A shape we do not
/// understand degrades to defaults instead of failing the whole session.
fn lenient_metadata<'de, D>(deserializer: D) -> Result<UserMetadata, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring malformed user metadata");
        UserMetadata::default()
    }))
}

/// Authenticated user as seen by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
    pub subscription: SubscriptionTier,
    /// When the account was created (ISO 8601)
    pub created_at: String,
}

impl SessionUser {
    /// Project a provider user, applying profile defaults.
    pub fn from_provider(user: &ProviderUser) -> Self {
        let meta = &user.user_metadata;
        Self {
            id: user.id.clone(),
            email: user.email.clone().unwrap_or_default(),
            username: meta
                .username
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            is_admin: meta.is_admin.unwrap_or(false),
            subscription: match meta.subscription.as_deref() {
                Some("premium") => SubscriptionTier::Premium,
                _ => SubscriptionTier::Free,
            },
            created_at: user.created_at.clone(),
        }
    }
}

/// Provider session, persisted locally between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) when the access token expires
    pub expires_at: i64,
    pub user: ProviderUser,
}

impl Session {
    pub fn session_user(&self) -> SessionUser {
        SessionUser::from_provider(&self.user)
    }

    /// Whether the access token expires within `margin_secs` of `now`.
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at - margin_secs <= now
    }
}

/// Profile fields supplied at sign-up.
#[derive(Debug, Clone, Serialize)]
pub struct SignUpProfile {
    pub username: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    pub subscription: SubscriptionTier,
}

impl SignUpProfile {
    /// New accounts start as regular free-tier users.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_admin: false,
            subscription: SubscriptionTier::Free,
        }
    }
}

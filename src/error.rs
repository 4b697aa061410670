// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent user-facing messages.

/// Application error type.
///
/// Every variant resolves to a message through [`AppError::user_message`];
/// none of them is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Local storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message shown for any credential failure. Provider detail is never leaked.
    pub const CREDENTIALS_MESSAGE: &'static str = "Incorrect email or password.";

    /// Marker carried by provider errors caused by HTTP 429.
    pub const PROVIDER_RATE_LIMIT: &'static str = "Too many requests, slow down";

    /// Text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => Self::CREDENTIALS_MESSAGE.to_string(),
            AppError::Network(detail) => {
                format!("Could not reach the server ({detail}). Please try again.")
            }
            AppError::Provider(detail) => detail.clone(),
            AppError::NotFound(_) => "Movie not found.".to_string(),
            AppError::Storage(_) => "Could not access local data.".to_string(),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    pub fn is_credential_error(&self) -> bool {
        matches!(self, AppError::InvalidCredentials)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Whether the provider asked us to back off.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            AppError::Provider(msg) => msg == Self::PROVIDER_RATE_LIMIT,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(format!("JSON error: {}", err))
    }
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, AppError>;

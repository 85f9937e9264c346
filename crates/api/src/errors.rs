//! API error taxonomy with retry classification
//!
//! Every failure of the request pipeline maps onto one of these
//! variants; the retry layer consults [`ApiError::should_retry`] and
//! callers only ever see terminal values.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Categories of API errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Missing/invalid client configuration - non-retryable
    Config,
    /// Network-level failure with no response - retryable
    Transport,
    /// Authentication expired and refresh failed - non-retryable
    Auth,
    /// Client errors (4xx except 401) - non-retryable
    Client,
    /// Server errors (5xx) - retryable
    Server,
}

/// Errors surfaced by the request pipeline
#[derive(Debug, Error)]
pub enum ApiError {
    /// No base URL configured; surfaced before any network call
    #[error("configuration error: {0}")]
    Config(String),

    /// Network-level failure, no response received
    #[error("transport error: {0}")]
    Transport(String),

    /// The session expired and could not be refreshed
    #[error("authentication expired and refresh failed")]
    AuthExpired,

    /// Terminal client error (4xx other than 401)
    #[error("client error {status}: {message}")]
    Client { status: u16, message: String },

    /// Server error (5xx), returned after retries are exhausted
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Response body could not be deserialized
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The request did not complete within the configured timeout
    #[error("timeout after {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    /// Get the error category for this error.
    #[must_use]
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Config(_) | Self::Parse(_) => ApiErrorCategory::Config,
            Self::Transport(_) | Self::Timeout(_) => ApiErrorCategory::Transport,
            Self::AuthExpired => ApiErrorCategory::Auth,
            Self::Client { .. } => ApiErrorCategory::Client,
            Self::Server { .. } => ApiErrorCategory::Server,
        }
    }

    /// Check if the retry layer may re-issue the request.
    #[must_use]
    pub fn should_retry(&self) -> bool {
        matches!(self.category(), ApiErrorCategory::Transport | ApiErrorCategory::Server)
    }

    /// Build the terminal error for a non-success status code.
    ///
    /// 401 is not mapped here; auth expiry is handled inside the
    /// pipeline and only ever surfaces as [`ApiError::AuthExpired`].
    #[must_use]
    pub fn from_status(status: StatusCode, url: &str, body: String) -> Self {
        let message = if body.is_empty() {
            format!("{url} returned status {status}")
        } else {
            format!("{url} returned status {status}: {body}")
        };

        if status == StatusCode::UNAUTHORIZED {
            Self::AuthExpired
        } else if status.is_server_error() {
            Self::Server { status: status.as_u16(), message }
        } else {
            Self::Client { status: status.as_u16(), message }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

//! Error types for session state management.

use thiserror::Error;

/// Errors raised while reading or mutating session state.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Durable credential storage failed
    #[error("credential storage failed: {0}")]
    Storage(String),

    /// No session exists (no tokens at all)
    #[error("not authenticated (no tokens)")]
    NotAuthenticated,

    /// A refresh was requested but no refresh token is held
    #[error("no refresh token available")]
    NoRefreshToken,
}

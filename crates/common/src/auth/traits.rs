//! Traits for credential persistence and session notifications
//!
//! These traits enable dependency injection and testing by abstracting
//! the two external effects of the request pipeline: writing the
//! refresh token to durable storage, and telling the rest of the
//! application that the session changed.

use async_trait::async_trait;

use crate::error::SessionError;

/// Durable storage for the refresh token
///
/// Only the refresh token is persisted; access tokens are short-lived
/// and live in memory only. Implementations are platform-specific
/// (keychain, encrypted preferences, browser storage).
#[async_trait]
pub trait CredentialStorage: Send + Sync {
    /// Persist the refresh token, replacing any previous value.
    ///
    /// An empty string is a valid value and represents "logged out".
    ///
    /// # Errors
    /// Returns [`SessionError::Storage`] if the write fails.
    async fn store_refresh_token(&self, token: &str) -> Result<(), SessionError>;

    /// Load the persisted refresh token, if any.
    ///
    /// # Errors
    /// Returns [`SessionError::Storage`] if the read fails. A missing
    /// value is `Ok(None)`, not an error.
    async fn load_refresh_token(&self) -> Result<Option<String>, SessionError>;
}

/// Observer for session transitions emitted by the refresh path
///
/// Each hook fires exactly once per refresh resolution. Consumers
/// (session management, navigation) react outside the pipeline; the
/// pipeline never awaits user-visible work here.
#[async_trait]
pub trait SessionHooks: Send + Sync {
    /// A refresh succeeded and the token pair was replaced.
    async fn tokens_replaced(&self);

    /// A refresh failed terminally and the session was cleared.
    async fn logged_out(&self);
}

/// Hooks implementation that ignores all notifications.
#[derive(Debug, Default, Clone)]
pub struct NoopSessionHooks;

#[async_trait]
impl SessionHooks for NoopSessionHooks {
    async fn tokens_replaced(&self) {}

    async fn logged_out(&self) {}
}

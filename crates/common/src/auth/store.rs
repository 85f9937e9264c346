//! Token store: single source of truth for session credentials
//!
//! Holds the in-memory [`TokenPair`] behind an async `RwLock` and
//! routes refresh-token persistence through [`CredentialStorage`].
//! Mutation is restricted by convention to explicit login/logout and
//! the refresh path of the request pipeline; every other component
//! only reads.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use super::traits::CredentialStorage;
use super::types::TokenPair;
use crate::error::SessionError;

/// Thread-safe holder of the current session's token pair
///
/// Cheap to clone; clones share the same underlying state.
#[derive(Clone)]
pub struct TokenStore {
    tokens: Arc<RwLock<TokenPair>>,
    storage: Arc<dyn CredentialStorage>,
}

impl TokenStore {
    /// Create an empty store backed by the given durable storage.
    #[must_use]
    pub fn new(storage: Arc<dyn CredentialStorage>) -> Self {
        Self { tokens: Arc::new(RwLock::new(TokenPair::cleared())), storage }
    }

    /// Load the persisted refresh token into memory.
    ///
    /// Called once at process start. The access token always starts out
    /// absent; the first authenticated request will take the 401 →
    /// refresh path to obtain one.
    ///
    /// # Errors
    /// Returns [`SessionError::Storage`] if the read fails.
    pub async fn hydrate(&self) -> Result<bool, SessionError> {
        let persisted = self.storage.load_refresh_token().await?;
        let found = persisted.as_ref().is_some_and(|t| !t.is_empty());

        let mut tokens = self.tokens.write().await;
        tokens.access_token = None;
        tokens.refresh_token = persisted.filter(|t| !t.is_empty());

        if found {
            info!("token store hydrated with persisted refresh token");
        } else {
            debug!("no persisted refresh token found");
        }

        Ok(found)
    }

    /// Replace the session with freshly issued credentials.
    ///
    /// Used by explicit login and by the refresh path after a
    /// successful `/users/refresh`.
    ///
    /// # Errors
    /// Returns [`SessionError::Storage`] if persisting the refresh
    /// token fails; the in-memory pair is replaced regardless so the
    /// session stays usable for its lifetime.
    pub async fn replace(&self, pair: TokenPair) -> Result<(), SessionError> {
        let refresh = pair.refresh_token.clone().unwrap_or_default();

        {
            let mut tokens = self.tokens.write().await;
            *tokens = pair;
        }

        self.storage.store_refresh_token(&refresh).await?;
        debug!("session tokens replaced");
        Ok(())
    }

    /// Clear both tokens and persist the logged-out state.
    ///
    /// Used by explicit logout and by the refresh path on terminal
    /// refresh failure.
    ///
    /// # Errors
    /// Returns [`SessionError::Storage`] if persisting fails; memory is
    /// cleared first either way.
    pub async fn clear(&self) -> Result<(), SessionError> {
        {
            let mut tokens = self.tokens.write().await;
            *tokens = TokenPair::cleared();
        }

        self.storage.store_refresh_token("").await?;
        info!("session tokens cleared");
        Ok(())
    }

    /// Drop the in-memory access token without touching the refresh
    /// token or durable storage.
    ///
    /// The refresh path calls this the moment it decides to refresh, so
    /// concurrent requests stop sending a token known to be stale.
    pub async fn clear_access_token(&self) {
        let mut tokens = self.tokens.write().await;
        tokens.access_token = None;
    }

    /// Current access token, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.tokens.read().await.access_token.clone()
    }

    /// Current refresh token, if any.
    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens.read().await.refresh_token.clone()
    }

    /// Copy of the full pair.
    pub async fn snapshot(&self) -> TokenPair {
        self.tokens.read().await.clone()
    }

    /// `true` when an access token is currently held.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_authenticated()
    }

    /// `true` when a non-empty refresh token is currently held.
    pub async fn can_refresh(&self) -> bool {
        self.tokens.read().await.can_refresh()
    }
}

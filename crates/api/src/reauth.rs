//! Reauthentication coordinator: single-flight token refresh
//!
//! Wraps the [`RequestExecutor`] and recovers 401 responses by
//! refreshing the session exactly once across all concurrent callers.
//! A process-wide async mutex is the refresh lock: the first caller to
//! observe a 401 acquires it and becomes the refresher; everyone else
//! waits for the release and replays with the token the refresher
//! installed. A call that arrives while a refresh is in flight parks on
//! the lock before sending anything, so it can never race ahead with a
//! token older than the refresh it waited on.
//!
//! Refresh failure is terminal: both tokens are cleared, an empty
//! refresh token is persisted, the `logged_out` hook fires, and every
//! waiting caller gets the auth-expired error rather than a masked
//! transport failure.

use std::sync::Arc;

use reqwest::{Response, StatusCode};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use ramble_common::{RefreshResponse, SessionHooks, TokenPair, TokenStore};

use crate::errors::ApiError;
use crate::executor::RequestExecutor;
use crate::request::RequestDescriptor;

/// Auth-recovering layer over the request executor
#[derive(Clone)]
pub struct ReauthCoordinator {
    executor: RequestExecutor,
    hooks: Arc<dyn SessionHooks>,
    refresh_lock: Arc<Mutex<()>>,
}

impl ReauthCoordinator {
    /// Create a coordinator over the given executor.
    #[must_use]
    pub fn new(executor: RequestExecutor, hooks: Arc<dyn SessionHooks>) -> Self {
        Self { executor, hooks, refresh_lock: Arc::new(Mutex::new(())) }
    }

    /// Execute the described request, refreshing the session on 401.
    ///
    /// Non-401 responses pass through unchanged, success and failure
    /// alike; classification is the retry layer's job. A 401 triggers
    /// either a single-flight refresh followed by one replay, or - if
    /// another caller is already refreshing - a wait on that refresh
    /// followed by one replay.
    ///
    /// # Errors
    /// Returns [`ApiError::AuthExpired`] when the session cannot be
    /// refreshed, and propagates executor errors otherwise.
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<Response, ApiError> {
        // Park behind any in-flight refresh before sending.
        drop(self.refresh_lock.lock().await);

        let response = self.executor.execute(descriptor).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(path = %descriptor.path, "request rejected with 401");

        match self.refresh_lock.try_lock() {
            Ok(guard) => {
                let refreshed = self.refresh_session().await;
                drop(guard);

                if refreshed {
                    debug!(path = %descriptor.path, "replaying request after refresh");
                    self.executor.execute(descriptor).await
                } else {
                    Err(ApiError::AuthExpired)
                }
            }
            Err(_) => {
                // Another caller owns the refresh; wait for it, then
                // replay once with whatever token state it left behind.
                drop(self.refresh_lock.lock().await);

                if !self.executor.store().is_authenticated().await {
                    return Err(ApiError::AuthExpired);
                }

                debug!(path = %descriptor.path, "replaying request after waiting on refresh");
                self.executor.execute(descriptor).await
            }
        }
    }

    /// Run one refresh to completion while the lock is held.
    ///
    /// Returns `true` when new tokens were installed. On any failure
    /// (no refresh token, non-2xx, missing tokens in the body, or a
    /// transport error during the refresh call) the session is cleared
    /// and the `logged_out` hook fires.
    async fn refresh_session(&self) -> bool {
        let store = self.executor.store();

        // Stop concurrent requests from reusing a token known stale,
        // before the refresh outcome is known.
        store.clear_access_token().await;

        let refresh_token = match store.refresh_token().await {
            Some(token) if !token.is_empty() => token,
            _ => {
                warn!("401 with no refresh token held; forcing logout");
                self.force_logout().await;
                return false;
            }
        };

        match self.request_new_tokens(&refresh_token).await {
            Some(pair) => {
                if let Err(err) = store.replace(pair).await {
                    // The in-memory session is already updated; losing
                    // the persisted copy only costs the next restart.
                    warn!(error = %err, "failed to persist refreshed token");
                }
                self.hooks.tokens_replaced().await;
                info!("session tokens refreshed");
                true
            }
            None => {
                self.force_logout().await;
                false
            }
        }
    }

    /// Call `/users/refresh` and extract the new pair, if any.
    ///
    /// A transport error here is treated identically to an explicit
    /// rejection: both resolve to a forced logout.
    async fn request_new_tokens(&self, refresh_token: &str) -> Option<TokenPair> {
        let response = match self.executor.execute_refresh(refresh_token).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "token refresh request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "token refresh rejected");
            return None;
        }

        let body: RefreshResponse = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "token refresh response unreadable");
                return None;
            }
        };

        let pair = body.into_token_pair();
        if pair.is_none() {
            warn!("token refresh response carried no tokens");
        }
        pair
    }

    async fn force_logout(&self) {
        if let Err(err) = self.executor.store().clear().await {
            warn!(error = %err, "failed to persist logged-out state");
        }
        self.hooks.logged_out().await;
        info!("session terminated after failed refresh");
    }
}

//! API client facade
//!
//! Entry point for feature code. Composes the pipeline
//! (executor → reauthentication coordinator → retry driver), applies
//! the per-call timeout, and offers typed JSON helpers so callers never
//! touch raw responses unless they want to.
//!
//! Callers observe either a successful response or a terminal
//! [`ApiError`]; the refresh and retry mechanics in between are
//! invisible to them.

use std::sync::Arc;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument};

use ramble_common::{
    CredentialStorage, NoopSessionHooks, SessionError, SessionHooks, TokenPair, TokenStore,
};

use crate::config::ApiConfig;
use crate::errors::ApiError;
use crate::executor::RequestExecutor;
use crate::reauth::ReauthCoordinator;
use crate::request::RequestDescriptor;
use crate::retry::RetryDriver;

/// Authenticated API client for the Ramble backend
#[derive(Clone)]
pub struct ApiClient {
    driver: RetryDriver,
    store: TokenStore,
}

impl ApiClient {
    /// Create a client from configuration, token store, and hooks.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if the HTTP client cannot be built.
    pub fn new(
        config: ApiConfig,
        store: TokenStore,
        hooks: Arc<dyn SessionHooks>,
    ) -> Result<Self, ApiError> {
        let timeout = config.timeout;
        let max_retries = config.max_retries;
        let base_backoff = config.base_backoff;

        let executor = RequestExecutor::new(config, store.clone())?;
        let coordinator = ReauthCoordinator::new(executor, hooks);
        let driver = RetryDriver::new(coordinator, max_retries, base_backoff, timeout);

        Ok(Self { driver, store })
    }

    /// Create a builder for fluent configuration.
    #[must_use]
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Execute a described request through the full pipeline.
    ///
    /// This is the single entry point every data call goes through:
    /// retry around reauthentication around one executed request. The
    /// configured timeout applies per attempt inside the retry loop, so
    /// a slow attempt is retried rather than ending the whole call.
    ///
    /// # Errors
    /// Returns a terminal [`ApiError`]; transient failures and auth
    /// expiry are recovered internally where possible.
    #[instrument(skip(self), fields(path = %descriptor.path, method = %descriptor.method))]
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<Response, ApiError> {
        self.driver.execute_with_retry(descriptor).await
    }

    /// Execute a GET request and deserialize the JSON response.
    ///
    /// # Errors
    /// Returns error if the request fails or the body cannot be parsed.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(&RequestDescriptor::get(path)).await?;
        debug!(path, "GET request successful");
        Self::decode_json(response).await
    }

    /// Execute a POST request and deserialize the JSON response.
    ///
    /// # Errors
    /// Returns error if serialization, the request, or parsing fails.
    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let response = self.execute(&RequestDescriptor::post(path, body)?).await?;
        debug!(path, "POST request successful");
        Self::decode_json(response).await
    }

    /// Execute a PUT request and deserialize the JSON response.
    ///
    /// # Errors
    /// Returns error if serialization, the request, or parsing fails.
    pub async fn put<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let response = self.execute(&RequestDescriptor::put(path, body)?).await?;
        debug!(path, "PUT request successful");
        Self::decode_json(response).await
    }

    /// Execute a DELETE request and deserialize the JSON response.
    ///
    /// # Errors
    /// Returns error if the request fails or the body cannot be parsed.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(&RequestDescriptor::delete(path)).await?;
        debug!(path, "DELETE request successful");
        Self::decode_json(response).await
    }

    /// Install freshly issued credentials (explicit login).
    ///
    /// # Errors
    /// Returns [`SessionError::Storage`] if persistence fails.
    pub async fn login(&self, tokens: TokenPair) -> Result<(), SessionError> {
        self.store.replace(tokens).await?;
        info!("logged in");
        Ok(())
    }

    /// Clear the session (explicit logout).
    ///
    /// # Errors
    /// Returns [`SessionError::Storage`] if persistence fails.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.store.clear().await?;
        info!("logged out");
        Ok(())
    }

    /// The token store backing this client.
    #[must_use]
    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Deserialize a success response, treating 204/205 as `null`.
    async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();

        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            // These statuses never carry a body; only types that
            // deserialize from null (e.g. `()`) are valid here.
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Parse(format!(
                    "no-content response ({}) cannot populate the requested type",
                    status.as_u16()
                ))
            });
        }

        response.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiConfig>,
    storage: Option<Arc<dyn CredentialStorage>>,
    hooks: Option<Arc<dyn SessionHooks>>,
}

impl ApiClientBuilder {
    /// Set the client configuration.
    #[must_use]
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the durable credential storage (required).
    #[must_use]
    pub fn storage(mut self, storage: Arc<dyn CredentialStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the session hooks (defaults to no-op).
    #[must_use]
    pub fn hooks(mut self, hooks: Arc<dyn SessionHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Build the client and hydrate the token store from storage.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if the credential storage is
    /// missing, hydration fails, or client construction fails.
    pub async fn build(self) -> Result<ApiClient, ApiError> {
        let storage = self
            .storage
            .ok_or_else(|| ApiError::Config("credential storage not set".to_string()))?;
        let config = self.config.unwrap_or_default();
        let hooks = self.hooks.unwrap_or_else(|| Arc::new(NoopSessionHooks));

        let store = TokenStore::new(storage);
        store
            .hydrate()
            .await
            .map_err(|e| ApiError::Config(format!("failed to hydrate token store: {e}")))?;

        ApiClient::new(config, store, hooks)
    }
}

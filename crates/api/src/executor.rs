//! Request executor: one HTTP request, headers attached
//!
//! The mechanical bottom of the pipeline. Resolves the final URL,
//! injects the bearer token and locale headers, and issues exactly one
//! request. No retries, no auth recovery; those live in the layers
//! above.

use reqwest::{Client, Response};
use tracing::debug;

use ramble_common::TokenStore;

use crate::config::ApiConfig;
use crate::errors::ApiError;
use crate::request::RequestDescriptor;

/// Path of the token refresh endpoint, relative to the base URL.
pub(crate) const REFRESH_PATH: &str = "/users/refresh";

/// Issues single HTTP requests with auth and locale headers attached
#[derive(Clone)]
pub struct RequestExecutor {
    http: Client,
    config: ApiConfig,
    store: TokenStore,
}

impl RequestExecutor {
    /// Create an executor over the given configuration and token store.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: ApiConfig, store: TokenStore) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config, store })
    }

    /// Issue the described request once.
    ///
    /// Attaches `Authorization: Bearer <token>` when an access token is
    /// present in the token store at call time, and `Accept-Language`
    /// from the configured locale. Any HTTP status is returned as
    /// `Ok(response)`; errors are transport or configuration failures
    /// only.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] when no base URL is configured
    /// (before any network activity) and [`ApiError::Transport`] when
    /// the request fails at the network level.
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<Response, ApiError> {
        let url = self.resolve_url(&descriptor.path)?;

        let mut request = self
            .http
            .request(descriptor.method.clone(), &url)
            .header("Accept-Language", &self.config.locale);

        if let Some(token) = self.store.access_token().await {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        for (name, value) in &descriptor.headers {
            request = request.header(name, value);
        }

        if let Some(body) = &descriptor.body {
            request = request.json(body);
        }

        debug!(method = %descriptor.method, %url, "sending request");

        let response = request.send().await?;

        debug!(method = %descriptor.method, %url, status = %response.status(), "received response");

        Ok(response)
    }

    /// Issue the dedicated refresh call.
    ///
    /// Exempt from access-token injection: the refresh token itself is
    /// the credential. The locale header is still attached.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] without a base URL and
    /// [`ApiError::Transport`] on network failure.
    pub async fn execute_refresh(&self, refresh_token: &str) -> Result<Response, ApiError> {
        let url = self.resolve_url(REFRESH_PATH)?;

        debug!(%url, "sending token refresh request");

        let response = self
            .http
            .post(&url)
            .header("Accept-Language", &self.config.locale)
            .header("Authorization", format!("Bearer {refresh_token}"))
            .send()
            .await?;

        debug!(%url, status = %response.status(), "received refresh response");

        Ok(response)
    }

    /// The token store this executor reads from.
    #[must_use]
    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// The configuration this executor runs with.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn resolve_url(&self, path: &str) -> Result<String, ApiError> {
        let base = self
            .config
            .base_url
            .as_deref()
            .ok_or_else(|| ApiError::Config("no base URL configured".to_string()))?;

        Ok(format!("{base}{path}"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use ramble_common::testing::MemoryCredentialStorage;
    use ramble_common::TokenPair;

    use super::*;

    async fn executor_for(server: &MockServer, locale: &str) -> RequestExecutor {
        let store = TokenStore::new(Arc::new(MemoryCredentialStorage::default()));
        let config = ApiConfig::new(server.uri()).with_locale(locale);
        RequestExecutor::new(config, store).expect("executor")
    }

    /// Header injection: `Authorization: Bearer abc` and
    /// `Accept-Language: fr` are both attached when a token is present.
    #[tokio::test]
    async fn test_attaches_bearer_and_locale_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .and(header("Authorization", "Bearer abc"))
            .and(header("Accept-Language", "fr"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let executor = executor_for(&server, "fr").await;
        executor.store().replace(TokenPair::new("abc", "refresh")).await.unwrap();

        let response = executor.execute(&RequestDescriptor::get("/events")).await.unwrap();
        assert_eq!(response.status(), 200);
    }

    /// Without an access token the `Authorization` header is omitted
    /// entirely rather than sent empty.
    #[tokio::test]
    async fn test_omits_authorization_when_unauthenticated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let executor = executor_for(&server, "en").await;

        executor.execute(&RequestDescriptor::get("/events")).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("Authorization"));
    }

    /// Config error short-circuits: no base URL means no network call.
    #[tokio::test]
    async fn test_missing_base_url_is_config_error() {
        let store = TokenStore::new(Arc::new(MemoryCredentialStorage::default()));
        let executor = RequestExecutor::new(ApiConfig::default(), store).expect("executor");

        let result = executor.execute(&RequestDescriptor::get("/events")).await;

        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    /// The refresh call carries the refresh token as its bearer
    /// credential and never the access token.
    #[tokio::test]
    async fn test_refresh_call_uses_refresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/refresh"))
            .and(header("Authorization", "Bearer refresh-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let executor = executor_for(&server, "en").await;
        executor.store().replace(TokenPair::new("access-1", "refresh-1")).await.unwrap();

        let response = executor.execute_refresh("refresh-1").await.unwrap();
        assert_eq!(response.status(), 200);
    }

    /// Extra descriptor headers and the JSON body survive the build.
    #[tokio::test]
    async fn test_forwards_descriptor_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/activities"))
            .and(header("X-Client", "mobile"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let executor = executor_for(&server, "en").await;
        let descriptor =
            RequestDescriptor::post("/activities", &serde_json::json!({ "name": "hike" }))
                .unwrap()
                .with_header("X-Client", "mobile");

        let response = executor.execute(&descriptor).await.unwrap();
        assert_eq!(response.status(), 201);

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert_eq!(body["name"], "hike");
    }
}

//! Session token types and wire structures
//!
//! Defines the access/refresh token pair held for the current session
//! and the response shape of the backend's `POST /users/refresh`
//! endpoint.

use serde::{Deserialize, Serialize};

/// The current session's bearer credentials
///
/// Both halves are optional:
/// - a missing access token means the caller is unauthenticated and no
///   `Authorization` header is attached to outgoing requests;
/// - a missing refresh token means re-authentication is impossible and
///   any 401 becomes terminal (forced logout).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer credential sent with authenticated requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Longer-lived credential exchanged for a new access token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl TokenPair {
    /// Create a pair from freshly issued credentials.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self { access_token: Some(access_token.into()), refresh_token: Some(refresh_token.into()) }
    }

    /// `true` when an access token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// `true` when a refresh token is held, i.e. a 401 is recoverable.
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// The empty pair used after logout.
    #[must_use]
    pub fn cleared() -> Self {
        Self::default()
    }
}

/// Response body of `POST /users/refresh`
///
/// The backend returns the new token pair together with identity
/// fields used by the session layer outside the pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub username: Option<String>,
    /// Whether the account is linked to an iNaturalist identity
    #[serde(default)]
    pub inaturalist: bool,
}

impl RefreshResponse {
    /// `true` when the backend actually issued both tokens.
    ///
    /// A 2xx response without tokens is treated as a refresh failure by
    /// the pipeline, identical to a non-2xx status.
    #[must_use]
    pub fn has_tokens(&self) -> bool {
        self.access_token.as_ref().is_some_and(|t| !t.is_empty())
            && self.refresh_token.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Convert into a [`TokenPair`], if both tokens were issued.
    #[must_use]
    pub fn into_token_pair(self) -> Option<TokenPair> {
        if self.has_tokens() {
            Some(TokenPair { access_token: self.access_token, refresh_token: self.refresh_token })
        } else {
            None
        }
    }
}

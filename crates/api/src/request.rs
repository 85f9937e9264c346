//! Immutable request descriptions
//!
//! A [`RequestDescriptor`] is the caller-facing description of one
//! outbound call. The pipeline builds a fresh `reqwest` request from it
//! for every attempt; retries and replays never mutate shared request
//! state.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::errors::ApiError;

/// Description of one outbound API call
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Relative path joined onto the configured base URL
    pub path: String,
    /// HTTP method
    pub method: Method,
    /// Extra headers beyond the ones the pipeline injects
    pub headers: Vec<(String, String)>,
    /// JSON body, if any
    pub body: Option<Value>,
}

impl RequestDescriptor {
    /// Descriptor with the given method and no body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { path: path.into(), method, headers: Vec::new(), body: None }
    }

    /// GET descriptor.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// DELETE descriptor.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// POST descriptor with a JSON body.
    ///
    /// # Errors
    /// Returns [`ApiError::Parse`] if the body cannot be serialized.
    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Parse(format!("failed to serialize body: {e}")))?;
        Ok(Self { body: Some(body), ..Self::new(Method::POST, path) })
    }

    /// PUT descriptor with a JSON body.
    ///
    /// # Errors
    /// Returns [`ApiError::Parse`] if the body cannot be serialized.
    pub fn put<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Parse(format!("failed to serialize body: {e}")))?;
        Ok(Self { body: Some(body), ..Self::new(Method::PUT, path) })
    }

    /// Add an extra header to the descriptor.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct EventDraft {
        title: String,
    }

    #[test]
    fn test_get_descriptor() {
        let descriptor = RequestDescriptor::get("/events");

        assert_eq!(descriptor.method, Method::GET);
        assert_eq!(descriptor.path, "/events");
        assert!(descriptor.body.is_none());
        assert!(descriptor.headers.is_empty());
    }

    #[test]
    fn test_post_descriptor_serializes_body() {
        let descriptor =
            RequestDescriptor::post("/events", &EventDraft { title: "Bird walk".to_string() })
                .unwrap();

        assert_eq!(descriptor.method, Method::POST);
        assert_eq!(descriptor.body.unwrap()["title"], "Bird walk");
    }

    #[test]
    fn test_with_header() {
        let descriptor = RequestDescriptor::get("/events").with_header("X-Client", "mobile");

        assert_eq!(descriptor.headers, vec![("X-Client".to_string(), "mobile".to_string())]);
    }
}

//! Client configuration
//!
//! Configuration for the request pipeline. The base URL is optional by
//! design: its absence is a configuration error surfaced at request
//! time, distinct from any network failure.

use std::time::Duration;

/// Configuration for the API client pipeline
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL the relative request paths are joined onto
    /// (e.g. "https://api.ramble.example/v1"). `None` means
    /// unconfigured; every request then fails with a config error.
    pub base_url: Option<String>,
    /// Active locale, sent as `Accept-Language` on every request
    pub locale: String,
    /// Maximum number of retries after the initial attempt
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries
    pub base_backoff: Duration,
    /// Timeout applied to each attempt inside the retry loop
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            locale: "en".to_string(),
            max_retries: 3,
            base_backoff: Duration::from_millis(200),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    /// Configuration pointing at the given base URL, defaults elsewhere.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: Some(base_url.into()), ..Self::default() }
    }

    /// Build configuration from `RAMBLE_API_*` environment variables.
    ///
    /// Recognized variables: `RAMBLE_API_BASE_URL`, `RAMBLE_API_LOCALE`,
    /// `RAMBLE_API_MAX_RETRIES`. Unset or unparsable values fall back
    /// to defaults; a missing base URL stays `None` and surfaces later
    /// as a config error.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("RAMBLE_API_BASE_URL") {
            if !url.is_empty() {
                config.base_url = Some(url);
            }
        }
        if let Ok(locale) = std::env::var("RAMBLE_API_LOCALE") {
            if !locale.is_empty() {
                config.locale = locale;
            }
        }
        if let Some(retries) =
            std::env::var("RAMBLE_API_MAX_RETRIES").ok().and_then(|v| v.parse().ok())
        {
            config.max_retries = retries;
        }

        config
    }

    /// Set the locale used for the `Accept-Language` header.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the retry bound (retries after the initial attempt).
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base backoff delay between retries.
    #[must_use]
    pub fn with_base_backoff(mut self, base_backoff: Duration) -> Self {
        self.base_backoff = base_backoff;
        self
    }

    /// Set the per-attempt timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

//! Retry layer: bounded attempts with exponential backoff
//!
//! Outermost layer of the pipeline. Re-issues requests that failed at
//! the transport level or with a 5xx status, up to the configured
//! bound; everything else is terminal on the first attempt. Auth
//! expiry never reaches this layer as a retryable condition - the
//! coordinator below either recovered it or made it terminal.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use tracing::{debug, warn};

use crate::errors::ApiError;
use crate::reauth::ReauthCoordinator;
use crate::request::RequestDescriptor;

/// Bounded-retry driver over the reauthentication coordinator
#[derive(Clone)]
pub struct RetryDriver {
    coordinator: ReauthCoordinator,
    max_retries: u32,
    base_backoff: Duration,
    attempt_timeout: Duration,
}

impl RetryDriver {
    /// Create a driver with the given retry bound, backoff base, and
    /// per-attempt timeout.
    #[must_use]
    pub fn new(
        coordinator: ReauthCoordinator,
        max_retries: u32,
        base_backoff: Duration,
        attempt_timeout: Duration,
    ) -> Self {
        Self { coordinator, max_retries, base_backoff, attempt_timeout }
    }

    /// Execute with up to `max_retries` retries after the initial
    /// attempt.
    ///
    /// Each attempt runs under the per-attempt timeout; an attempt that
    /// exceeds it counts as a transport-class failure and consumes one
    /// retry like any other, so a slow backend does not exhaust the
    /// whole call on its first attempt.
    ///
    /// Retryable: transport failures (timeouts included) and 5xx
    /// responses. Terminal on first occurrence: configuration errors,
    /// auth expiry, and 4xx responses other than 401. An exhausted 5xx
    /// surfaces as [`ApiError::Server`].
    ///
    /// # Errors
    /// Returns the terminal [`ApiError`] described above.
    pub async fn execute_with_retry(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<Response, ApiError> {
        let attempts = self.max_retries.saturating_add(1);

        for attempt in 1..=attempts {
            if attempt > 1 {
                self.sleep_with_backoff(attempt - 1).await;
            }

            debug!(path = %descriptor.path, attempt, attempts, "executing request");

            let attempt_result =
                match tokio::time::timeout(self.attempt_timeout, self.coordinator.execute(descriptor))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(ApiError::Timeout(self.attempt_timeout)),
                };

            match attempt_result {
                Ok(response) => {
                    let status = response.status();

                    if status.is_server_error() {
                        if attempt < attempts {
                            warn!(path = %descriptor.path, %status, attempt, "server error, retrying");
                            continue;
                        }
                        return Err(Self::terminal_status_error(response).await);
                    }

                    // A 401 here means the coordinator's replay was
                    // itself rejected; no further recovery exists.
                    if status == StatusCode::UNAUTHORIZED {
                        return Err(ApiError::AuthExpired);
                    }

                    if status.is_client_error() {
                        return Err(Self::terminal_status_error(response).await);
                    }

                    return Ok(response);
                }
                Err(err) if err.should_retry() && attempt < attempts => {
                    warn!(path = %descriptor.path, error = %err, attempt, "request failed, retrying");
                }
                Err(err) => return Err(err),
            }
        }

        // The loop always returns; attempts is at least 1.
        Err(ApiError::Transport("retry loop exhausted without a result".to_string()))
    }

    async fn terminal_status_error(response: Response) -> ApiError {
        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        ApiError::from_status(status, &url, body)
    }

    fn backoff_delay(&self, retry_number: u32) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8);
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    async fn sleep_with_backoff(&self, retry_number: u32) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

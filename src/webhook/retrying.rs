//! HTTP client decorator that retries transient failures.

use crate::time::{Sleeper, TokioSleeper};

use super::{HttpClient, HttpError, HttpRequest, HttpResponse, RetryPolicy};

/// An [`HttpClient`] that retries transient failures of an inner client.
///
/// Transport errors and responses are classified with [`IsRetryable`].
/// Retryable outcomes are re-sent after a backoff delay computed by the
/// [`RetryPolicy`]; anything else is handed back immediately.
///
/// When the last attempt still fails, its outcome is returned unchanged:
/// the final [`HttpError`], or the final response for retryable statuses.
///
/// # Type Parameters
///
/// - `H`: The wrapped HTTP client
/// - `S`: The sleeper used for backoff delays (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```
/// use slack_notify::webhook::{ReqwestClient, RetryPolicy, RetryingClient};
///
/// let client = RetryingClient::new(ReqwestClient::new())
///     .with_retry_policy(RetryPolicy::new().with_max_attempts(5));
/// assert_eq!(client.retry_policy().max_attempts, 5);
/// ```
#[derive(Debug, Clone)]
pub struct RetryingClient<H, S = TokioSleeper> {
    inner: H,
    sleeper: S,
    policy: RetryPolicy,
}

impl<H> RetryingClient<H, TokioSleeper> {
    /// Wraps `inner` with the default retry policy and [`TokioSleeper`].
    #[must_use]
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            sleeper: TokioSleeper,
            policy: RetryPolicy::default(),
        }
    }
}

impl<H, S> RetryingClient<H, S> {
    /// Replaces the sleeper used between attempts.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RetryingClient<H, S2> {
        RetryingClient {
            inner: self.inner,
            sleeper,
            policy: self.policy,
        }
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns the wrapped client.
    #[must_use]
    pub const fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: HttpClient, S: Sleeper> HttpClient for RetryingClient<H, S> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut attempt = 1;

        loop {
            let outcome = self.inner.request(req.clone()).await;

            let transient = match &outcome {
                Ok(response) => response.is_retryable(),
                Err(e) => e.is_retryable(),
            };
            if !transient || !self.policy.should_retry(attempt) {
                return outcome;
            }

            let delay = self.policy.delay_for_retry(attempt - 1);
            match &outcome {
                Ok(response) => tracing::warn!(
                    attempt,
                    status = %response.status,
                    ?delay,
                    "Webhook returned a transient status, retrying"
                ),
                Err(e) => tracing::warn!(
                    attempt,
                    error = %e,
                    ?delay,
                    "Webhook request failed, retrying"
                ),
            }

            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Extension trait for checking if an outcome is worth retrying.
pub trait IsRetryable {
    /// Returns true if the outcome is potentially transient.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for HttpError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout => true,
            // Bad URLs are configuration issues; a half-read body means
            // the server already accepted the request.
            Self::InvalidUrl(_) | Self::Body(_) => false,
        }
    }
}

impl IsRetryable for HttpResponse {
    fn is_retryable(&self) -> bool {
        self.status.is_server_error()
            || self.status == http::StatusCode::TOO_MANY_REQUESTS
            || self.status == http::StatusCode::REQUEST_TIMEOUT
    }
}

//! Tests for `RetryingClient` and `IsRetryable`.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{
    HttpClient, HttpError, HttpRequest, HttpResponse, IsRetryable, RetryPolicy, RetryingClient,
};
use crate::time::{InstantSleeper, Sleeper};

/// Mock HTTP client that plays back a scripted sequence of outcomes.
#[derive(Debug)]
struct ScriptedClient {
    outcomes: Mutex<Vec<Result<HttpResponse, HttpError>>>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    fn new(outcomes: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HttpClient for ScriptedClient {
    async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes.lock().unwrap().remove(0)
    }
}

/// Sleeper that records requested delays instead of waiting.
#[derive(Debug, Default)]
struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl Sleeper for &RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

fn ok() -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse::with_text(http::StatusCode::OK, "ok"))
}

fn status(code: http::StatusCode) -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse::with_text(code, "upstream trouble"))
}

fn refused() -> Result<HttpResponse, HttpError> {
    Err(HttpError::Connection(Box::new(std::io::Error::other(
        "connection refused",
    ))))
}

fn request() -> HttpRequest {
    HttpRequest::post(url::Url::parse("https://hooks.example.com/services/x").unwrap())
}

fn retrying(client: ScriptedClient, attempts: u32) -> RetryingClient<ScriptedClient, InstantSleeper> {
    RetryingClient::new(client)
        .with_sleeper(InstantSleeper)
        .with_retry_policy(RetryPolicy::new().with_max_attempts(attempts))
}

mod retry_loop {
    use super::*;

    #[tokio::test]
    async fn first_success_makes_one_call() {
        let client = retrying(ScriptedClient::new(vec![ok()]), 3);

        let resp = client.request(request()).await.unwrap();

        assert_eq!(resp.body_text(), Some("ok"));
        assert_eq!(client.inner().calls(), 1);
    }

    #[tokio::test]
    async fn transient_errors_are_retried_until_success() {
        let client = retrying(
            ScriptedClient::new(vec![Err(HttpError::Timeout), refused(), ok()]),
            3,
        );

        let resp = client.request(request()).await.unwrap();

        assert_eq!(resp.status, http::StatusCode::OK);
        assert_eq!(client.inner().calls(), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_return_last_error_unchanged() {
        let client = retrying(
            ScriptedClient::new(vec![Err(HttpError::Timeout), refused()]),
            2,
        );

        let err = client.request(request()).await.unwrap_err();

        match err {
            HttpError::Connection(source) => {
                assert!(source.to_string().contains("connection refused"));
            }
            other => panic!("Expected connection error, got {other:?}"),
        }
        assert_eq!(client.inner().calls(), 2);
    }

    #[tokio::test]
    async fn invalid_url_is_not_retried() {
        let client = retrying(
            ScriptedClient::new(vec![Err(HttpError::InvalidUrl("bad".to_string())), ok()]),
            3,
        );

        let result = client.request(request()).await;

        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
        assert_eq!(client.inner().calls(), 1);
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let client = retrying(
            ScriptedClient::new(vec![
                status(http::StatusCode::SERVICE_UNAVAILABLE),
                status(http::StatusCode::TOO_MANY_REQUESTS),
                ok(),
            ]),
            3,
        );

        let resp = client.request(request()).await.unwrap();

        assert_eq!(resp.status, http::StatusCode::OK);
        assert_eq!(client.inner().calls(), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_return_last_response() {
        let client = retrying(
            ScriptedClient::new(vec![
                status(http::StatusCode::BAD_GATEWAY),
                status(http::StatusCode::INTERNAL_SERVER_ERROR),
            ]),
            2,
        );

        let resp = client.request(request()).await.unwrap();

        assert_eq!(resp.status, http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn client_errors_are_returned_immediately() {
        let client = retrying(
            ScriptedClient::new(vec![status(http::StatusCode::NOT_FOUND), ok()]),
            3,
        );

        let resp = client.request(request()).await.unwrap();

        assert_eq!(resp.status, http::StatusCode::NOT_FOUND);
        assert_eq!(client.inner().calls(), 1);
    }

    #[tokio::test]
    async fn backoff_delays_follow_policy() {
        let sleeper = RecordingSleeper::default();
        let client = RetryingClient::new(ScriptedClient::new(vec![
            Err(HttpError::Timeout),
            Err(HttpError::Timeout),
            Err(HttpError::Timeout),
        ]))
        .with_sleeper(&sleeper)
        .with_retry_policy(
            RetryPolicy::new()
                .with_max_attempts(3)
                .with_initial_delay(Duration::from_millis(100))
                .with_multiplier(2.0),
        );

        let _ = client.request(request()).await;

        // No sleep after the final attempt.
        assert_eq!(
            *sleeper.delays.lock().unwrap(),
            vec![Duration::from_millis(100), Duration::from_millis(200)]
        );
    }
}

mod classification {
    use super::*;

    #[test]
    fn transport_errors() {
        assert!(HttpError::Timeout.is_retryable());
        assert!(refused().unwrap_err().is_retryable());
        assert!(!HttpError::InvalidUrl("x".to_string()).is_retryable());
        assert!(!HttpError::Body(Box::new(std::io::Error::other("reset"))).is_retryable());
    }

    #[test]
    fn response_statuses() {
        let retryable = [
            http::StatusCode::INTERNAL_SERVER_ERROR,
            http::StatusCode::BAD_GATEWAY,
            http::StatusCode::TOO_MANY_REQUESTS,
            http::StatusCode::REQUEST_TIMEOUT,
        ];
        for code in retryable {
            assert!(status(code).unwrap().is_retryable(), "{code} should retry");
        }

        let terminal = [
            http::StatusCode::OK,
            http::StatusCode::BAD_REQUEST,
            http::StatusCode::FORBIDDEN,
            http::StatusCode::NOT_FOUND,
        ];
        for code in terminal {
            assert!(!status(code).unwrap().is_retryable(), "{code} should not retry");
        }
    }
}

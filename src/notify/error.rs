//! Error types for notification delivery.

use thiserror::Error;

use crate::webhook::HttpError;

/// Error returned by [`NotificationClient`] operations.
///
/// Each variant names the stage that failed, so callers can tell a bad
/// configuration from a network problem from a webhook that refused the post.
///
/// [`NotificationClient`]: super::NotificationClient
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The message could not be encoded as JSON.
    #[error("Failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The webhook URL could not be turned into a request target.
    #[error("Invalid webhook URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as configured
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The transport failed, after its own retries, or the response body
    /// could not be read.
    #[error("Webhook delivery failed: {0}")]
    Transport(#[from] HttpError),

    /// The webhook answered, but not with the success acknowledgment.
    #[error("Webhook rejected the message (status {status}): {body}")]
    Rejected {
        /// HTTP status of the final response
        status: http::StatusCode,
        /// Response body, lossily decoded
        body: String,
    },

    /// The runtime driving blocking sends could not be created.
    #[error("Failed to start notification runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl NotifyError {
    /// Returns true for failures caused by the webhook's answer rather than
    /// by the local side or the network.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

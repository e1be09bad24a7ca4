//! Blocking notification client.

use std::fmt;
use std::time::Duration;

use http::header::{CONTENT_TYPE, HeaderValue};
use url::Url;

use crate::time::{Clock, SystemClock};
use crate::webhook::{HttpClient, HttpRequest, HttpResponse, ReqwestClient, RetryPolicy, RetryingClient};

use super::{Attachment, DEFAULT_ICON, JobNotification, NotifyError, OutboundMessage, Severity};

/// Timeout applied to each request when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Body an incoming webhook answers with once it accepted a message.
pub const SUCCESS_MARKER: &str = "ok";

/// Transport used by [`NotificationClientBuilder::build`].
pub type DefaultTransport = RetryingClient<ReqwestClient>;

/// Client for posting notifications to one incoming webhook.
///
/// Built once through [`NotificationClient::builder`] and reused. All sends
/// block the calling thread until the webhook answered or the transport gave
/// up; the client drives its async transport on a small runtime it owns.
/// Sends must therefore not be issued from inside another async runtime.
///
/// Sending never mutates the client, so one instance can be shared across
/// threads.
///
/// # Example
///
/// ```no_run
/// use slack_notify::notify::NotificationClient;
///
/// # fn main() -> Result<(), slack_notify::notify::NotifyError> {
/// let client = NotificationClient::builder("https://hooks.slack.com/services/T0/B0/XXXX")
///     .username("deploy-bot")
///     .channel("#ops")
///     .build()?;
///
/// client.send_info("release 1.4.2 rolled out", None)?;
/// client.send_error("disk full on db-2", Some(":rotating_light:"))?;
/// # Ok(())
/// # }
/// ```
pub struct NotificationClient<H = DefaultTransport> {
    transport: H,
    clock: Box<dyn Clock>,
    runtime: tokio::runtime::Runtime,
    webhook_url: String,
    username: String,
    channel: String,
    timeout: Duration,
}

impl NotificationClient {
    /// Starts configuring a client for the given webhook URL.
    #[must_use]
    pub fn builder(webhook_url: impl Into<String>) -> NotificationClientBuilder {
        NotificationClientBuilder::new(webhook_url)
    }
}

impl<H> NotificationClient<H> {
    /// Returns the configured webhook URL.
    #[must_use]
    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    /// Returns the default display name; empty when unset.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the default channel; empty when unset.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Returns the per-request timeout, with the default already applied.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &H {
        &self.transport
    }

    fn message(&self, text: &str, icon_emoji: &str) -> OutboundMessage {
        OutboundMessage {
            username: self.username.clone(),
            icon_emoji: icon_emoji.to_string(),
            channel: self.channel.clone(),
            text: text.to_string(),
            attachments: Vec::new(),
        }
    }
}

impl<H: HttpClient> NotificationClient<H> {
    /// Posts a plain message without attachments.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if delivery fails at any stage.
    pub fn send_simple(&self, text: &str, icon_emoji: &str) -> Result<(), NotifyError> {
        self.send_message(&self.message(text, icon_emoji))
    }

    /// Posts a message carrying one colored attachment stamped with the
    /// current time. `job.text` becomes the top-level message text.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if delivery fails at any stage.
    pub fn send_job_notification(&self, job: &JobNotification) -> Result<(), NotifyError> {
        let attachment = Attachment::new(job.color.as_str(), job.details.as_str())
            .with_timestamp(self.clock.unix_seconds());
        let message = self
            .message(&job.text, &job.icon_emoji)
            .with_attachment(attachment);

        self.send_message(&message)
    }

    /// Posts `message` as an attachment colored for `severity`.
    ///
    /// The icon defaults to [`DEFAULT_ICON`] unless `icon` overrides it.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if delivery fails at any stage.
    pub fn send_severity(
        &self,
        severity: Severity,
        message: &str,
        icon: Option<&str>,
    ) -> Result<(), NotifyError> {
        let job = JobNotification::new(severity.color(), message)
            .with_icon_emoji(icon.unwrap_or(DEFAULT_ICON));
        self.send_job_notification(&job)
    }

    /// Posts an error-level (`danger`) notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if delivery fails at any stage.
    pub fn send_error(&self, message: &str, icon: Option<&str>) -> Result<(), NotifyError> {
        self.send_severity(Severity::Error, message, icon)
    }

    /// Posts an info-level (`good`) notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if delivery fails at any stage.
    pub fn send_info(&self, message: &str, icon: Option<&str>) -> Result<(), NotifyError> {
        self.send_severity(Severity::Info, message, icon)
    }

    /// Posts a warning-level (`warning`) notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if delivery fails at any stage.
    pub fn send_warning(&self, message: &str, icon: Option<&str>) -> Result<(), NotifyError> {
        self.send_severity(Severity::Warning, message, icon)
    }

    /// Posts a caller-built message as-is.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if:
    /// - the message cannot be serialized ([`NotifyError::Serialize`])
    /// - the webhook URL is not a usable HTTP(S) URL ([`NotifyError::InvalidUrl`])
    /// - the transport fails after its retries ([`NotifyError::Transport`])
    /// - the webhook does not answer `ok` ([`NotifyError::Rejected`])
    pub fn send_message(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        self.runtime.block_on(self.deliver(message))
    }

    async fn deliver(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        let body = serde_json::to_vec(message)?;
        let url = self.parse_url()?;

        let request = HttpRequest::post(url)
            .with_body(body)
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_timeout(self.timeout);

        tracing::debug!(
            channel = %message.channel,
            attachments = message.attachments.len(),
            "Posting notification"
        );

        let response = self.transport.request(request).await?;
        check_acknowledgment(&response)?;

        tracing::debug!(status = %response.status, "Notification delivered");
        Ok(())
    }

    fn parse_url(&self) -> Result<Url, NotifyError> {
        let invalid = |reason: String| NotifyError::InvalidUrl {
            url: self.webhook_url.clone(),
            reason,
        };

        let url = Url::parse(&self.webhook_url).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }
}

fn check_acknowledgment(response: &HttpResponse) -> Result<(), NotifyError> {
    if response.body_text() == Some(SUCCESS_MARKER) {
        return Ok(());
    }

    let body = String::from_utf8_lossy(&response.body).into_owned();
    tracing::warn!(status = %response.status, %body, "Webhook did not acknowledge notification");

    Err(NotifyError::Rejected {
        status: response.status,
        body,
    })
}

/// Webhook URL with the secret path cut off, for diagnostics.
fn redacted(webhook_url: &str) -> String {
    match Url::parse(webhook_url) {
        Ok(url) => format!("{}://{}/…", url.scheme(), url.host_str().unwrap_or("?")),
        Err(_) => "<invalid>".to_string(),
    }
}

impl<H: fmt::Debug> fmt::Debug for NotificationClient<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationClient")
            .field("webhook_url", &redacted(&self.webhook_url))
            .field("username", &self.username)
            .field("channel", &self.channel)
            .field("timeout", &self.timeout)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

/// Builder for [`NotificationClient`].
///
/// Everything except the URL is optional. The timeout default is resolved
/// here, once, so a built client never changes afterwards.
pub struct NotificationClientBuilder {
    webhook_url: String,
    username: String,
    channel: String,
    timeout: Option<Duration>,
    retry_policy: RetryPolicy,
    clock: Box<dyn Clock>,
}

impl NotificationClientBuilder {
    fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            username: String::new(),
            channel: String::new(),
            timeout: None,
            retry_policy: RetryPolicy::default(),
            clock: Box::new(SystemClock),
        }
    }

    /// Sets the display name used for every message.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Sets the channel used for every message.
    #[must_use]
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Sets the per-request timeout. Zero means [`DEFAULT_TIMEOUT`].
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the retry policy of the default transport.
    ///
    /// Ignored by [`build_with_transport`](Self::build_with_transport),
    /// where retries are the supplied transport's business.
    #[must_use]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets the clock used to timestamp attachments.
    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Builds a client that posts through reqwest with retries.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Runtime`] if the internal runtime cannot start.
    pub fn build(self) -> Result<NotificationClient, NotifyError> {
        let transport =
            RetryingClient::new(ReqwestClient::new()).with_retry_policy(self.retry_policy.clone());
        self.build_with_transport(transport)
    }

    /// Builds a client that posts through `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Runtime`] if the internal runtime cannot start.
    pub fn build_with_transport<H: HttpClient>(
        self,
        transport: H,
    ) -> Result<NotificationClient<H>, NotifyError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("slack-notify")
            .enable_all()
            .build()
            .map_err(NotifyError::Runtime)?;

        let timeout = match self.timeout {
            Some(timeout) if !timeout.is_zero() => timeout,
            _ => DEFAULT_TIMEOUT,
        };

        Ok(NotificationClient {
            transport,
            clock: self.clock,
            runtime,
            webhook_url: self.webhook_url,
            username: self.username,
            channel: self.channel,
            timeout,
        })
    }
}

impl fmt::Debug for NotificationClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationClientBuilder")
            .field("webhook_url", &redacted(&self.webhook_url))
            .field("username", &self.username)
            .field("channel", &self.channel)
            .field("timeout", &self.timeout)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

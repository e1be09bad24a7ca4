//! Wire payload for incoming-webhook messages.
//!
//! Every field is skipped during serialization when empty, so a message only
//! carries what the caller set. No `null` placeholders reach the wire.

use serde::Serialize;

/// Icon used by the severity helpers when the caller does not override it.
pub const DEFAULT_ICON: &str = ":hammer_and_wrench:";

/// Logical severity of a notification.
///
/// Each level maps to one of the chat service's named attachment colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Informational, rendered green.
    Info,
    /// Needs attention, rendered yellow.
    Warning,
    /// Failure, rendered red.
    Error,
}

impl Severity {
    /// Attachment color for this severity.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Info => "good",
            Self::Warning => "warning",
            Self::Error => "danger",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// A message posted to an incoming webhook.
///
/// # Example
///
/// ```
/// use slack_notify::notify::{Attachment, OutboundMessage};
///
/// let message = OutboundMessage::new("deploy finished")
///     .with_channel("#ops")
///     .with_attachment(Attachment::new("good", "all 12 hosts updated"));
///
/// let json = serde_json::to_value(&message).unwrap();
/// assert_eq!(json["channel"], "#ops");
/// assert!(json.get("username").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    /// Display name shown as the sender.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,

    /// Emoji shortcode used as the sender's avatar, e.g. `:bell:`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon_emoji: String,

    /// Channel override; the webhook's own channel is used when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub channel: String,

    /// Primary message text.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,

    /// Attachments in display order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl OutboundMessage {
    /// Creates a message with the given text and nothing else set.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Sets the icon emoji.
    #[must_use]
    pub fn with_icon_emoji(mut self, icon_emoji: impl Into<String>) -> Self {
        self.icon_emoji = icon_emoji.into();
        self
    }

    /// Sets the target channel.
    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Appends an attachment after any already present.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// A colored block inside a message, typically one event or job report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// `good`, `warning`, `danger` or a hex color such as `#439FE0`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub color: String,

    /// Plain-text summary for clients that cannot render attachments.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fallback: String,

    /// Author, title, link and media fields; all optional.
    #[serde(flatten)]
    pub meta: AttachmentMeta,

    /// Body text of the attachment.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,

    /// Event time in Unix seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<u64>,
}

impl Attachment {
    /// Creates an attachment with the given color and body text.
    #[must_use]
    pub fn new(color: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Sets the fallback text.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Sets the timestamp in Unix seconds.
    #[must_use]
    pub const fn with_timestamp(mut self, unix_seconds: u64) -> Self {
        self.ts = Some(unix_seconds);
        self
    }

    /// Replaces the metadata block.
    #[must_use]
    pub fn with_meta(mut self, meta: AttachmentMeta) -> Self {
        self.meta = meta;
        self
    }
}

/// Optional attachment fields beyond color, text and timestamp.
///
/// Serialized inline with the owning [`Attachment`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttachmentMeta {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub callback_id: String,

    #[serde(skip_serializing_if = "is_zero")]
    pub id: i64,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_id: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_subname: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_link: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_icon: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub title_link: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub pretext: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub image_url: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub thumb_url: String,

    /// Names of fields whose text is rendered as markdown.
    #[serde(rename = "mrkdwn_in", skip_serializing_if = "Vec::is_empty")]
    pub markdown_in: Vec<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // signature required by serde
const fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// Inputs for a job notification: one colored attachment plus summary text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobNotification {
    /// Attachment color.
    pub color: String,
    /// Sender icon for this message.
    pub icon_emoji: String,
    /// Attachment body.
    pub details: String,
    /// Top-level message text; may be empty.
    pub text: String,
}

impl JobNotification {
    /// Creates a job notification with the given color and details.
    #[must_use]
    pub fn new(color: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            details: details.into(),
            ..Self::default()
        }
    }

    /// Sets the icon emoji.
    #[must_use]
    pub fn with_icon_emoji(mut self, icon_emoji: impl Into<String>) -> Self {
        self.icon_emoji = icon_emoji.into();
        self
    }

    /// Sets the summary text shown above the attachment.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

//! Notification messages and the client that posts them.
//!
//! - [`NotificationClient`] sends plain, job and severity-tagged messages
//! - [`OutboundMessage`], [`Attachment`] and [`AttachmentMeta`] form the wire payload
//! - [`Severity`] maps info/warning/error onto attachment colors
//! - [`NotifyError`] reports which delivery stage failed

mod client;
mod error;
mod message;

#[cfg(test)]
mod message_tests;

pub use client::{
    DEFAULT_TIMEOUT, DefaultTransport, NotificationClient, NotificationClientBuilder,
    SUCCESS_MARKER,
};
pub use error::NotifyError;
pub use message::{Attachment, AttachmentMeta, DEFAULT_ICON, JobNotification, OutboundMessage, Severity};

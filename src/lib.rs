//! slack-notify: incoming-webhook notifications with retry
//!
//! A library for posting formatted messages, optionally with a colored
//! severity attachment, to Slack-compatible incoming webhooks.

pub mod config;
pub mod notify;
pub mod time;
pub mod webhook;

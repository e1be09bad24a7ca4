//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// slack-notify: post notifications to an incoming webhook
///
/// Sends one message per invocation, retrying transient failures.
#[derive(Debug, Parser)]
#[command(name = "slack-notify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Message to send
    #[command(subcommand)]
    pub command: Command,

    /// Incoming-webhook URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Display name for the sender
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Channel override, e.g. '#ops'
    #[arg(long, global = true)]
    pub channel: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Maximum number of attempts
    #[arg(long = "retry-max", global = true)]
    pub retry_max: Option<u32>,

    /// Initial retry delay in seconds
    #[arg(long = "retry-delay", global = true)]
    pub retry_delay: Option<u64>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for slack-notify
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Send a plain text message
    Send {
        /// Message text
        text: String,
        /// Icon emoji, e.g. ':rocket:'
        #[arg(long)]
        icon: Option<String>,
    },

    /// Send a job report as a colored attachment
    Job {
        /// Attachment body
        details: String,
        /// Attachment color: good, warning, danger or a hex value
        #[arg(long, default_value = "good")]
        color: String,
        /// Icon emoji
        #[arg(long)]
        icon: Option<String>,
        /// Summary line shown above the attachment
        #[arg(long)]
        summary: Option<String>,
    },

    /// Send an info notification (green)
    Info {
        /// Notification text
        message: String,
        /// Icon emoji overriding the default
        #[arg(long)]
        icon: Option<String>,
    },

    /// Send a warning notification (yellow)
    Warning {
        /// Notification text
        message: String,
        /// Icon emoji overriding the default
        #[arg(long)]
        icon: Option<String>,
    },

    /// Send an error notification (red)
    Error {
        /// Notification text
        message: String,
        /// Icon emoji overriding the default
        #[arg(long)]
        icon: Option<String>,
    },

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "slack-notify.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}

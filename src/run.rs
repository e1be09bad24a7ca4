//! Dispatch of one CLI command to the notification client.

use slack_notify::config::{Command, ValidatedConfig};
use slack_notify::notify::{JobNotification, NotificationClient, NotifyError, Severity};
use slack_notify::webhook::HttpClient;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Builds the production client from `config` and sends `command`.
///
/// # Errors
///
/// Returns [`NotifyError`] if the client cannot start or delivery fails.
pub fn execute(config: &ValidatedConfig, command: &Command) -> Result<(), NotifyError> {
    let client = config.client_builder().build()?;
    dispatch(&client, command)
}

/// Sends the message described by `command` through `client`.
///
/// `init` sends nothing; it is handled before a client exists.
pub fn dispatch<H: HttpClient>(
    client: &NotificationClient<H>,
    command: &Command,
) -> Result<(), NotifyError> {
    let outcome = match command {
        Command::Send { text, icon } => client.send_simple(text, icon.as_deref().unwrap_or("")),
        Command::Job {
            details,
            color,
            icon,
            summary,
        } => {
            let mut job = JobNotification::new(color.as_str(), details.as_str());
            if let Some(icon) = icon {
                job = job.with_icon_emoji(icon.as_str());
            }
            if let Some(summary) = summary {
                job = job.with_text(summary.as_str());
            }
            client.send_job_notification(&job)
        }
        Command::Info { message, icon } => {
            send_level(client, Severity::Info, message, icon.as_deref())
        }
        Command::Warning { message, icon } => {
            send_level(client, Severity::Warning, message, icon.as_deref())
        }
        Command::Error { message, icon } => {
            send_level(client, Severity::Error, message, icon.as_deref())
        }
        Command::Init { .. } => return Ok(()),
    };

    outcome?;
    tracing::info!("Notification sent");
    Ok(())
}

fn send_level<H: HttpClient>(
    client: &NotificationClient<H>,
    severity: Severity,
    message: &str,
    icon: Option<&str>,
) -> Result<(), NotifyError> {
    tracing::debug!(%severity, "Sending severity notification");
    client.send_severity(severity, message, icon)
}

//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::notify::{NotificationClient, NotificationClientBuilder};
use crate::webhook::RetryPolicy;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config,
/// or [`ValidatedConfig::load`] to also locate and read the config file.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// Incoming-webhook URL (required)
    pub url: Url,

    /// Display name for the sender
    pub username: Option<String>,

    /// Channel override
    pub channel: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,

    /// Retry policy for failed requests
    pub retry_policy: RetryPolicy,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The webhook path is the credential; only the host is shown.
        write!(
            f,
            "Config {{ webhook: {}://{}/…, username: {}, channel: {}, timeout: {}s, retry: {}x/{}s }}",
            self.url.scheme(),
            self.url.host_str().unwrap_or("?"),
            self.username.as_deref().unwrap_or("-"),
            self.channel.as_deref().unwrap_or("-"),
            self.timeout.as_secs(),
            self.retry_policy.max_attempts,
            self.retry_policy.initial_delay.as_secs(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL is missing or not an HTTP(S) URL
    /// - Retry settings are out of range
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let url = Self::resolve_url(cli, toml)?;

        let username = cli
            .username
            .clone()
            .or_else(|| toml.and_then(|t| t.webhook.username.clone()))
            .filter(|s| !s.is_empty());

        let channel = cli
            .channel
            .clone()
            .or_else(|| toml.and_then(|t| t.webhook.channel.clone()))
            .filter(|s| !s.is_empty());

        let timeout = Self::resolve_timeout(cli, toml);
        let retry_policy = Self::build_retry_policy(cli, toml)?;

        Ok(Self {
            url,
            username,
            channel,
            timeout,
            retry_policy,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// The file is taken from `cli.config` when set. Otherwise the per-user
    /// config file is used if it exists; its absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = match Self::config_file(cli) {
            Some(path) => Some(TomlConfig::load(&path)?),
            None => None,
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Returns a client builder carrying this configuration.
    #[must_use]
    pub fn client_builder(&self) -> NotificationClientBuilder {
        let mut builder = NotificationClient::builder(self.url.as_str())
            .timeout(self.timeout)
            .retry_policy(self.retry_policy.clone());

        if let Some(username) = &self.username {
            builder = builder.username(username.as_str());
        }
        if let Some(channel) = &self.channel {
            builder = builder.channel(channel.as_str());
        }

        builder
    }

    fn config_file(cli: &Cli) -> Option<PathBuf> {
        if let Some(ref path) = cli.config {
            return Some(path.clone());
        }

        defaults::config_path().filter(|path| path.is_file())
    }

    fn resolve_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = cli
            .url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.url.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(field::URL, "Use --url or set webhook.url in config file")
            })?;

        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason,
        };

        let url = Url::parse(url_str).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Duration {
        // Priority: CLI explicit > TOML > default; zero selects the default,
        // as it does on the client builder.
        let seconds = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.webhook.timeout))
            .filter(|&seconds| seconds != 0)
            .unwrap_or(defaults::TIMEOUT_SECS);

        Duration::from_secs(seconds)
    }

    fn build_retry_policy(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<RetryPolicy, ConfigError> {
        let retry = toml.map(|t| &t.retry);

        // Priority: CLI explicit > TOML > default
        let max_attempts = cli
            .retry_max
            .or_else(|| retry.and_then(|r| r.max_attempts))
            .unwrap_or(defaults::RETRY_MAX_ATTEMPTS);

        let initial_delay_secs = cli
            .retry_delay
            .or_else(|| retry.and_then(|r| r.initial_delay))
            .unwrap_or(defaults::RETRY_INITIAL_DELAY_SECS);

        let max_delay_secs = retry
            .and_then(|r| r.max_delay)
            .unwrap_or(defaults::RETRY_MAX_DELAY_SECS);

        let multiplier = retry
            .and_then(|r| r.multiplier)
            .unwrap_or(defaults::RETRY_MULTIPLIER);

        if max_attempts == 0 {
            return Err(ConfigError::InvalidRetry(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if initial_delay_secs == 0 {
            return Err(ConfigError::InvalidRetry(
                "initial_delay must be greater than 0".to_string(),
            ));
        }

        if multiplier <= 0.0 || !multiplier.is_finite() {
            return Err(ConfigError::InvalidRetry(
                "multiplier must be a positive finite number".to_string(),
            ));
        }

        if max_delay_secs < initial_delay_secs {
            return Err(ConfigError::InvalidRetry(format!(
                "max_delay ({max_delay_secs}s) must be >= initial_delay ({initial_delay_secs}s)"
            )));
        }

        Ok(RetryPolicy::new()
            .with_max_attempts(max_attempts)
            .with_initial_delay(Duration::from_secs(initial_delay_secs))
            .with_max_delay(Duration::from_secs(max_delay_secs))
            .with_multiplier(multiplier))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

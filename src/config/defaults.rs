//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use crate::notify::DEFAULT_TIMEOUT;
use crate::webhook::RetryPolicy;

/// Default request timeout in seconds.
pub const TIMEOUT_SECS: u64 = DEFAULT_TIMEOUT.as_secs();

/// Default maximum number of attempts per message.
pub const RETRY_MAX_ATTEMPTS: u32 = RetryPolicy::DEFAULT_MAX_ATTEMPTS;

/// Default initial retry delay in seconds.
pub const RETRY_INITIAL_DELAY_SECS: u64 = RetryPolicy::DEFAULT_INITIAL_DELAY.as_secs();

/// Default maximum retry delay in seconds.
pub const RETRY_MAX_DELAY_SECS: u64 = RetryPolicy::DEFAULT_MAX_DELAY.as_secs();

/// Default retry backoff multiplier.
pub const RETRY_MULTIPLIER: f64 = RetryPolicy::DEFAULT_MULTIPLIER;

/// Directory under the user config dir holding the config file.
pub const CONFIG_DIR_NAME: &str = "slack-notify";

/// File name of the config file inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Location of the per-user config file, if the platform has a config dir.
#[must_use]
pub fn config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

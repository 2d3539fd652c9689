//! Configuration System
//!
//! Layered configuration for the browser: built-in defaults, a global TOML file,
//! `BUCKETBROWSER_*` environment variables, an explicit `--config` file, and finally
//! command-line flags applied by the binary.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Browser behaviour
    #[serde(default)]
    pub browser: BrowserSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Browser behaviour settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserSettings {
    /// How long to wait for the database lock, e.g. "1s", "500ms", or bare seconds
    #[serde(default = "default_open_timeout")]
    pub open_timeout: String,

    /// Open every database read-only
    #[serde(default)]
    pub read_only: bool,

    /// Hide pair values in the tree pane
    #[serde(default)]
    pub no_value: bool,

    /// How long status messages stay in the footer
    #[serde(default = "default_message_timeout_ms")]
    pub message_timeout_ms: u64,

    /// Terminal width above which the detail pane is shown beside the tree
    #[serde(default = "default_split_width")]
    pub split_width: u16,
}

fn default_open_timeout() -> String {
    "1s".to_string()
}

fn default_message_timeout_ms() -> u64 {
    2000
}

fn default_split_width() -> u16 {
    80
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            open_timeout: default_open_timeout(),
            read_only: false,
            no_value: false,
            message_timeout_ms: default_message_timeout_ms(),
            split_width: default_split_width(),
        }
    }
}

/// Parse a timeout. A bare number is seconds; anything else goes through
/// `humantime` ("250ms", "2s", "1m 30s").
pub fn parse_timeout(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(value).map_err(|e| format!("invalid duration '{}': {}", value, e))
}

impl BrowserSettings {
    pub fn open_timeout(&self) -> Result<Duration, String> {
        parse_timeout(&self.open_timeout)
    }

    pub fn message_timeout(&self) -> Duration {
        Duration::from_millis(self.message_timeout_ms)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Browser(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Browser(msg) => write!(f, "Browser: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl BrowserConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.browser.open_timeout() {
            errors.push(ValidationError::Browser(format!("open_timeout: {}", e)));
        }
        if self.browser.split_width == 0 {
            errors.push(ValidationError::Browser(
                "split_width must be greater than zero".to_string(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            errors.push(ValidationError::Logging(format!(
                "format must be 'text' or 'json', got '{}'",
                self.logging.format
            )));
        }
        if !matches!(self.logging.output.as_str(), "file" | "stderr") {
            errors.push(ValidationError::Logging(format!(
                "output must be 'file' or 'stderr', got '{}'",
                self.logging.output
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

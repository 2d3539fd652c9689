//! Logging System
//!
//! Structured logging built on `tracing`. The terminal belongs to the browser while
//! it runs, so logs default to a file under the user's data directory and stay off
//! unless enabled by configuration or `--verbose`.

use crate::error::BrowserError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding a full `EnvFilter` directive string.
pub const LOG_ENV: &str = "BUCKETBROWSER_LOG";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Master switch
    #[serde(default)]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: file, stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (if output is "file")
    #[serde(default = "default_log_file")]
    pub file: PathBuf,

    /// Enable colored output (text format on stderr only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "file".to_string()
}

/// `$XDG_DATA_HOME/bucketbrowser/bucketbrowser.log`, or the working directory when
/// no home directory can be determined.
pub fn default_log_file() -> PathBuf {
    ProjectDirs::from("", "", "bucketbrowser")
        .map(|dirs| dirs.data_dir().join("bucketbrowser.log"))
        .unwrap_or_else(|| PathBuf::from("bucketbrowser.log"))
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: default_log_file(),
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Stderr,
    File,
}

fn parse_output(output: &str) -> Result<Output, BrowserError> {
    match output {
        "stderr" => Ok(Output::Stderr),
        "file" => Ok(Output::File),
        _ => Err(BrowserError::Config(format!(
            "Invalid log output: {} (must be 'stderr' or 'file')",
            output
        ))),
    }
}

fn parse_format(format: &str) -> Result<bool, BrowserError> {
    match format {
        "json" => Ok(true),
        "text" => Ok(false),
        _ => Err(BrowserError::Config(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        ))),
    }
}

fn open_log_file(config: &LoggingConfig) -> Result<File, BrowserError> {
    if let Some(parent) = config.file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| BrowserError::Config(format!("Failed to create log directory: {}", e)))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .map_err(|e| {
            BrowserError::Config(format!("Failed to open log file {:?}: {}", config.file, e))
        })
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. `BUCKETBROWSER_LOG` filter directives
/// 2. The given configuration (already merged from CLI, env and files)
/// 3. Defaults
///
/// A disabled configuration installs nothing.
pub fn init_logging(config: &LoggingConfig) -> Result<(), BrowserError> {
    if !config.enabled {
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let json = parse_format(&config.format)?;
    let output = parse_output(&config.output)?;

    let (writer, ansi) = match output {
        Output::File => {
            let file = open_log_file(config)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        Output::Stderr => (BoxMakeWriter::new(std::io::stderr), config.color),
    };

    let base_subscriber = Registry::default().with(filter);
    let result = if json {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init()
    };

    result.map_err(|e| BrowserError::Config(format!("Failed to install logger: {}", e)))
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, BrowserError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(&config.level);
    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| BrowserError::Config(format!("Invalid log directive: {}", e)))?,
        );
    }

    Ok(filter)
}

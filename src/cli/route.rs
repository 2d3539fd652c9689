//! CLI route: resolves configuration for a run and browses each database.

use crate::cli::parse::Cli;
use crate::config::{BrowserConfig, ConfigLoader};
use crate::error::BrowserError;
use crate::session::Session;
use crate::tui;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Runtime context for CLI execution: the merged configuration with command-line
/// flags applied last.
pub struct RunContext {
    config: BrowserConfig,
    open_timeout: Duration,
}

impl RunContext {
    /// Load configuration from every source and apply the flags in `cli`.
    pub fn new(cli: &Cli) -> Result<Self, BrowserError> {
        let config = ConfigLoader::load(cli.config.as_deref())?;
        Self::from_config(config, cli)
    }

    /// Apply the flags in `cli` over an already loaded configuration.
    pub fn from_config(mut config: BrowserConfig, cli: &Cli) -> Result<Self, BrowserError> {
        if cli.read_only {
            config.browser.read_only = true;
        }
        if cli.no_value {
            config.browser.no_value = true;
        }
        if let Some(timeout) = cli.timeout {
            config.browser.open_timeout = humantime::format_duration(timeout).to_string();
        }

        config.validate().map_err(|errors| {
            BrowserError::Config(
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;
        let open_timeout = config
            .browser
            .open_timeout()
            .map_err(BrowserError::Config)?;

        debug!(
            read_only = config.browser.read_only,
            no_value = config.browser.no_value,
            timeout = %humantime::format_duration(open_timeout),
            "Run context resolved"
        );
        Ok(Self {
            config,
            open_timeout,
        })
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn open_timeout(&self) -> Duration {
        self.open_timeout
    }

    /// Open `file` with the configured timeout and access mode.
    pub fn open(&self, file: &Path) -> Result<Session, BrowserError> {
        info!(file = %file.display(), "Opening database");
        Session::open(file, self.open_timeout, self.config.browser.read_only)
    }

    /// Hand the terminal to the browser until the user quits.
    pub fn browse(&self, session: Session) -> Result<(), BrowserError> {
        tui::run(session, &self.config.browser)
    }
}

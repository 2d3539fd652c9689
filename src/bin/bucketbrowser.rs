//! bucketbrowser binary
//!
//! Browses each database named on the command line, one after another.

use anyhow::Context;
use bucketbrowser::cli::{map_error, map_open_error, Cli, RunContext};
use bucketbrowser::logging::{init_logging, LoggingConfig};
use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let context = RunContext::new(cli)
        .map_err(|e| anyhow::anyhow!(map_error(&e)))
        .context("failed to load configuration")?;

    let logging_config = build_logging_config(cli, &context.config().logging);
    init_logging(&logging_config)
        .map_err(|e| anyhow::anyhow!(map_error(&e)))
        .context("failed to initialize logging")?;

    info!(files = cli.files.len(), "bucketbrowser starting");

    for file in &cli.files {
        let session = match context.open(file) {
            Ok(session) => session,
            Err(e) => {
                error!(file = %file.display(), error = %e, "Failed to open database");
                eprintln!("{}", map_open_error(file, &e));
                process::exit(1);
            }
        };
        context
            .browse(session)
            .map_err(|e| anyhow::anyhow!(map_error(&e)))
            .with_context(|| format!("browsing {} failed", file.display()))?;
    }
    Ok(())
}

/// Apply logging flags over the configured logging section.
///
/// `--verbose` switches logging on; without it the configuration decides.
fn build_logging_config(cli: &Cli, configured: &LoggingConfig) -> LoggingConfig {
    let mut config = configured.clone();
    if cli.verbose {
        config.enabled = true;
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }
    config
}

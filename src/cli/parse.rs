//! CLI parse: clap types for bucketbrowser. No behavior; definitions only.

use crate::config::parse_timeout;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// bucketbrowser - browse and edit nested-bucket key/value databases
#[derive(Debug, Parser)]
#[command(name = "bucketbrowser")]
#[command(about = "Interactive terminal browser and editor for nested-bucket databases")]
#[command(version)]
pub struct Cli {
    /// Database directories to browse, one after another
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Database open timeout, e.g. "1s", "500ms" or bare seconds (default 1s)
    #[arg(long, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Open the database in read-only mode
    #[arg(long = "readonly", visible_alias = "ro")]
    pub read_only: bool,

    /// Hide pair values in the tree pane
    #[arg(long)]
    pub no_value: bool,

    /// Configuration file path (layered over the global file and environment)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (file, stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

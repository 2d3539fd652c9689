//! Error types for the bucket browser.

use crate::tree::path::PathKey;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Storage-engine errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Storage engine error: {0}")]
    Engine(#[from] sled::Error),

    #[error("Database {} is locked (gave up after {})", path.display(), humantime::format_duration(*timeout))]
    LockTimeout { path: PathBuf, timeout: Duration },

    #[error("Bucket already exists")]
    BucketExists,

    #[error("Bucket not found")]
    BucketNotFound,

    #[error("Incompatible value")]
    IncompatibleValue,

    #[error("Key required")]
    KeyRequired,

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Errors surfaced by the tree model, mutation facade and session
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Path not found: {0}")]
    PathNotFound(PathKey),

    #[error("Name '{name}' already exists at {parent}")]
    DuplicateName { parent: PathKey, name: String },

    #[error("Database is in read-only mode")]
    ReadOnly,

    #[error("Cannot insert a pair at the root")]
    CannotInsertAtRoot,

    #[error("Not a bucket: {0}")]
    NotABucket(PathKey),

    #[error("Not a pair: {0}")]
    NotAPair(PathKey),

    #[error("Empty path")]
    EmptyPath,

    #[error("Storage error: {0}")]
    Engine(#[from] StorageError),

    #[error("Export of {path} failed: {source}")]
    Export {
        path: PathKey,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl From<config::ConfigError> for BrowserError {
    fn from(err: config::ConfigError) -> Self {
        BrowserError::Config(err.to_string())
    }
}

impl BrowserError {
    /// True when the underlying engine gave up waiting for the file lock.
    pub fn is_lock_timeout(&self) -> bool {
        matches!(self, BrowserError::Engine(StorageError::LockTimeout { .. }))
    }
}

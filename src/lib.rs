//! Bucketbrowser: interactive browser and editor for nested-bucket databases
//!
//! The database is loaded into an in-memory forest of buckets and pairs. The UI
//! addresses nodes only by [`tree::PathKey`]; every edit goes through the
//! [`mutation::MutationFacade`] and is followed by a reload that carries the
//! expand/collapse state of the previous forest over.

pub mod cli;
pub mod config;
pub mod cursor;
pub mod error;
pub mod export;
pub mod format;
pub mod logging;
pub mod mutation;
pub mod session;
pub mod store;
pub mod tree;
pub mod tui;

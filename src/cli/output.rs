//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::BrowserError;
use std::path::Path;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &BrowserError) -> String {
    e.to_string()
}

/// Message printed when a database cannot be opened.
pub fn map_open_error(file: &Path, e: &BrowserError) -> String {
    if e.is_lock_timeout() {
        format!(
            "File {} is locked. Make sure it's not used by another app and try again",
            file.display()
        )
    } else {
        format!("Error reading file: {:?}", e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_lock_timeout_message() {
        let err = BrowserError::Engine(StorageError::LockTimeout {
            path: PathBuf::from("my.db"),
            timeout: Duration::from_secs(1),
        });
        assert_eq!(
            map_open_error(Path::new("my.db"), &err),
            "File my.db is locked. Make sure it's not used by another app and try again"
        );
    }

    #[test]
    fn test_other_errors_are_quoted() {
        let err = BrowserError::Config("boom".into());
        assert_eq!(
            map_open_error(Path::new("x"), &err),
            "Error reading file: \"Configuration error: boom\""
        );
    }
}

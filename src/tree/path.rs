//! Path addressing for buckets and pairs
//!
//! A [`PathKey`] is the only handle the UI holds into the forest. It names a node
//! by the sequence of bucket names leading to it, ending with the bucket name or
//! pair key of the node itself. Ordering is lexical by segment.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used when a path is rendered for humans.
pub const DISPLAY_SEPARATOR: &str = " → ";

/// Ordered sequence of segments from the forest root to a bucket or pair.
///
/// The empty path denotes the forest root itself; it never resolves to a node but
/// is a valid insertion target for root buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathKey(Vec<String>);

impl PathKey {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// The empty path (forest root).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Final segment: the bucket name or pair key the path addresses.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Path of the containing bucket. A root-level path yields the empty path;
    /// the empty path has no parent.
    pub fn parent(&self) -> Option<PathKey> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    pub fn child(&self, name: &str) -> PathKey {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    /// Same path with the final segment replaced.
    pub fn with_last(&self, name: &str) -> PathKey {
        match self.parent() {
            Some(parent) => parent.child(name),
            None => Self(vec![name.to_string()]),
        }
    }

    /// True when `prefix` names this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &PathKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn into_segments(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(root)");
        }
        write!(f, "{}", self.0.join(DISPLAY_SEPARATOR))
    }
}

impl From<Vec<String>> for PathKey {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[&str]> for PathKey {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PathKey {
    fn from(segments: [&str; N]) -> Self {
        Self(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl AsRef<[String]> for PathKey {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

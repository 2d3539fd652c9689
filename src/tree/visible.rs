//! Visible-item traversal
//!
//! Linearizes the forest into exactly the rows the tree pane draws: pre-order,
//! sub-buckets before pairs, descending only into expanded buckets, and keeping
//! only pairs whose key contains the filter. Every cursor movement is a query
//! against this sequence.

use crate::error::BrowserError;
use crate::tree::forest::{Forest, Resolved};
use crate::tree::node::NodeId;
use crate::tree::path::PathKey;

/// Direction of a multi-step cursor jump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// One drawable row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub path: PathKey,
    pub id: NodeId,
    pub depth: usize,
}

fn key_matches(key: &str, filter: &str) -> bool {
    filter.is_empty() || key.contains(filter)
}

impl Forest {
    /// Visible rows in draw order.
    pub fn visible_rows(&self, filter: &str) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        let mut prefix = Vec::new();
        for &root in self.roots() {
            self.collect_rows(root, 0, &mut prefix, filter, &mut rows);
        }
        rows
    }

    fn collect_rows(
        &self,
        id: NodeId,
        depth: usize,
        prefix: &mut Vec<String>,
        filter: &str,
        rows: &mut Vec<VisibleRow>,
    ) {
        let Some(bucket) = self.bucket(id) else {
            return;
        };
        prefix.push(bucket.name.clone());
        rows.push(VisibleRow {
            path: PathKey::new(prefix.clone()),
            id,
            depth,
        });

        if bucket.expanded {
            for &child in &bucket.buckets {
                self.collect_rows(child, depth + 1, prefix, filter, rows);
            }
            for &pair_id in &bucket.pairs {
                if let Some(pair) = self.pair(pair_id) {
                    if key_matches(&pair.key, filter) {
                        let mut segments = prefix.clone();
                        segments.push(pair.key.clone());
                        rows.push(VisibleRow {
                            path: PathKey::new(segments),
                            id: pair_id,
                            depth: depth + 1,
                        });
                    }
                }
            }
        }
        prefix.pop();
    }

    /// Paths of the visible rows, top to bottom.
    pub fn visible_paths(&self, filter: &str) -> Vec<PathKey> {
        self.visible_rows(filter)
            .into_iter()
            .map(|row| row.path)
            .collect()
    }

    /// Entry after `current`; the first entry when `current` is `None`.
    pub fn next(&self, current: Option<&PathKey>, filter: &str) -> Option<PathKey> {
        let mut paths = self.visible_paths(filter);
        match current {
            None => (!paths.is_empty()).then(|| paths.swap_remove(0)),
            Some(current) => {
                let pos = paths.iter().position(|p| p == current)?;
                (pos + 1 < paths.len()).then(|| paths.swap_remove(pos + 1))
            }
        }
    }

    /// Entry before `current`; the last entry when `current` is `None`.
    pub fn prev(&self, current: Option<&PathKey>, filter: &str) -> Option<PathKey> {
        let mut paths = self.visible_paths(filter);
        match current {
            None => paths.pop(),
            Some(current) => {
                let pos = paths.iter().position(|p| p == current)?;
                (pos > 0).then(|| paths.swap_remove(pos - 1))
            }
        }
    }

    /// Move `distance` entries from `current`, stopping at either end.
    ///
    /// A missing or invisible `current` starts from the first entry. `None` only
    /// when nothing is visible.
    pub fn jump(
        &self,
        current: Option<&PathKey>,
        filter: &str,
        distance: usize,
        direction: Direction,
    ) -> Option<PathKey> {
        let mut paths = self.visible_paths(filter);
        if paths.is_empty() {
            return None;
        }
        let start = current
            .and_then(|current| paths.iter().position(|p| p == current))
            .unwrap_or(0);
        let last = paths.len() - 1;
        let target = match direction {
            Direction::Down => start.saturating_add(distance).min(last),
            Direction::Up => start.saturating_sub(distance),
        };
        Some(paths.swap_remove(target))
    }

    /// Whether `path` is one of the visible rows.
    pub fn is_visible(&self, path: &PathKey, filter: &str) -> bool {
        self.visible_rows(filter).iter().any(|row| &row.path == path)
    }

    /// Rows contributed by the node at `path` and its visible descendants. The
    /// empty path counts the whole forest.
    pub fn visible_item_count(&self, path: &PathKey, filter: &str) -> Result<usize, BrowserError> {
        if path.is_empty() {
            return Ok(self
                .roots()
                .iter()
                .map(|&root| self.count_from(root, filter))
                .sum());
        }
        match self.resolve(path) {
            Resolved::Bucket(id, _) => Ok(self.count_from(id, filter)),
            Resolved::Pair(_, pair) => Ok(usize::from(key_matches(&pair.key, filter))),
            Resolved::NotFound => Err(BrowserError::PathNotFound(path.clone())),
        }
    }

    fn count_from(&self, id: NodeId, filter: &str) -> usize {
        let Some(bucket) = self.bucket(id) else {
            return 0;
        };
        if !bucket.expanded {
            return 1;
        }
        let pairs = bucket
            .pairs
            .iter()
            .filter_map(|&p| self.pair(p))
            .filter(|p| key_matches(&p.key, filter))
            .count();
        let buckets: usize = bucket
            .buckets
            .iter()
            .map(|&child| self.count_from(child, filter))
            .sum();
        1 + pairs + buckets
    }
}

//! Cursor placement after structural changes

use crate::tree::{Forest, PathKey};

/// Neighbours of a row captured before it is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAnchor {
    deleted: PathKey,
    hold_next: Option<PathKey>,
    hold_prev: Option<PathKey>,
}

impl DeleteAnchor {
    /// Record the visible neighbours of `path` in the forest about to change.
    pub fn capture(forest: &Forest, path: &PathKey, filter: &str) -> Self {
        Self {
            deleted: path.clone(),
            hold_next: forest.next(Some(path), filter),
            hold_prev: forest.prev(Some(path), filter),
        }
    }

    /// Pick the new cursor in the reloaded forest.
    ///
    /// Order of preference: the following row if it is a sibling, the preceding
    /// row, the deleted node's parent, the first row.
    pub fn resolve(&self, forest: &Forest, filter: &str) -> Option<PathKey> {
        let exists = |path: &PathKey| forest.resolve(path).is_found();

        if let Some(next) = &self.hold_next {
            if next.parent() == self.deleted.parent() && exists(next) {
                return Some(next.clone());
            }
        }
        if let Some(prev) = self.hold_prev.as_ref().filter(|p| exists(*p)) {
            return Some(prev.clone());
        }
        if let Some(parent) = self.deleted.parent().filter(|p| !p.is_empty() && exists(p)) {
            return Some(parent);
        }
        forest.next(None, filter)
    }
}

/// Keep `cursor` if it still names a visible row, otherwise fall back to its
/// nearest visible ancestor or the first row.
pub fn settle(forest: &Forest, cursor: Option<&PathKey>, filter: &str) -> Option<PathKey> {
    let mut candidate = cursor.cloned();
    while let Some(path) = candidate {
        if path.is_empty() {
            break;
        }
        if forest.is_visible(&path, filter) {
            return Some(path);
        }
        candidate = path.parent();
    }
    forest.next(None, filter)
}

//! Browsing session
//!
//! Owns the open store, the current forest, the active filter and the cursor for
//! one database. Every structural change goes through the mutation facade and is
//! followed by a reload and reconcile.

use crate::cursor::{self, DeleteAnchor};
use crate::error::BrowserError;
use crate::mutation::MutationFacade;
use crate::store::SledBucketStore;
use crate::tree::{reconcile, Direction, Forest, ForestBuilder, NodeId, PathKey, Resolved};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

pub struct Session {
    store: SledBucketStore,
    forest: Forest,
    read_only: bool,
    filter: String,
    cursor: Option<PathKey>,
}

impl Session {
    /// Open the database at `path` and load its forest.
    pub fn open(path: &Path, timeout: Duration, read_only: bool) -> Result<Self, BrowserError> {
        let store = SledBucketStore::open(path, timeout)?;
        Self::with_store(store, read_only)
    }

    /// Start a session over an already open store.
    pub fn with_store(store: SledBucketStore, read_only: bool) -> Result<Self, BrowserError> {
        let forest = ForestBuilder::new(&store).build()?;
        let cursor = forest.next(None, "");
        info!(
            db = %store.path().display(),
            read_only,
            roots = forest.roots().len(),
            "Session started"
        );
        Ok(Self {
            store,
            forest,
            read_only,
            filter: String::new(),
            cursor,
        })
    }

    pub fn store(&self) -> &SledBucketStore {
        &self.store
    }

    pub fn db_path(&self) -> &Path {
        self.store.path()
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn cursor(&self) -> Option<&PathKey> {
        self.cursor.as_ref()
    }

    pub fn set_cursor(&mut self, path: Option<PathKey>) {
        self.cursor = path;
    }

    pub fn mutations(&self) -> MutationFacade<'_> {
        MutationFacade::new(&self.store, self.read_only)
    }

    /// Apply a pair-key filter; a cursor on a now hidden pair moves to its bucket.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        debug!(filter = %self.filter, "Filter changed");
        self.cursor = cursor::settle(&self.forest, self.cursor.as_ref(), &self.filter);
    }

    /// Reload from the store and carry expand state over.
    #[instrument(skip(self))]
    pub fn refresh(&mut self) -> Result<(), BrowserError> {
        let fresh = ForestBuilder::new(&self.store).build()?;
        self.forest = reconcile(&fresh, &self.forest);
        self.cursor = cursor::settle(&self.forest, self.cursor.as_ref(), &self.filter);
        Ok(())
    }

    pub fn visible_paths(&self) -> Vec<PathKey> {
        self.forest.visible_paths(&self.filter)
    }

    pub fn move_down(&mut self) {
        if let Some(next) = self.forest.next(self.cursor.as_ref(), &self.filter) {
            self.cursor = Some(next);
        }
    }

    pub fn move_up(&mut self) {
        let target = match &self.cursor {
            Some(current) => self.forest.prev(Some(current), &self.filter),
            None => self.forest.next(None, &self.filter),
        };
        if let Some(prev) = target {
            self.cursor = Some(prev);
        }
    }

    pub fn jump(&mut self, distance: usize, direction: Direction) {
        if let Some(target) = self
            .forest
            .jump(self.cursor.as_ref(), &self.filter, distance, direction)
        {
            self.cursor = Some(target);
        }
    }

    pub fn move_to_top(&mut self) {
        self.cursor = self.forest.next(None, &self.filter);
    }

    pub fn move_to_bottom(&mut self) {
        self.cursor = self.forest.prev(None, &self.filter);
    }

    pub fn expand_all(&mut self) {
        self.forest.expand_all();
    }

    /// Open the bucket under the cursor. Returns false when the cursor is on a pair.
    pub fn expand_current(&mut self) -> Result<bool, BrowserError> {
        let Some(current) = self.cursor.clone() else {
            return Ok(false);
        };
        match self.forest.resolve(&current) {
            Resolved::Bucket(..) => {
                self.forest.set_expanded(&current, true)?;
                Ok(true)
            }
            Resolved::Pair(..) => Ok(false),
            Resolved::NotFound => Err(BrowserError::PathNotFound(current)),
        }
    }

    /// Close the bucket under the cursor, or move to the parent and close that.
    pub fn collapse_current(&mut self) -> Result<(), BrowserError> {
        let Some(current) = self.cursor.clone() else {
            return Ok(());
        };
        if let Resolved::Bucket(_, bucket) = self.forest.resolve(&current) {
            if bucket.expanded {
                return self.forest.set_expanded(&current, false);
            }
        }
        match current.parent() {
            Some(parent) if !parent.is_empty() => {
                self.forest.set_expanded(&parent, false)?;
                self.cursor = Some(parent);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub fn toggle(&mut self, path: &PathKey) -> Result<bool, BrowserError> {
        self.forest.toggle(path)
    }

    /// Reveal `path`: expand its parent and point the cursor at it if visible.
    fn focus_new(&mut self, parent: &PathKey, path: PathKey) -> Result<PathKey, BrowserError> {
        if !parent.is_empty() {
            self.forest.set_expanded(parent, true)?;
        }
        self.cursor = cursor::settle(&self.forest, Some(&path), &self.filter);
        Ok(path)
    }

    /// Create bucket `name` under `parent` and select it.
    pub fn insert_bucket(&mut self, parent: &PathKey, name: &str) -> Result<PathKey, BrowserError> {
        self.mutations().insert_bucket(parent, name)?;
        self.refresh()?;
        self.focus_new(parent, parent.child(name))
    }

    /// Put a pair into `parent` and select it.
    pub fn insert_pair(
        &mut self,
        parent: &PathKey,
        key: &str,
        value: &[u8],
    ) -> Result<PathKey, BrowserError> {
        self.mutations().insert_pair(parent, key, value)?;
        self.refresh()?;
        self.focus_new(parent, parent.child(key))
    }

    pub fn update_value(&mut self, path: &PathKey, value: &[u8]) -> Result<(), BrowserError> {
        self.mutations().update_value(path, value)?;
        self.refresh()
    }

    /// Rename the bucket or pair at `path`; the cursor follows it.
    ///
    /// Expanded buckets inside a renamed bucket stay expanded under the new name.
    pub fn rename(&mut self, path: &PathKey, new_name: &str) -> Result<PathKey, BrowserError> {
        let expanded = match self.forest.resolve(path) {
            Resolved::Bucket(id, _) => {
                let expanded = expanded_within(&self.forest, id);
                self.mutations().rename_bucket(path, new_name)?;
                expanded
            }
            Resolved::Pair(..) => {
                self.mutations().update_key(path, new_name)?;
                Vec::new()
            }
            Resolved::NotFound => return Err(BrowserError::PathNotFound(path.clone())),
        };

        let renamed = path.with_last(new_name);
        self.refresh()?;
        for relative in expanded {
            let mut segments = renamed.segments().to_vec();
            segments.extend(relative);
            if let Ok(id) = self.forest.bucket_at(&PathKey::new(segments)) {
                self.forest.set_expanded_by_id(id, true);
            }
        }
        self.cursor = cursor::settle(&self.forest, Some(&renamed), &self.filter);
        Ok(renamed)
    }

    /// Delete the node at `path` and move the cursor to a surviving neighbour.
    pub fn delete(&mut self, path: &PathKey) -> Result<(), BrowserError> {
        let anchor = DeleteAnchor::capture(&self.forest, path, &self.filter);
        self.mutations().delete_key(path)?;
        self.refresh()?;
        self.cursor = anchor.resolve(&self.forest, &self.filter);
        Ok(())
    }
}

/// Paths, relative to `bucket`, of every expanded bucket in its subtree (itself included).
fn expanded_within(forest: &Forest, bucket: NodeId) -> Vec<Vec<String>> {
    let mut found = Vec::new();
    let mut stack = vec![(bucket, Vec::new())];
    while let Some((id, relative)) = stack.pop() {
        let Some(current) = forest.bucket(id) else {
            continue;
        };
        if current.expanded {
            found.push(relative.clone());
        }
        for &child in &current.buckets {
            if let Some(sub) = forest.bucket(child) {
                let mut next = relative.clone();
                next.push(sub.name.clone());
                stack.push((child, next));
            }
        }
    }
    found
}

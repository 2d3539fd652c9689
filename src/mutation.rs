//! Mutation facade
//!
//! Translates path-addressed edits into store transactions. Every operation checks
//! the read-only flag before touching the store and names the first path prefix
//! that failed to resolve. The in-memory forest is never edited here; callers
//! reload afterwards.

use crate::error::{BrowserError, StorageError};
use crate::store::{BucketRead, EntryKind, SledBucketStore};
use crate::tree::path::PathKey;
use tracing::{debug, info, instrument, warn};

/// Check that every prefix of `bucket` is a bucket.
fn traverse<R: BucketRead>(tx: &R, bucket: &PathKey) -> Result<(), BrowserError> {
    let segments = bucket.segments();
    for len in 1..=segments.len() {
        let prefix = &segments[..len];
        if !tx.bucket_exists(prefix)? {
            return Err(BrowserError::PathNotFound(PathKey::new(prefix.to_vec())));
        }
    }
    Ok(())
}

/// Split a pair path into (bucket, key), checking it can name a pair at all.
fn split_pair_path(path: &PathKey) -> Result<(PathKey, &str), BrowserError> {
    match (path.parent(), path.last()) {
        (Some(parent), Some(key)) if !parent.is_empty() => Ok((parent, key)),
        (Some(_), Some(_)) => Err(BrowserError::NotAPair(path.clone())),
        _ => Err(BrowserError::EmptyPath),
    }
}

fn require_pair<R: BucketRead>(tx: &R, path: &PathKey) -> Result<(), BrowserError> {
    match tx.kind_of(path.segments())? {
        Some(EntryKind::Value(_)) => Ok(()),
        Some(EntryKind::Bucket) => Err(BrowserError::NotAPair(path.clone())),
        None => Err(BrowserError::PathNotFound(path.clone())),
    }
}

/// Path-addressed writes against one store
pub struct MutationFacade<'a> {
    store: &'a SledBucketStore,
    read_only: bool,
}

impl<'a> MutationFacade<'a> {
    pub fn new(store: &'a SledBucketStore, read_only: bool) -> Self {
        Self { store, read_only }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn guard(&self) -> Result<(), BrowserError> {
        if self.read_only {
            warn!("Rejected mutation in read-only mode");
            return Err(BrowserError::ReadOnly);
        }
        Ok(())
    }

    /// Create bucket `name` under `parent`; the empty parent creates a root bucket.
    #[instrument(skip(self))]
    pub fn insert_bucket(&self, parent: &PathKey, name: &str) -> Result<(), BrowserError> {
        self.guard()?;
        self.store.update(|tx| -> Result<(), BrowserError> {
            traverse(tx, parent)?;
            if tx.kind_of(parent.child(name).segments())?.is_some() {
                return Err(BrowserError::DuplicateName {
                    parent: parent.clone(),
                    name: name.to_string(),
                });
            }
            tx.create_bucket(parent.segments(), name)?;
            Ok(())
        })?;
        info!(name, "Inserted bucket");
        Ok(())
    }

    /// Put `key` → `value` into the bucket at `parent`.
    ///
    /// An existing pair is overwritten; a sub-bucket of the same name is a
    /// [`BrowserError::DuplicateName`].
    #[instrument(skip(self, value))]
    pub fn insert_pair(&self, parent: &PathKey, key: &str, value: &[u8]) -> Result<(), BrowserError> {
        self.guard()?;
        if parent.is_empty() {
            return Err(BrowserError::CannotInsertAtRoot);
        }
        self.store.update(|tx| -> Result<(), BrowserError> {
            traverse(tx, parent)?;
            if let Some(EntryKind::Bucket) = tx.kind_of(parent.child(key).segments())? {
                return Err(BrowserError::DuplicateName {
                    parent: parent.clone(),
                    name: key.to_string(),
                });
            }
            tx.put(parent.segments(), key, value)?;
            Ok(())
        })?;
        info!(key, "Inserted pair");
        Ok(())
    }

    /// Replace the value of the pair at `path`.
    #[instrument(skip(self, value))]
    pub fn update_value(&self, path: &PathKey, value: &[u8]) -> Result<(), BrowserError> {
        self.guard()?;
        let (bucket, key) = split_pair_path(path)?;
        self.store.update(|tx| -> Result<(), BrowserError> {
            traverse(tx, &bucket)?;
            require_pair(tx, path)?;
            tx.put(bucket.segments(), key, value)?;
            Ok(())
        })?;
        info!("Updated value");
        Ok(())
    }

    /// Rename the pair at `path` to `new_key`, keeping its value.
    #[instrument(skip(self))]
    pub fn update_key(&self, path: &PathKey, new_key: &str) -> Result<(), BrowserError> {
        self.guard()?;
        let (bucket, key) = split_pair_path(path)?;
        if key == new_key {
            debug!("Key unchanged");
            return Ok(());
        }
        self.store.update(|tx| -> Result<(), BrowserError> {
            traverse(tx, &bucket)?;
            require_pair(tx, path)?;
            if tx.kind_of(bucket.child(new_key).segments())?.is_some() {
                return Err(BrowserError::DuplicateName {
                    parent: bucket.clone(),
                    name: new_key.to_string(),
                });
            }
            let value = tx
                .get(bucket.segments(), key)?
                .ok_or_else(|| BrowserError::PathNotFound(path.clone()))?;
            tx.delete(bucket.segments(), key)?;
            tx.put(bucket.segments(), new_key, &value)?;
            Ok(())
        })?;
        info!(new_key, "Renamed pair");
        Ok(())
    }

    /// Rename the bucket at `path` by copying its subtree under the new name.
    ///
    /// The old bucket is deleted in one transaction and the copy written in a
    /// second, so a crash between the two loses the bucket.
    #[instrument(skip(self))]
    pub fn rename_bucket(&self, path: &PathKey, new_name: &str) -> Result<(), BrowserError> {
        self.guard()?;
        let (Some(parent), Some(old_name)) = (path.parent(), path.last()) else {
            return Err(BrowserError::EmptyPath);
        };
        if old_name == new_name {
            debug!("Bucket name unchanged");
            return Ok(());
        }
        if new_name.is_empty() {
            return Err(StorageError::KeyRequired.into());
        }

        // Step 1: materialize the subtree
        let subtree = self.store.view(|tx| -> Result<_, BrowserError> {
            traverse(tx, &parent)?;
            match tx.kind_of(path.segments())? {
                Some(EntryKind::Bucket) => {}
                Some(EntryKind::Value(_)) => return Err(BrowserError::NotABucket(path.clone())),
                None => return Err(BrowserError::PathNotFound(path.clone())),
            }
            if tx.kind_of(parent.child(new_name).segments())?.is_some() {
                return Err(BrowserError::DuplicateName {
                    parent: parent.clone(),
                    name: new_name.to_string(),
                });
            }
            Ok(tx.subtree(path.segments())?)
        })?;
        debug!(records = subtree.len(), "Materialized bucket");

        // Step 2: drop the old bucket
        self.store
            .update(|tx| -> Result<(), BrowserError> {
                tx.delete_bucket(parent.segments(), old_name)?;
                Ok(())
            })?;

        // Step 3: recreate under the new name
        let target = parent.child(new_name);
        self.store.update(|tx| -> Result<(), BrowserError> {
            tx.create_bucket(parent.segments(), new_name)?;
            for (relative, kind) in &subtree {
                let Some((name, within)) = relative.split_last() else {
                    continue;
                };
                let mut bucket = target.segments().to_vec();
                bucket.extend_from_slice(within);
                match kind {
                    EntryKind::Bucket => tx.create_bucket(&bucket, name)?,
                    EntryKind::Value(bytes) => tx.put(&bucket, name, bytes)?,
                }
            }
            Ok(())
        })?;

        info!(new_name, records = subtree.len(), "Renamed bucket");
        Ok(())
    }

    /// Delete the bucket or pair at `path`.
    #[instrument(skip(self))]
    pub fn delete_key(&self, path: &PathKey) -> Result<(), BrowserError> {
        self.guard()?;
        let (Some(parent), Some(name)) = (path.parent(), path.last()) else {
            return Err(BrowserError::EmptyPath);
        };
        self.store.update(|tx| -> Result<(), BrowserError> {
            traverse(tx, &parent)?;
            match tx.delete_bucket(parent.segments(), name) {
                Ok(()) => Ok(()),
                Err(StorageError::IncompatibleValue) => {
                    tx.delete(parent.segments(), name)?;
                    Ok(())
                }
                Err(StorageError::BucketNotFound) => Err(BrowserError::PathNotFound(path.clone())),
                Err(e) => Err(e.into()),
            }
        })?;
        info!("Deleted");
        Ok(())
    }
}

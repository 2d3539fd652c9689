//! Forest builder: one read transaction, one ordered scan
//!
//! Encoded keys sort in pre-order, so every bucket is seen before its contents and
//! a single pass can attach each record to an already-built parent.

use crate::error::BrowserError;
use crate::store::keys::{self, EntryKind};
use crate::store::SledBucketStore;
use crate::tree::forest::Forest;
use crate::tree::node::NodeId;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Rebuilds a [`Forest`] from the store
pub struct ForestBuilder<'a> {
    store: &'a SledBucketStore,
}

impl<'a> ForestBuilder<'a> {
    pub fn new(store: &'a SledBucketStore) -> Self {
        Self { store }
    }

    /// Build a brand-new forest.
    ///
    /// Fails only when the read itself fails. Records that cannot be decoded flag
    /// the deepest bucket that still contains them and are otherwise skipped.
    #[instrument(skip(self), fields(db = %self.store.path().display()))]
    pub fn build(&self) -> Result<Forest, BrowserError> {
        let start = Instant::now();

        let records = match self.store.view(|tx| tx.records()) {
            Ok(records) => records,
            Err(e) => {
                error!("Reload failed: {}", e);
                return Err(e.into());
            }
        };
        debug!(record_count = records.len(), "Scanned store");

        let mut forest = Forest::new();
        let mut index: HashMap<Vec<String>, NodeId> = HashMap::new();
        let mut skipped = 0usize;

        for (key, value) in records {
            let segments = match keys::decode_path(&key) {
                Ok(segments) => segments,
                Err(e) => {
                    skipped += 1;
                    let prefix = keys::decodable_prefix(&key);
                    let message = format!("unreadable key {}: {}", hex::encode(&key), e);
                    flag_nearest(&mut forest, &index, &prefix, message);
                    continue;
                }
            };
            let (name, parent_path) = match segments.split_last() {
                Some((name, parent)) => (name.clone(), parent),
                None => continue,
            };

            let kind = match keys::decode_value(&value) {
                Ok(kind) => kind,
                Err(e) => {
                    skipped += 1;
                    let message = format!("'{}': {}", name, e);
                    flag_nearest(&mut forest, &index, parent_path, message);
                    continue;
                }
            };

            if parent_path.is_empty() {
                match kind {
                    EntryKind::Bucket => {
                        let id = forest.insert_root(name);
                        index.insert(segments, id);
                    }
                    EntryKind::Value(_) => {
                        skipped += 1;
                        warn!(key = %name, "Skipping value stored outside any bucket");
                    }
                }
                continue;
            }

            let Some(&parent) = index.get(parent_path) else {
                skipped += 1;
                let message = format!("'{}' has no parent bucket", name);
                flag_nearest(&mut forest, &index, parent_path, message);
                continue;
            };

            match kind {
                EntryKind::Bucket => {
                    if let Some(id) = forest.insert_bucket(parent, name) {
                        index.insert(segments, id);
                    }
                }
                EntryKind::Value(bytes) => {
                    forest.insert_pair(parent, name, bytes);
                }
            }
        }

        let duration = start.elapsed();
        info!(
            roots = forest.roots().len(),
            nodes = forest.node_count(),
            skipped,
            issues = forest.issues().len(),
            duration_ms = duration.as_millis(),
            "Reloaded forest"
        );
        Ok(forest)
    }
}

/// Flag the deepest indexed bucket on `path`, or log when none exists.
fn flag_nearest(
    forest: &mut Forest,
    index: &HashMap<Vec<String>, NodeId>,
    path: &[String],
    message: String,
) {
    for len in (1..=path.len()).rev() {
        if let Some(&id) = index.get(&path[..len]) {
            warn!(bucket = ?&path[..len], "{}", message);
            forest.flag_bucket(id, message);
            return;
        }
    }
    warn!("Skipping record outside any bucket: {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::tree::path::PathKey;
    use crate::tree::Resolved;
    use std::time::Duration;
    use tempfile::TempDir;

    fn seg(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn seeded() -> (TempDir, SledBucketStore) {
        let dir = TempDir::new().unwrap();
        let store = SledBucketStore::open(dir.path().join("db"), Duration::from_secs(1)).unwrap();
        store
            .update(|tx| -> Result<(), StorageError> {
                tx.create_bucket(&[], "A")?;
                tx.put(&seg(&["A"]), "k1", b"v1")?;
                tx.create_bucket(&seg(&["A"]), "B")?;
                tx.put(&seg(&["A", "B"]), "k2", b"v2")?;
                tx.create_bucket(&[], "C")
            })
            .unwrap();
        (dir, store)
    }

    #[test]
    fn test_build_mirrors_store() {
        let (_dir, store) = seeded();
        let forest = ForestBuilder::new(&store).build().unwrap();

        assert_eq!(forest.roots().len(), 2);
        assert!(forest.issues().is_empty());
        match forest.resolve(&PathKey::from(["A", "B", "k2"])) {
            Resolved::Pair(_, pair) => assert_eq!(pair.value, b"v2"),
            other => panic!("expected pair, got {:?}", other),
        }
        let a = forest.bucket_at(&PathKey::from(["A"])).unwrap();
        let bucket = forest.bucket(a).unwrap();
        assert_eq!(bucket.buckets.len(), 1);
        assert_eq!(bucket.pairs.len(), 1);
        assert!(!bucket.expanded);
    }

    #[test]
    fn test_undecodable_value_flags_bucket() {
        let (_dir, store) = seeded();
        store
            .update(|tx| -> Result<(), StorageError> { tx.put(&seg(&["A"]), "good", b"ok") })
            .unwrap();
        let raw_key = keys::encode_path(&seg(&["A", "bad"]));
        store.insert_raw(&raw_key, &[0x7F, 1]).unwrap();

        let forest = ForestBuilder::new(&store).build().unwrap();
        let a = forest.bucket_at(&PathKey::from(["A"])).unwrap();
        assert!(forest.bucket(a).unwrap().error.is_some());
        assert_eq!(forest.issues().len(), 1);
        assert_eq!(forest.issues()[0].bucket, PathKey::from(["A"]));
        assert!(forest.resolve(&PathKey::from(["A", "good"])).is_found());
        assert!(forest.resolve(&PathKey::from(["C"])).is_found());
    }
}

//! Bucket store
//!
//! Nested named buckets layered over one flat sled keyspace. See [`keys`] for the
//! on-disk layout. All access goes through short-lived transactions opened by
//! [`SledBucketStore::view`] and [`SledBucketStore::update`].

pub mod keys;
pub mod persistence;
pub mod txn;

pub use keys::EntryKind;
pub use persistence::SledBucketStore;
pub use txn::{ReadTxn, WriteTxn};

use crate::error::StorageError;
use std::collections::BTreeMap;

/// One raw key/value record as stored by the engine.
pub type RawRecord = (Vec<u8>, Vec<u8>);

/// A direct child of a bucket: its name and what it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
}

/// Bucket-level reads shared by read and write transactions.
///
/// Implementors supply the two raw primitives; everything else is derived from
/// the key layout.
pub trait BucketRead {
    fn raw_get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// All records whose key starts with `prefix`, in key order.
    fn raw_scan_prefix(&self, prefix: &[u8]) -> Result<Vec<RawRecord>, StorageError>;

    /// What `path` holds, if anything.
    fn kind_of(&self, path: &[String]) -> Result<Option<EntryKind>, StorageError> {
        if path.is_empty() {
            return Ok(None);
        }
        match self.raw_get(&keys::encode_path(path))? {
            Some(raw) => keys::decode_value(&raw).map(Some),
            None => Ok(None),
        }
    }

    fn bucket_exists(&self, path: &[String]) -> Result<bool, StorageError> {
        Ok(matches!(self.kind_of(path)?, Some(EntryKind::Bucket)))
    }

    /// Value stored under `key` in `bucket`. `None` for a missing key or a
    /// nested bucket, matching a plain key/value get.
    fn get(&self, bucket: &[String], key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match self.raw_get(&keys::encode_child(bucket, key))? {
            Some(raw) => match keys::decode_value(&raw)? {
                EntryKind::Value(bytes) => Ok(Some(bytes)),
                EntryKind::Bucket => Ok(None),
            },
            None => Ok(None),
        }
    }

    /// Direct children of `bucket`, in key order.
    fn entries(&self, bucket: &[String]) -> Result<Vec<Entry>, StorageError> {
        let prefix = keys::encode_path(bucket);
        let depth = bucket.len() + 1;
        let mut out = Vec::new();
        for (key, value) in self.raw_scan_prefix(&prefix)? {
            if key.len() == prefix.len() {
                continue;
            }
            let segments = keys::decode_path(&key[prefix.len()..])?;
            if segments.len() + bucket.len() != depth {
                continue;
            }
            let kind = keys::decode_value(&value)?;
            if let Some(name) = segments.into_iter().next() {
                out.push(Entry { name, kind });
            }
        }
        Ok(out)
    }

    fn root_entries(&self) -> Result<Vec<Entry>, StorageError> {
        self.entries(&[])
    }

    /// Every descendant of `bucket` keyed by its path relative to `bucket`.
    fn subtree(&self, bucket: &[String]) -> Result<BTreeMap<Vec<String>, EntryKind>, StorageError> {
        let prefix = keys::encode_path(bucket);
        let mut out = BTreeMap::new();
        for (key, value) in self.raw_scan_prefix(&prefix)? {
            if key.len() == prefix.len() {
                continue;
            }
            let relative = keys::decode_path(&key[prefix.len()..])?;
            out.insert(relative, keys::decode_value(&value)?);
        }
        Ok(out)
    }
}

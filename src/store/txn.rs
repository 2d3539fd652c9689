//! Read and write transactions over the bucket layout

use crate::error::StorageError;
use crate::store::keys::{self, EntryKind};
use crate::store::{BucketRead, RawRecord};
use std::collections::BTreeMap;
use tracing::debug;

fn scan(db: &sled::Db, prefix: &[u8]) -> Result<Vec<RawRecord>, StorageError> {
    let mut out = Vec::new();
    for item in db.scan_prefix(prefix) {
        let (key, value) = item?;
        out.push((key.to_vec(), value.to_vec()));
    }
    Ok(out)
}

/// Read-only view of the store.
pub struct ReadTxn<'a> {
    db: &'a sled::Db,
}

impl<'a> ReadTxn<'a> {
    pub(crate) fn new(db: &'a sled::Db) -> Self {
        Self { db }
    }

    /// Every raw record in key order (pre-order over the bucket hierarchy).
    pub fn records(&self) -> Result<Vec<RawRecord>, StorageError> {
        scan(self.db, &[])
    }
}

impl BucketRead for ReadTxn<'_> {
    fn raw_get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.db.get(key)?.map(|v| v.to_vec()))
    }

    fn raw_scan_prefix(&self, prefix: &[u8]) -> Result<Vec<RawRecord>, StorageError> {
        scan(self.db, prefix)
    }
}

/// Write transaction.
///
/// Writes are staged in memory and become visible to reads made through the same
/// transaction. Nothing reaches the engine until [`WriteTxn::commit`].
pub struct WriteTxn<'a> {
    db: &'a sled::Db,
    staged: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> WriteTxn<'a> {
    pub(crate) fn new(db: &'a sled::Db) -> Self {
        Self {
            db,
            staged: BTreeMap::new(),
        }
    }

    /// Create bucket `name` inside `parent` (the root when `parent` is empty).
    pub fn create_bucket(&mut self, parent: &[String], name: &str) -> Result<(), StorageError> {
        if name.is_empty() {
            return Err(StorageError::KeyRequired);
        }
        if !parent.is_empty() && !self.bucket_exists(parent)? {
            return Err(StorageError::BucketNotFound);
        }
        let key = keys::encode_child(parent, name);
        match self.raw_get(&key)? {
            Some(raw) => match keys::decode_value(&raw)? {
                EntryKind::Bucket => Err(StorageError::BucketExists),
                EntryKind::Value(_) => Err(StorageError::IncompatibleValue),
            },
            None => {
                self.staged
                    .insert(key, Some(keys::encode_value(&EntryKind::Bucket)));
                Ok(())
            }
        }
    }

    /// Delete bucket `name` inside `parent` together with everything below it.
    pub fn delete_bucket(&mut self, parent: &[String], name: &str) -> Result<(), StorageError> {
        let key = keys::encode_child(parent, name);
        match self.raw_get(&key)? {
            None => Err(StorageError::BucketNotFound),
            Some(raw) => match keys::decode_value(&raw)? {
                EntryKind::Value(_) => Err(StorageError::IncompatibleValue),
                EntryKind::Bucket => {
                    let doomed = self.raw_scan_prefix(&key)?;
                    debug!(records = doomed.len(), "Staging bucket delete");
                    for (k, _) in doomed {
                        self.staged.insert(k, None);
                    }
                    Ok(())
                }
            },
        }
    }

    /// Store `value` under `key` in `bucket`, overwriting an existing value.
    pub fn put(&mut self, bucket: &[String], key: &str, value: &[u8]) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::KeyRequired);
        }
        if bucket.is_empty() || !self.bucket_exists(bucket)? {
            return Err(StorageError::BucketNotFound);
        }
        let encoded = keys::encode_child(bucket, key);
        if let Some(raw) = self.raw_get(&encoded)? {
            if keys::decode_value(&raw)?.is_bucket() {
                return Err(StorageError::IncompatibleValue);
            }
        }
        self.staged.insert(
            encoded,
            Some(keys::encode_value(&EntryKind::Value(value.to_vec()))),
        );
        Ok(())
    }

    /// Remove `key` from `bucket`. Removing a missing key is not an error.
    pub fn delete(&mut self, bucket: &[String], key: &str) -> Result<(), StorageError> {
        if bucket.is_empty() || !self.bucket_exists(bucket)? {
            return Err(StorageError::BucketNotFound);
        }
        let encoded = keys::encode_child(bucket, key);
        if let Some(raw) = self.raw_get(&encoded)? {
            if keys::decode_value(&raw)?.is_bucket() {
                return Err(StorageError::IncompatibleValue);
            }
            self.staged.insert(encoded, None);
        }
        Ok(())
    }

    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Apply every staged write as one atomic batch and flush it to disk.
    pub fn commit(self) -> Result<(), StorageError> {
        if self.staged.is_empty() {
            return Ok(());
        }
        let mut batch = sled::Batch::default();
        for (key, value) in self.staged {
            match value {
                Some(value) => batch.insert(key, value),
                None => batch.remove(key),
            }
        }
        self.db.apply_batch(batch)?;
        self.db.flush()?;
        Ok(())
    }
}

impl BucketRead for WriteTxn<'_> {
    fn raw_get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        match self.staged.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => Ok(self.db.get(key)?.map(|v| v.to_vec())),
        }
    }

    fn raw_scan_prefix(&self, prefix: &[u8]) -> Result<Vec<RawRecord>, StorageError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = scan(self.db, prefix)?.into_iter().collect();
        for (key, value) in self
            .staged
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }
}

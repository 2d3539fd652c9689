//! Persistence layer for the bucket store

use crate::error::StorageError;
use crate::store::txn::{ReadTxn, WriteTxn};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Sled-backed store of nested buckets
pub struct SledBucketStore {
    db: sled::Db,
    path: PathBuf,
}

fn is_lock_contention(err: &sled::Error) -> bool {
    match err {
        sled::Error::Io(io) => {
            io.kind() == std::io::ErrorKind::WouldBlock
                || io.to_string().to_lowercase().contains("lock")
        }
        _ => false,
    }
}

impl SledBucketStore {
    /// Open (or create) the database at `path`.
    ///
    /// While another process holds the database lock the open is retried until
    /// `timeout` has elapsed, then [`StorageError::LockTimeout`] is returned. A zero
    /// timeout makes exactly one attempt.
    pub fn open<P: AsRef<Path>>(path: P, timeout: Duration) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let started = Instant::now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match sled::open(&path) {
                Ok(db) => {
                    info!(
                        path = %path.display(),
                        attempts,
                        records = db.len(),
                        "Opened database"
                    );
                    return Ok(Self { db, path });
                }
                Err(e) if is_lock_contention(&e) => {
                    if started.elapsed() >= timeout {
                        warn!(path = %path.display(), attempts, "Database lock not acquired");
                        return Err(StorageError::LockTimeout { path, timeout });
                    }
                    debug!(attempts, "Database locked, retrying");
                    thread::sleep(LOCK_RETRY_INTERVAL.min(timeout.saturating_sub(started.elapsed())));
                }
                Err(sled::Error::Io(io)) => {
                    error!(path = %path.display(), error = %io, "Failed to open database");
                    return Err(StorageError::IoError(io));
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to open database");
                    return Err(StorageError::Engine(e));
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against a read transaction.
    pub fn view<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&ReadTxn<'_>) -> Result<T, E>,
    {
        let txn = ReadTxn::new(&self.db);
        f(&txn)
    }

    /// Run `f` against a write transaction.
    ///
    /// Staged writes are committed atomically when `f` returns `Ok`, and dropped
    /// when it returns `Err`.
    pub fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut WriteTxn<'_>) -> Result<T, E>,
        E: From<StorageError>,
    {
        let mut txn = WriteTxn::new(&self.db);
        match f(&mut txn) {
            Ok(value) => {
                let staged = txn.staged_len();
                txn.commit()?;
                debug!(staged, "Committed write transaction");
                Ok(value)
            }
            Err(e) => {
                debug!(staged = txn.staged_len(), "Rolled back write transaction");
                Err(e)
            }
        }
    }

    /// Write one record verbatim, bypassing the bucket checks.
    ///
    /// Used to repair or seed databases whose contents the bucket API would refuse.
    pub fn insert_raw(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        warn!(key = %hex::encode(key), "Writing raw record");
        self.db.insert(key, value)?;
        self.db.flush()?;
        Ok(())
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

//! Shared test utilities for integration tests
//!
//! Seeded stores, sessions over them, and isolated XDG directories.

#![allow(dead_code)]

use bucketbrowser::error::StorageError;
use bucketbrowser::session::Session;
use bucketbrowser::store::SledBucketStore;
use bucketbrowser::tree::PathKey;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

pub const OPEN_TIMEOUT: Duration = Duration::from_secs(1);

pub fn p(parts: &[&str]) -> PathKey {
    PathKey::from(parts)
}

pub fn seg(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// Fresh empty store in its own temp directory
pub fn empty_store() -> (TempDir, SledBucketStore) {
    let dir = TempDir::new().unwrap();
    let store = SledBucketStore::open(dir.path().join("db"), OPEN_TIMEOUT).unwrap();
    (dir, store)
}

/// Store holding root bucket "A" with pair k1=v1 and sub-bucket "B" with pair k2=v2
pub fn scenario_store() -> (TempDir, SledBucketStore) {
    let (dir, store) = empty_store();
    store
        .update(|tx| -> Result<(), StorageError> {
            tx.create_bucket(&[], "A")?;
            tx.put(&seg(&["A"]), "k1", b"v1")?;
            tx.create_bucket(&seg(&["A"]), "B")?;
            tx.put(&seg(&["A", "B"]), "k2", b"v2")
        })
        .unwrap();
    (dir, store)
}

pub fn scenario_session(read_only: bool) -> (TempDir, Session) {
    let (dir, store) = scenario_store();
    let session = Session::with_store(store, read_only).unwrap();
    (dir, session)
}

/// Environment variable state to restore after test
struct EnvState {
    vars: Vec<(&'static str, Option<String>)>,
}

impl EnvState {
    fn capture(names: &[&'static str]) -> Self {
        Self {
            vars: names.iter().map(|n| (*n, std::env::var(n).ok())).collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.vars {
            match value {
                Some(v) => std::env::set_var(name, v),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with `XDG_CONFIG_HOME`, `XDG_DATA_HOME` and `HOME` inside `test_dir`
/// and the given extra variables set. Everything is restored afterwards.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, extra: &[(&'static str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let mut names = vec!["HOME", "XDG_CONFIG_HOME", "XDG_DATA_HOME"];
    names.extend(extra.iter().map(|(name, _)| *name));
    let env_state = EnvState::capture(&names);

    let config_home = test_dir.path().join("config");
    let data_home = test_dir.path().join("data");
    let home = test_dir.path().join("home");
    for dir in [&config_home, &data_home, &home] {
        std::fs::create_dir_all(dir).unwrap();
    }

    std::env::set_var("HOME", &home);
    std::env::set_var("XDG_CONFIG_HOME", &config_home);
    std::env::set_var("XDG_DATA_HOME", &data_home);
    for (name, value) in extra {
        std::env::set_var(name, value);
    }

    let result = f();

    env_state.restore();
    result
}

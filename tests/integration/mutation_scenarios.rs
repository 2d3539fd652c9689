//! Mutation facade scenarios: every edit is followed by a reload

use super::test_utils::{empty_store, p, scenario_session};
use bucketbrowser::error::BrowserError;
use bucketbrowser::session::Session;
use bucketbrowser::tree::{PathKey, Resolved};

fn empty_session() -> (tempfile::TempDir, Session) {
    let (dir, store) = empty_store();
    (dir, Session::with_store(store, false).unwrap())
}

#[test]
fn test_insert_root_bucket_into_empty_database() {
    let (_dir, mut session) = empty_session();
    assert!(session.forest().is_empty());

    session.insert_bucket(&PathKey::root(), "root2").unwrap();
    match session.forest().resolve(&p(&["root2"])) {
        Resolved::Bucket(_, bucket) => {
            assert_eq!(bucket.name, "root2");
            assert!(!bucket.has_children());
        }
        _ => panic!("root2 should be a bucket"),
    }
}

#[test]
fn test_insert_then_delete_pair() {
    let (_dir, mut session) = empty_session();
    session.insert_bucket(&PathKey::root(), "root2").unwrap();
    session.insert_pair(&p(&["root2"]), "key1", b"val1").unwrap();
    assert!(session.forest().resolve(&p(&["root2", "key1"])).is_found());

    session.delete(&p(&["root2", "key1"])).unwrap();
    assert!(!session.forest().resolve(&p(&["root2", "key1"])).is_found());
    assert_eq!(session.cursor(), Some(&p(&["root2"])));
}

#[test]
fn test_rename_bucket_moves_whole_subtree() {
    let (_dir, mut session) = empty_session();
    session.insert_bucket(&PathKey::root(), "root2").unwrap();
    session.insert_pair(&p(&["root2"]), "key1", b"val1").unwrap();
    session.insert_bucket(&p(&["root2"]), "nested").unwrap();
    session.insert_pair(&p(&["root2", "nested"]), "deep", b"x").unwrap();

    session.rename(&p(&["root2"]), "root3").unwrap();

    assert!(!session.forest().resolve(&p(&["root2"])).is_found());
    match session.forest().resolve(&p(&["root3", "key1"])) {
        Resolved::Pair(_, pair) => assert_eq!(pair.value, b"val1"),
        _ => panic!("key1 should have moved"),
    }
    assert!(session
        .forest()
        .resolve(&p(&["root3", "nested", "deep"]))
        .is_found());
    assert_eq!(session.cursor(), Some(&p(&["root3"])));
}

#[test]
fn test_pair_at_root_is_rejected() {
    let (_dir, mut session) = empty_session();
    let result = session.insert_pair(&PathKey::root(), "k", b"v");
    assert!(matches!(result, Err(BrowserError::CannotInsertAtRoot)));
    assert!(session.forest().is_empty());
}

#[test]
fn test_rename_pair_and_update_value() {
    let (_dir, mut session) = scenario_session(false);
    session.rename(&p(&["A", "k1"]), "renamed").unwrap();
    session.update_value(&p(&["A", "renamed"]), b"new").unwrap();

    assert!(!session.forest().resolve(&p(&["A", "k1"])).is_found());
    match session.forest().resolve(&p(&["A", "renamed"])) {
        Resolved::Pair(_, pair) => assert_eq!(pair.value, b"new"),
        _ => panic!("renamed pair missing"),
    }
}

#[test]
fn test_name_collisions_are_reported() {
    let (_dir, mut session) = scenario_session(false);
    assert!(matches!(
        session.insert_bucket(&p(&["A"]), "k1"),
        Err(BrowserError::DuplicateName { .. })
    ));
    assert!(matches!(
        session.insert_pair(&p(&["A"]), "B", b"v"),
        Err(BrowserError::DuplicateName { .. })
    ));
    assert!(matches!(
        session.rename(&p(&["A", "B"]), "k1"),
        Err(BrowserError::DuplicateName { .. })
    ));
}

#[test]
fn test_edits_survive_reopening_the_database() {
    let (dir, mut session) = empty_session();
    session.insert_bucket(&PathKey::root(), "kept").unwrap();
    session.insert_pair(&p(&["kept"]), "key", b"value").unwrap();
    drop(session);

    let reopened =
        Session::open(&dir.path().join("db"), super::test_utils::OPEN_TIMEOUT, true).unwrap();
    match reopened.forest().resolve(&p(&["kept", "key"])) {
        Resolved::Pair(_, pair) => assert_eq!(pair.value, b"value"),
        _ => panic!("pair should persist"),
    }
}

#[test]
fn test_deleting_bucket_removes_descendants() {
    let (_dir, mut session) = scenario_session(false);
    session.delete(&p(&["A", "B"])).unwrap();
    assert!(!session.forest().resolve(&p(&["A", "B", "k2"])).is_found());
    assert!(session.forest().resolve(&p(&["A", "k1"])).is_found());
}

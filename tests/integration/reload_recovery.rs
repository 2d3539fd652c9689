//! Reload keeps going past unreadable records and carries view state over

use super::test_utils::{p, scenario_session, scenario_store, seg};
use bucketbrowser::session::Session;
use bucketbrowser::store::keys;
use bucketbrowser::tree::{reconcile, ForestBuilder, Resolved};

#[test]
fn test_corrupt_value_flags_its_bucket_only() {
    let (_dir, store) = scenario_store();
    store
        .insert_raw(&keys::encode_path(&seg(&["A", "B", "broken"])), &[0x42])
        .unwrap();

    let forest = ForestBuilder::new(&store).build().unwrap();
    assert_eq!(forest.issues().len(), 1);
    assert_eq!(forest.issues()[0].bucket, p(&["A", "B"]));
    assert!(forest.resolve(&p(&["A", "B", "k2"])).is_found());
    assert!(!forest.resolve(&p(&["A", "B", "broken"])).is_found());
    match forest.resolve(&p(&["A"])) {
        Resolved::Bucket(_, bucket) => assert!(bucket.error.is_none()),
        _ => panic!("A should load"),
    }
}

#[test]
fn test_session_opens_despite_corrupt_records() {
    let (_dir, store) = scenario_store();
    store
        .insert_raw(&keys::encode_path(&seg(&["A", "bad"])), &[0xEE, 0x01])
        .unwrap();

    let mut session = Session::with_store(store, false).unwrap();
    assert_eq!(session.forest().issues().len(), 1);
    session.insert_pair(&p(&["A"]), "fine", b"ok").unwrap();
    assert!(session.forest().resolve(&p(&["A", "fine"])).is_found());
    assert_eq!(session.forest().issues().len(), 1);
}

#[test]
fn test_reconcile_keeps_expanded_buckets_by_name() {
    let (_dir, mut session) = scenario_session(false);
    session.expand_all();
    session.insert_bucket(&p(&["A"]), "C").unwrap();

    let fresh = ForestBuilder::new(session.store()).build().unwrap();
    let merged = reconcile(&fresh, session.forest());
    assert_eq!(merged.visible_paths(""), session.forest().visible_paths(""));
    assert!(merged.visible_paths("").contains(&p(&["A", "B", "k2"])));
}

#[test]
fn test_cursor_survives_external_delete() {
    let (_dir, mut session) = scenario_session(false);
    session.expand_all();
    session.set_cursor(Some(p(&["A", "B", "k2"])));

    session.mutations().delete_key(&p(&["A", "B"])).unwrap();
    session.refresh().unwrap();
    assert_eq!(session.cursor(), Some(&p(&["A"])));
}

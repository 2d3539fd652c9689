//! Read-only sessions reject every write and leave the store untouched

use super::test_utils::{p, scenario_session};
use bucketbrowser::error::BrowserError;
use bucketbrowser::tree::PathKey;

#[test]
fn test_every_mutation_is_rejected() {
    let (_dir, mut session) = scenario_session(true);
    let before = session.forest().clone();

    let results = [
        session.insert_bucket(&PathKey::root(), "new").map(|_| ()),
        session.insert_pair(&p(&["A"]), "k", b"v").map(|_| ()),
        session.update_value(&p(&["A", "k1"]), b"changed"),
        session.rename(&p(&["A"]), "Z").map(|_| ()),
        session.rename(&p(&["A", "k1"]), "k9").map(|_| ()),
        session.delete(&p(&["A", "B"])),
    ];
    for result in results {
        assert!(matches!(result, Err(BrowserError::ReadOnly)));
    }

    session.refresh().unwrap();
    assert_eq!(session.forest(), &before);
}

#[test]
fn test_navigation_still_works() {
    let (_dir, mut session) = scenario_session(true);
    session.expand_all();
    session.move_to_bottom();
    assert_eq!(session.cursor(), Some(&p(&["A", "k1"])));
    assert!(session.is_read_only());
    assert!(session.mutations().is_read_only());
}

//! Navigation and visibility against a store-backed forest

use super::test_utils::{p, scenario_session, scenario_store};
use bucketbrowser::tree::{Direction, ForestBuilder, Resolved};

#[test]
fn test_fresh_forest_shows_only_root_buckets() {
    let (_dir, session) = scenario_session(false);
    assert_eq!(session.visible_paths(), vec![p(&["A"])]);
    assert_eq!(session.cursor(), Some(&p(&["A"])));
}

#[test]
fn test_expanding_reveals_sub_buckets_before_pairs() {
    let (_dir, store) = scenario_store();
    let mut forest = ForestBuilder::new(&store).build().unwrap();

    forest.set_expanded(&p(&["A"]), true).unwrap();
    assert_eq!(
        forest.visible_paths(""),
        vec![p(&["A"]), p(&["A", "B"]), p(&["A", "k1"])]
    );

    forest.set_expanded(&p(&["A", "B"]), true).unwrap();
    assert_eq!(
        forest.visible_paths(""),
        vec![
            p(&["A"]),
            p(&["A", "B"]),
            p(&["A", "B", "k2"]),
            p(&["A", "k1"])
        ]
    );
}

#[test]
fn test_every_visible_path_round_trips() {
    let (_dir, store) = scenario_store();
    let mut forest = ForestBuilder::new(&store).build().unwrap();
    forest.expand_all();

    for path in forest.visible_paths("") {
        let id = forest.resolve(&path).id().unwrap();
        assert_eq!(forest.full_path(id), path);
    }
}

#[test]
fn test_session_navigation_walks_the_tree() {
    let (_dir, mut session) = scenario_session(false);
    session.expand_all();

    session.move_down();
    assert_eq!(session.cursor(), Some(&p(&["A", "B"])));
    session.move_to_bottom();
    assert_eq!(session.cursor(), Some(&p(&["A", "k1"])));
    session.move_down();
    assert_eq!(session.cursor(), Some(&p(&["A", "k1"])));
    session.jump(10, Direction::Up);
    assert_eq!(session.cursor(), Some(&p(&["A"])));
}

#[test]
fn test_filter_hides_pairs_but_not_buckets() {
    let (_dir, mut session) = scenario_session(false);
    session.expand_all();
    session.set_cursor(Some(p(&["A", "k1"])));

    session.set_filter("k2");
    assert_eq!(
        session.visible_paths(),
        vec![p(&["A"]), p(&["A", "B"]), p(&["A", "B", "k2"])]
    );
    assert_eq!(session.cursor(), Some(&p(&["A"])));
    assert_eq!(
        session.forest().visible_item_count(&p(&[]), "k2").unwrap(),
        3
    );
}

#[test]
fn test_collapse_and_expand_counts_match() {
    let (_dir, mut session) = scenario_session(false);
    session.expand_all();
    let before = session.visible_paths().len();
    let subtree = session.forest().visible_item_count(&p(&["A", "B"]), "").unwrap();

    session.toggle(&p(&["A", "B"])).unwrap();
    assert_eq!(session.visible_paths().len(), before - (subtree - 1));

    session.toggle(&p(&["A", "B"])).unwrap();
    assert_eq!(session.visible_paths().len(), before);
    assert!(matches!(
        session.forest().resolve(&p(&["A", "B"])),
        Resolved::Bucket(_, b) if b.expanded
    ));
}

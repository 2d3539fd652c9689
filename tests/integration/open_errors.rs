//! Opening a database that another handle holds

use super::test_utils::scenario_session;
use bucketbrowser::cli::map_open_error;
use bucketbrowser::session::Session;
use std::time::Duration;

#[test]
fn test_locked_database_reports_lock_message() {
    let (dir, _held) = scenario_session(false);
    let db = dir.path().join("db");

    let err = match Session::open(&db, Duration::from_millis(300), false) {
        Ok(_) => panic!("second open should not acquire the lock"),
        Err(e) => e,
    };
    assert!(err.is_lock_timeout());
    assert_eq!(
        map_open_error(&db, &err),
        format!(
            "File {} is locked. Make sure it's not used by another app and try again",
            db.display()
        )
    );
}

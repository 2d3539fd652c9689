//! Export of values and JSON documents from a loaded session

use super::test_utils::{p, scenario_session};
use bucketbrowser::error::BrowserError;
use bucketbrowser::export::{export_json, export_value};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_export_value_writes_raw_bytes() {
    let (_dir, session) = scenario_session(false);
    let out = TempDir::new().unwrap();
    let target = out.path().join("k2.txt");

    export_value(session.forest(), &p(&["A", "B", "k2"]), &target).unwrap();
    assert_eq!(fs::read(&target).unwrap(), b"v2\n");
}

#[test]
fn test_export_json_of_bucket_is_valid_json() {
    let (_dir, session) = scenario_session(false);
    let out = TempDir::new().unwrap();
    let target = out.path().join("a.json");

    export_json(session.forest(), &p(&["A"]), &target).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(parsed, serde_json::json!({"B": {"k2": "v2"}, "k1": "v1"}));
}

#[test]
fn test_export_to_missing_directory_fails_cleanly() {
    let (_dir, session) = scenario_session(false);
    let out = TempDir::new().unwrap();
    let target = out.path().join("missing").join("x.txt");

    let result = export_value(session.forest(), &p(&["A", "k1"]), &target);
    assert!(matches!(result, Err(BrowserError::Export { .. })));
}

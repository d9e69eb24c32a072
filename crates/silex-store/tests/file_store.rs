//! Integration tests for the file-backed store.
//!
//! The point of `FileStore` is that a value written by one process is
//! readable by the next, so these tests write through one instance and
//! read through a fresh one pointed at the same file.

use std::time::Duration;

use silex_store::{CookieOptions, FileStore, SessionStore, StoredEntry};

fn store_in(dir: &tempfile::TempDir) -> FileStore {
    FileStore::new(dir.path().join("session.json")).expect("store should open")
}

#[test]
fn test_value_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();

    store_in(&dir)
        .set("opensilex-token", "eyJ.payload.sig", &CookieOptions::default())
        .unwrap();

    let reopened = store_in(&dir);
    assert_eq!(
        reopened.get("opensilex-token").unwrap().as_deref(),
        Some("eyJ.payload.sig")
    );
}

#[test]
fn test_keys_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store.set("a", "1", &CookieOptions::default()).unwrap();
    store.set("b", "2", &CookieOptions::default()).unwrap();
    store.remove("a").unwrap();

    assert_eq!(store.get("a").unwrap(), None);
    assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
}

#[test]
fn test_expired_value_reads_as_absent_and_is_dropped_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let options = CookieOptions::default().max_age(Duration::ZERO);

    store.set("k", "v", &options).unwrap();

    assert_eq!(store.get("k").unwrap(), None);
    let content = std::fs::read_to_string(store.path()).unwrap();
    assert!(!content.contains("\"k\""), "expired key should be evicted: {content}");
}

#[test]
fn test_file_records_cookie_attributes() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let options = CookieOptions::default()
        .max_age(Duration::from_secs(3600))
        .domain("opensilex.org")
        .secure(true);

    store.set("k", "v", &options).unwrap();

    let content = std::fs::read_to_string(store.path()).unwrap();
    let entries: std::collections::BTreeMap<String, StoredEntry> =
        serde_json::from_str(&content).unwrap();
    let entry = &entries["k"];
    assert_eq!(entry.domain.as_deref(), Some("opensilex.org"));
    assert!(entry.secure);
    assert!(entry.expires_at.is_some());
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use tempfile::tempdir;

// ── MemoryStore ──────────────────────────────────────────────────────────────

#[test]
fn memory_get_returns_none_for_missing_key() {
    let store = MemoryStore::new();
    assert!(store.get_raw("missing").unwrap().is_none());
}

#[test]
fn memory_set_then_get() {
    let store = MemoryStore::new();
    store.set_raw("k", json!({"page": 1})).unwrap();

    assert_eq!(store.get_raw("k").unwrap(), Some(json!({"page": 1})));
}

#[test]
fn memory_delete_removes() {
    let store = MemoryStore::new();
    store.set_raw("k", json!(true)).unwrap();
    store.delete("k").unwrap();

    assert!(store.get_raw("k").unwrap().is_none());
}

#[test]
fn typed_extension_round_trips() {
    let store = MemoryStore::new();
    store.set("count", &42u32).unwrap();

    assert_eq!(store.get::<u32>("count").unwrap(), Some(42));
    assert_eq!(store.get::<u32>("missing").unwrap(), None);
}

// ── FileStore ────────────────────────────────────────────────────────────────

#[test]
fn file_store_round_trips_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");

    {
        let store = FileStore::open(&path).unwrap();
        store.set_raw("alpha", json!("one")).unwrap();
        store.set_raw("beta", json!([1, 2, 3])).unwrap();
    }

    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get_raw("alpha").unwrap(), Some(json!("one")));
    assert_eq!(store.get_raw("beta").unwrap(), Some(json!([1, 2, 3])));
}

#[test]
fn file_store_delete_is_durable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");

    {
        let store = FileStore::open(&path).unwrap();
        store.set_raw("k", json!(1)).unwrap();
        store.delete("k").unwrap();
    }

    let store = FileStore::open(&path).unwrap();
    assert!(store.get_raw("k").unwrap().is_none());
}

#[test]
fn file_store_creates_parent_dirs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/deeper/store.json");

    let store = FileStore::open(&path).unwrap();
    store.set_raw("k", json!(1)).unwrap();
    assert!(path.exists());
}

#[test]
fn file_store_tolerates_empty_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "").unwrap();

    let store = FileStore::open(&path).unwrap();
    assert!(store.get_raw("anything").unwrap().is_none());
}

#[test]
fn file_store_leaves_no_tmp_file_behind() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");

    let store = FileStore::open(&path).unwrap();
    store.set_raw("k", json!(1)).unwrap();

    assert!(!path.with_extension("tmp").exists());
}

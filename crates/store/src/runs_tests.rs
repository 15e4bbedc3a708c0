// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::keyed::MemoryStore;

fn task() -> TaskName {
    TaskName::new("initial_import")
}

fn run() -> RunId {
    RunId::from_string("run-test0000000000000000")
}

fn chunk(page: u64) -> Args {
    Args::new().with("page", page)
}

// ── Latest-run pointers ──────────────────────────────────────────────────────

#[test]
fn latest_run_absent_by_default() {
    let store = MemoryStore::new();
    assert!(latest_run_id(&store, &task(), None).unwrap().is_none());
}

#[test]
fn set_latest_run_updates_both_pointers() {
    let store = MemoryStore::new();
    let args = Args::new().with("user", "alice");
    let id = run();

    set_latest_run(&store, &task(), &args, &id).unwrap();

    assert_eq!(latest_run_id(&store, &task(), None).unwrap(), Some(id.clone()));
    assert_eq!(latest_run_id(&store, &task(), Some(&args)).unwrap(), Some(id.clone()));
    assert_eq!(start_args(&store, &task(), &id).unwrap(), Some(args));
}

#[test]
fn pointers_are_scoped_per_argument_set() {
    let store = MemoryStore::new();
    let args_a = Args::new().with("user", "alice");
    let args_b = Args::new().with("user", "bob");
    let run_a = RunId::from_string("run-a");
    let run_b = RunId::from_string("run-b");

    set_latest_run(&store, &task(), &args_a, &run_a).unwrap();
    set_latest_run(&store, &task(), &args_b, &run_b).unwrap();

    // Scoped pointers stay independent; the global pointer tracks the most
    // recent start.
    assert_eq!(latest_run_id(&store, &task(), Some(&args_a)).unwrap(), Some(run_a));
    assert_eq!(latest_run_id(&store, &task(), Some(&args_b)).unwrap(), Some(run_b.clone()));
    assert_eq!(latest_run_id(&store, &task(), None).unwrap(), Some(run_b));
}

// ── Queue ────────────────────────────────────────────────────────────────────

#[test]
fn pop_from_absent_queue_is_none() {
    let store = MemoryStore::new();
    assert!(pop_front(&store, &task(), &run()).unwrap().is_none());
}

#[test]
fn queue_front_priority_ordering() {
    let store = MemoryStore::new();
    let (t, r) = (task(), run());

    push_front(&store, &t, &r, chunk(1)).unwrap();
    push_front(&store, &t, &r, chunk(2)).unwrap();
    push_front(&store, &t, &r, chunk(3)).unwrap();

    // Most recently pushed to front comes out first
    assert_eq!(pop_front(&store, &t, &r).unwrap(), Some(chunk(3)));
    assert_eq!(pop_front(&store, &t, &r).unwrap(), Some(chunk(2)));
    assert_eq!(pop_front(&store, &t, &r).unwrap(), Some(chunk(1)));
    assert_eq!(pop_front(&store, &t, &r).unwrap(), None);
}

#[test]
fn interleaved_push_and_pop_keeps_local_order() {
    let store = MemoryStore::new();
    let (t, r) = (task(), run());

    write_queue(&store, &t, &r, &[chunk(1), chunk(9)]).unwrap();

    assert_eq!(pop_front(&store, &t, &r).unwrap(), Some(chunk(1)));
    // Pagination continuation jumps ahead of the previously queued chunk
    push_front(&store, &t, &r, chunk(2)).unwrap();
    assert_eq!(pop_front(&store, &t, &r).unwrap(), Some(chunk(2)));
    assert_eq!(pop_front(&store, &t, &r).unwrap(), Some(chunk(9)));
}

#[test]
fn popping_last_chunk_deletes_stored_queue() {
    let store = MemoryStore::new();
    let (t, r) = (task(), run());

    push_front(&store, &t, &r, chunk(1)).unwrap();
    pop_front(&store, &t, &r).unwrap();

    // Absence and emptiness are the same state: no explicit empty list
    assert!(store.get_raw(&format!("bg-task_{t}_run-{r}_queue")).unwrap().is_none());
}

#[test]
fn write_empty_queue_stores_nothing() {
    let store = MemoryStore::new();
    let (t, r) = (task(), run());

    write_queue(&store, &t, &r, &[]).unwrap();
    assert_eq!(queue_len(&store, &t, &r).unwrap(), 0);
    assert!(store.get_raw(&format!("bg-task_{t}_run-{r}_queue")).unwrap().is_none());
}

#[test]
fn clear_queue_drops_pending_chunks() {
    let store = MemoryStore::new();
    let (t, r) = (task(), run());

    write_queue(&store, &t, &r, &[chunk(1), chunk(2)]).unwrap();
    clear_queue(&store, &t, &r).unwrap();

    assert!(pop_front(&store, &t, &r).unwrap().is_none());
}

// ── History ──────────────────────────────────────────────────────────────────

#[test]
fn history_records_into_both_scopes() {
    let store = MemoryStore::new();
    let args = Args::new().with("user", "alice");
    let id = run();

    set_latest_run(&store, &task(), &args, &id).unwrap();
    record_started(&store, &task(), &id).unwrap();

    assert_eq!(started_history(&store, &task(), None).unwrap(), vec![id.clone()]);
    assert_eq!(started_history(&store, &task(), Some(&args)).unwrap(), vec![id]);
}

#[test]
fn history_caps_at_thirty_evicting_oldest() {
    let store = MemoryStore::new();
    let args = Args::new();
    let t = task();

    let mut ids = Vec::new();
    for n in 0..=HISTORY_CAP {
        let id = RunId::from_string(format!("run-{n:04}"));
        set_latest_run(&store, &t, &args, &id).unwrap();
        record_completed(&store, &t, &id).unwrap();
        ids.push(id);
    }

    for scope in [None, Some(&args)] {
        let history = completed_history(&store, &t, scope).unwrap();
        assert_eq!(history.len(), HISTORY_CAP);
        // Oldest entry evicted first
        assert_eq!(history.first(), Some(&ids[1]));
        assert_eq!(history.last(), Some(&ids[HISTORY_CAP]));
    }
}

#[test]
fn history_update_skipped_when_start_args_missing() {
    let store = MemoryStore::new();
    let id = run();

    // No set_latest_run, so there is no start-args record
    record_completed(&store, &task(), &id).unwrap();

    assert!(completed_history(&store, &task(), None).unwrap().is_empty());
}

#[test]
fn last_completed_is_most_recent() {
    let store = MemoryStore::new();
    let args = Args::new();
    let t = task();

    for n in 0..3 {
        let id = RunId::from_string(format!("run-{n}"));
        set_latest_run(&store, &t, &args, &id).unwrap();
        record_completed(&store, &t, &id).unwrap();
    }

    assert_eq!(
        last_completed_run_id(&store, &t, None).unwrap(),
        Some(RunId::from_string("run-2"))
    );
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run bookkeeping: latest-run pointers, work queues, and history.
//!
//! Pure persistence-facing helpers over the keyed store. The run manager is
//! the only caller; nothing here enforces run-lifecycle invariants.
//!
//! Key layout (not stable across versions):
//!
//! ```text
//! bg-task_{task}_latest-run-id                     global pointer
//! bg-task_{task}_latest-run-id_{args_hash}         args-scoped pointer
//! bg-task_{task}_run-{run_id}_start-args           start args for one run
//! bg-task_{task}_run-{run_id}_queue                work queue for one run
//! bg-task_{task}_previous-started_run-ids[_{h}]    bounded history
//! bg-task_{task}_previous-completed_run-ids[_{h}]  bounded history
//! ```

use crate::keyed::{KeyedStore, KeyedStoreExt, StoreError};
use pf_core::{Args, RunId, TaskName};

/// Maximum entries kept in each history list; insertion evicts from the
/// oldest end.
pub const HISTORY_CAP: usize = 30;

fn latest_run_key(task: &TaskName, args: Option<&Args>) -> String {
    match args {
        Some(args) => format!("bg-task_{task}_latest-run-id_{}", args.content_hash()),
        None => format!("bg-task_{task}_latest-run-id"),
    }
}

fn start_args_key(task: &TaskName, run_id: &RunId) -> String {
    format!("bg-task_{task}_run-{run_id}_start-args")
}

fn queue_key(task: &TaskName, run_id: &RunId) -> String {
    format!("bg-task_{task}_run-{run_id}_queue")
}

fn history_key(task: &TaskName, kind: &str, args: Option<&Args>) -> String {
    match args {
        Some(args) => {
            format!("bg-task_{task}_previous-{kind}_run-ids_{}", args.content_hash())
        }
        None => format!("bg-task_{task}_previous-{kind}_run-ids"),
    }
}

// ── Latest-run pointers ──────────────────────────────────────────────────────

/// The run currently considered "current" for this task — globally, or
/// scoped to one start-argument set.
pub fn latest_run_id(
    store: &dyn KeyedStore,
    task: &TaskName,
    args: Option<&Args>,
) -> Result<Option<RunId>, StoreError> {
    store.get(&latest_run_key(task, args))
}

/// Point both the task-global and the args-scoped pointer at `run_id` and
/// remember the start arguments for later staleness checks.
pub fn set_latest_run(
    store: &dyn KeyedStore,
    task: &TaskName,
    args: &Args,
    run_id: &RunId,
) -> Result<(), StoreError> {
    store.set(&latest_run_key(task, None), run_id)?;
    store.set(&latest_run_key(task, Some(args)), run_id)?;
    store.set(&start_args_key(task, run_id), args)
}

/// The arguments a run was started with, if still on record.
pub fn start_args(
    store: &dyn KeyedStore,
    task: &TaskName,
    run_id: &RunId,
) -> Result<Option<Args>, StoreError> {
    store.get(&start_args_key(task, run_id))
}

// ── Work queue ───────────────────────────────────────────────────────────────

/// Persist an initial queue. An empty queue is stored as absence.
pub fn write_queue(
    store: &dyn KeyedStore,
    task: &TaskName,
    run_id: &RunId,
    queue: &[Args],
) -> Result<(), StoreError> {
    if queue.is_empty() {
        store.delete(&queue_key(task, run_id))
    } else {
        store.set(&queue_key(task, run_id), &queue)
    }
}

/// Prepend a chunk, creating the queue if absent. Front entries are popped
/// first, which is how a chunk processor schedules its own continuation
/// ahead of previously queued work.
pub fn push_front(
    store: &dyn KeyedStore,
    task: &TaskName,
    run_id: &RunId,
    chunk: Args,
) -> Result<(), StoreError> {
    let key = queue_key(task, run_id);
    let mut queue: Vec<Args> = store.get(&key)?.unwrap_or_default();
    queue.insert(0, chunk);
    store.set(&key, &queue)
}

/// Remove and return the first chunk. An empty or absent queue yields
/// `None`, and the stored entry is deleted once the last element is gone —
/// absence and emptiness are the same state.
pub fn pop_front(
    store: &dyn KeyedStore,
    task: &TaskName,
    run_id: &RunId,
) -> Result<Option<Args>, StoreError> {
    let key = queue_key(task, run_id);
    let mut queue: Vec<Args> = store.get(&key)?.unwrap_or_default();

    if queue.is_empty() {
        store.delete(&key)?;
        return Ok(None);
    }

    let chunk = queue.remove(0);
    if queue.is_empty() {
        store.delete(&key)?;
    } else {
        store.set(&key, &queue)?;
    }
    Ok(Some(chunk))
}

/// Drop a run's queue entirely.
pub fn clear_queue(
    store: &dyn KeyedStore,
    task: &TaskName,
    run_id: &RunId,
) -> Result<(), StoreError> {
    store.delete(&queue_key(task, run_id))
}

/// Remaining chunk count, for logging.
pub fn queue_len(
    store: &dyn KeyedStore,
    task: &TaskName,
    run_id: &RunId,
) -> Result<usize, StoreError> {
    Ok(store.get::<Vec<Args>>(&queue_key(task, run_id))?.map(|q| q.len()).unwrap_or(0))
}

// ── History ──────────────────────────────────────────────────────────────────

fn record_history(
    store: &dyn KeyedStore,
    task: &TaskName,
    run_id: &RunId,
    kind: &str,
) -> Result<(), StoreError> {
    let Some(args) = start_args(store, task, run_id)? else {
        // Observability only — a missing start-args record must not abort
        // the run itself.
        tracing::warn!(task = %task, run_id = %run_id, "missing start args, skipping {kind} history update");
        return Ok(());
    };

    for scope in [None, Some(&args)] {
        let key = history_key(task, kind, scope);
        let mut ids: Vec<RunId> = store.get(&key)?.unwrap_or_default();
        ids.push(run_id.clone());
        while ids.len() > HISTORY_CAP {
            ids.remove(0);
        }
        store.set(&key, &ids)?;
    }
    Ok(())
}

/// Append to the started-run history (global and args-scoped, capped).
pub fn record_started(
    store: &dyn KeyedStore,
    task: &TaskName,
    run_id: &RunId,
) -> Result<(), StoreError> {
    record_history(store, task, run_id, "started")
}

/// Append to the completed-run history (global and args-scoped, capped).
pub fn record_completed(
    store: &dyn KeyedStore,
    task: &TaskName,
    run_id: &RunId,
) -> Result<(), StoreError> {
    record_history(store, task, run_id, "completed")
}

pub fn started_history(
    store: &dyn KeyedStore,
    task: &TaskName,
    args: Option<&Args>,
) -> Result<Vec<RunId>, StoreError> {
    Ok(store.get(&history_key(task, "started", args))?.unwrap_or_default())
}

pub fn completed_history(
    store: &dyn KeyedStore,
    task: &TaskName,
    args: Option<&Args>,
) -> Result<Vec<RunId>, StoreError> {
    Ok(store.get(&history_key(task, "completed", args))?.unwrap_or_default())
}

/// The most recently completed run, if any.
pub fn last_completed_run_id(
    store: &dyn KeyedStore,
    task: &TaskName,
    args: Option<&Args>,
) -> Result<Option<RunId>, StoreError> {
    Ok(completed_history(store, task, args)?.pop())
}

#[cfg(test)]
#[path = "runs_tests.rs"]
mod tests;

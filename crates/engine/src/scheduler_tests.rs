// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pf_core::{Args, RunId, TaskName};
use pf_store::MemoryStore;

fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

fn start_action(page: u64) -> TaskAction {
    TaskAction::Start {
        task: TaskName::new("fetch_latest_import"),
        args: Args::new().with("page", page),
    }
}

fn continue_action(run: &str) -> TaskAction {
    TaskAction::Continue {
        task: TaskName::new("fetch_latest_import"),
        run_id: RunId::from_string(run),
    }
}

fn group(run: &str) -> ActionGroup {
    ActionGroup::for_run(&TaskName::new("fetch_latest_import"), &RunId::from_string(run))
}

// ── Enrollment and draining ──────────────────────────────────────────────────

#[test]
fn enqueued_actions_are_immediately_due() {
    let scheduler = LocalScheduler::open(store()).unwrap();
    scheduler.enqueue(start_action(1), None).unwrap();

    assert_eq!(scheduler.due(0).unwrap(), vec![start_action(1)]);
    assert_eq!(scheduler.pending_len(), 0);
}

#[test]
fn scheduled_actions_wait_for_their_deadline() {
    let scheduler = LocalScheduler::open(store()).unwrap();
    scheduler.schedule_at(5_000, start_action(1), None).unwrap();

    assert!(scheduler.due(4_999).unwrap().is_empty());
    assert_eq!(scheduler.next_due_ms(), Some(5_000));
    assert_eq!(scheduler.due(5_000).unwrap(), vec![start_action(1)]);
}

#[test]
fn due_orders_by_deadline() {
    let scheduler = LocalScheduler::open(store()).unwrap();
    scheduler.schedule_at(2_000, start_action(2), None).unwrap();
    scheduler.schedule_at(1_000, start_action(1), None).unwrap();

    assert_eq!(scheduler.due(3_000).unwrap(), vec![start_action(1), start_action(2)]);
}

#[test]
fn recurring_actions_rearm_after_firing() {
    let scheduler = LocalScheduler::open(store()).unwrap();
    scheduler
        .schedule_recurring(1_000, Duration::from_secs(60), start_action(1))
        .unwrap();

    assert_eq!(scheduler.due(1_000).unwrap().len(), 1);
    // Re-armed one interval after the firing
    assert_eq!(scheduler.next_due_ms(), Some(61_000));
    assert_eq!(scheduler.due(61_000).unwrap().len(), 1);
    assert_eq!(scheduler.next_due_ms(), Some(121_000));
}

// ── has_pending ──────────────────────────────────────────────────────────────

#[test]
fn has_pending_matches_exact_payload() {
    let scheduler = LocalScheduler::open(store()).unwrap();
    scheduler.enqueue(start_action(1), None).unwrap();

    assert!(scheduler.has_pending(&start_action(1), None));
    assert!(!scheduler.has_pending(&start_action(2), None));
}

#[test]
fn has_pending_respects_group_scope() {
    let scheduler = LocalScheduler::open(store()).unwrap();
    scheduler.enqueue(continue_action("run-a"), Some(group("run-a"))).unwrap();

    assert!(scheduler.has_pending(&continue_action("run-a"), Some(&group("run-a"))));
    assert!(!scheduler.has_pending(&continue_action("run-a"), Some(&group("run-b"))));
    // Without a group filter, payload equality is enough
    assert!(scheduler.has_pending(&continue_action("run-a"), None));
}

// ── Cancellation ─────────────────────────────────────────────────────────────

#[test]
fn cancel_removes_matching_payloads_only() {
    let scheduler = LocalScheduler::open(store()).unwrap();
    scheduler.enqueue(start_action(1), None).unwrap();
    scheduler.enqueue(start_action(2), None).unwrap();

    scheduler.cancel(&start_action(1));

    assert!(!scheduler.has_pending(&start_action(1), None));
    assert!(scheduler.has_pending(&start_action(2), None));
}

#[test]
fn cancel_spares_recurring_registrations() {
    let scheduler = LocalScheduler::open(store()).unwrap();
    scheduler
        .schedule_recurring(1_000, Duration::from_secs(3600), start_action(1))
        .unwrap();
    scheduler.schedule_at(2_000, start_action(1), None).unwrap();

    scheduler.cancel(&start_action(1));

    // The one-shot is gone; the recurring kick-off survives a stop
    assert_eq!(scheduler.pending_len(), 1);
    assert_eq!(scheduler.next_due_ms(), Some(1_000));
}

#[test]
fn cancel_group_removes_every_run_action_but_not_start() {
    let scheduler = LocalScheduler::open(store()).unwrap();
    scheduler.enqueue(start_action(1), None).unwrap();
    scheduler.enqueue(continue_action("run-a"), Some(group("run-a"))).unwrap();
    scheduler
        .schedule_at(9_000, continue_action("run-a"), Some(group("run-a")))
        .unwrap();

    scheduler.cancel_group(&group("run-a"));

    assert_eq!(scheduler.pending_len(), 1);
    assert!(scheduler.has_pending(&start_action(1), None));
}

// ── Durability ───────────────────────────────────────────────────────────────

#[test]
fn pending_actions_survive_reopen() {
    let store = store();
    {
        let scheduler = LocalScheduler::open(Arc::clone(&store) as Arc<dyn KeyedStore>).unwrap();
        scheduler.schedule_at(7_000, start_action(1), None).unwrap();
    }

    let scheduler = LocalScheduler::open(store).unwrap();
    assert_eq!(scheduler.next_due_ms(), Some(7_000));
    assert_eq!(scheduler.due(7_000).unwrap(), vec![start_action(1)]);
}

#[test]
fn reopen_continues_id_sequence() {
    let store = store();
    let first = {
        let scheduler = LocalScheduler::open(Arc::clone(&store) as Arc<dyn KeyedStore>).unwrap();
        scheduler.schedule_at(7_000, start_action(1), None).unwrap()
    };

    let scheduler = LocalScheduler::open(store).unwrap();
    let second = scheduler.schedule_at(8_000, start_action(2), None).unwrap();
    assert!(second > first);
}

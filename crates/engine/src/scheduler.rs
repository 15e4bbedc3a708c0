// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable action scheduling.
//!
//! The engine treats the scheduler as an external primitive: enroll an
//! action to fire asap, at a timestamp, or on a recurring interval; check
//! whether an equivalent enrollment is already pending; cancel by payload
//! or by run group. `LocalScheduler` is the in-process implementation — a
//! pending list persisted through the keyed store so a restarted daemon
//! resumes where it left off.

use crate::error::ScheduleError;
use pf_core::{ActionGroup, TaskAction};
use pf_store::{KeyedStore, KeyedStoreExt, StoreError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Opaque enrollment identifier.
pub type ActionId = u64;

/// Contract the engine requires of the durable scheduler.
pub trait ActionScheduler: Send + Sync {
    /// Is an equivalent action (same payload, same group when given)
    /// already pending?
    fn has_pending(&self, action: &TaskAction, group: Option<&ActionGroup>) -> bool;

    /// Enroll an action to fire as soon as possible.
    fn enqueue(
        &self,
        action: TaskAction,
        group: Option<ActionGroup>,
    ) -> Result<ActionId, ScheduleError>;

    /// Enroll an action to fire once at `due_epoch_ms`.
    fn schedule_at(
        &self,
        due_epoch_ms: u64,
        action: TaskAction,
        group: Option<ActionGroup>,
    ) -> Result<ActionId, ScheduleError>;

    /// Enroll an action to fire at `first_epoch_ms` and every `interval`
    /// after that.
    fn schedule_recurring(
        &self,
        first_epoch_ms: u64,
        interval: Duration,
        action: TaskAction,
    ) -> Result<ActionId, ScheduleError>;

    /// Cancel every pending one-shot enrollment with this exact payload.
    /// Recurring registrations are a task's kick-off configuration and are
    /// not touched — stopping a run must not kill the schedule that starts
    /// future runs.
    fn cancel(&self, action: &TaskAction);

    /// Cancel every pending enrollment in the group.
    fn cancel_group(&self, group: &ActionGroup);
}

/// One pending enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub id: ActionId,
    /// Epoch ms at which the action becomes due; 0 means asap.
    pub due_ms: u64,
    /// Re-arm interval for recurring enrollments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,
    pub action: TaskAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<ActionGroup>,
}

#[derive(Default)]
struct Inner {
    next_id: ActionId,
    pending: Vec<PendingAction>,
}

const PENDING_KEY: &str = "scheduler_pending-actions";

/// In-process scheduler whose pending list survives restarts via the keyed
/// store.
pub struct LocalScheduler {
    store: Arc<dyn KeyedStore>,
    inner: Mutex<Inner>,
}

impl LocalScheduler {
    /// Open the scheduler, restoring any pending actions persisted by a
    /// previous process.
    pub fn open(store: Arc<dyn KeyedStore>) -> Result<Self, StoreError> {
        let pending: Vec<PendingAction> = store.get(PENDING_KEY)?.unwrap_or_default();
        let next_id = pending.iter().map(|p| p.id).max().map(|id| id + 1).unwrap_or(1);
        Ok(Self { store, inner: Mutex::new(Inner { next_id, pending }) })
    }

    fn persist(&self, inner: &Inner) -> Result<(), StoreError> {
        if inner.pending.is_empty() {
            self.store.delete(PENDING_KEY)
        } else {
            self.store.set(PENDING_KEY, &inner.pending)
        }
    }

    fn enroll(
        &self,
        due_ms: u64,
        interval_ms: Option<u64>,
        action: TaskAction,
        group: Option<ActionGroup>,
    ) -> Result<ActionId, ScheduleError> {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.pending.push(PendingAction { id, due_ms, interval_ms, action, group });
        self.persist(&inner)?;
        Ok(id)
    }

    /// Drain every action due at `now_ms`, re-arming recurring enrollments.
    /// Returned actions are ordered by due time.
    pub fn due(&self, now_ms: u64) -> Result<Vec<TaskAction>, StoreError> {
        let mut inner = self.inner.lock();

        let mut ripe: Vec<(u64, TaskAction)> = Vec::new();
        let mut remaining = Vec::with_capacity(inner.pending.len());
        for mut entry in inner.pending.drain(..) {
            if entry.due_ms > now_ms {
                remaining.push(entry);
                continue;
            }
            ripe.push((entry.due_ms, entry.action.clone()));
            if let Some(interval) = entry.interval_ms {
                // At-least-once: a missed window collapses into one firing
                entry.due_ms = now_ms + interval;
                remaining.push(entry);
            }
        }
        inner.pending = remaining;

        if !ripe.is_empty() {
            self.persist(&inner)?;
        }
        ripe.sort_by_key(|(due, _)| *due);
        Ok(ripe.into_iter().map(|(_, action)| action).collect())
    }

    /// Due time of the soonest pending action.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.inner.lock().pending.iter().map(|p| p.due_ms).min()
    }

    pub fn pending_len(&self) -> usize {
        self.inner.lock().pending.len()
    }
}

impl ActionScheduler for LocalScheduler {
    fn has_pending(&self, action: &TaskAction, group: Option<&ActionGroup>) -> bool {
        self.inner.lock().pending.iter().any(|p| {
            p.action == *action && group.map_or(true, |g| p.group.as_ref() == Some(g))
        })
    }

    fn enqueue(
        &self,
        action: TaskAction,
        group: Option<ActionGroup>,
    ) -> Result<ActionId, ScheduleError> {
        self.enroll(0, None, action, group)
    }

    fn schedule_at(
        &self,
        due_epoch_ms: u64,
        action: TaskAction,
        group: Option<ActionGroup>,
    ) -> Result<ActionId, ScheduleError> {
        self.enroll(due_epoch_ms, None, action, group)
    }

    fn schedule_recurring(
        &self,
        first_epoch_ms: u64,
        interval: Duration,
        action: TaskAction,
    ) -> Result<ActionId, ScheduleError> {
        self.enroll(first_epoch_ms, Some(interval.as_millis() as u64), action, None)
    }

    fn cancel(&self, action: &TaskAction) {
        let mut inner = self.inner.lock();
        let before = inner.pending.len();
        inner.pending.retain(|p| p.interval_ms.is_some() || p.action != *action);
        if inner.pending.len() != before {
            if let Err(error) = self.persist(&inner) {
                tracing::warn!(%error, "failed to persist scheduler state after cancel");
            }
        }
    }

    fn cancel_group(&self, group: &ActionGroup) {
        let mut inner = self.inner.lock();
        let before = inner.pending.len();
        inner.pending.retain(|p| p.group.as_ref() != Some(group));
        if inner.pending.len() != before {
            if let Err(error) = self.persist(&inner) {
                tracing::warn!(%error, "failed to persist scheduler state after group cancel");
            }
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test doubles for engine consumers.

use crate::error::ScheduleError;
use crate::scheduler::{ActionId, ActionScheduler, PendingAction};
use pf_core::{ActionGroup, TaskAction};
use parking_lot::Mutex;
use std::time::Duration;

#[derive(Default)]
struct Inner {
    next_id: ActionId,
    pending: Vec<PendingAction>,
    enrolled: Vec<TaskAction>,
    refuse: bool,
}

/// In-memory scheduler fake: records every enrollment, supports manual
/// draining, and can be told to refuse enrollments to exercise the fatal
/// path.
#[derive(Default)]
pub struct FakeScheduler {
    inner: Mutex<Inner>,
}

impl FakeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent enrollment fail.
    pub fn refuse_enrollments(&self, refuse: bool) {
        self.inner.lock().refuse = refuse;
    }

    /// Every action ever enrolled, in order.
    pub fn enrolled(&self) -> Vec<TaskAction> {
        self.inner.lock().enrolled.clone()
    }

    /// Snapshot of the pending list.
    pub fn pending(&self) -> Vec<PendingAction> {
        self.inner.lock().pending.clone()
    }

    pub fn pending_len(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Due time of the soonest pending action.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.inner.lock().pending.iter().map(|p| p.due_ms).min()
    }

    /// Pop the earliest action due at `now_ms`, re-arming recurring
    /// enrollments.
    pub fn pop_ready(&self, now_ms: u64) -> Option<TaskAction> {
        let mut inner = self.inner.lock();
        let idx = inner
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= now_ms)
            .min_by_key(|(_, p)| p.due_ms)
            .map(|(idx, _)| idx)?;

        let mut entry = inner.pending.remove(idx);
        let action = entry.action.clone();
        if let Some(interval) = entry.interval_ms {
            entry.due_ms = now_ms + interval;
            inner.pending.push(entry);
        }
        Some(action)
    }

    fn enroll(
        &self,
        due_ms: u64,
        interval_ms: Option<u64>,
        action: TaskAction,
        group: Option<ActionGroup>,
    ) -> Result<ActionId, ScheduleError> {
        let mut inner = self.inner.lock();
        if inner.refuse {
            return Err(ScheduleError::Enroll {
                action: action.log_summary(),
                reason: "refused by test".to_string(),
            });
        }
        inner.next_id += 1;
        let id = inner.next_id;
        inner.enrolled.push(action.clone());
        inner.pending.push(PendingAction { id, due_ms, interval_ms, action, group });
        Ok(id)
    }
}

impl ActionScheduler for FakeScheduler {
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
        self.inner
            .lock()
            .pending
            .retain(|p| p.interval_ms.is_some() || p.action != *action);
    }

    fn cancel_group(&self, group: &ActionGroup) {
        self.inner.lock().pending.retain(|p| p.group.as_ref() != Some(group));
    }
}

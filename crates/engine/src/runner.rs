// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The run manager: lifecycle state machine for background task runs.
//!
//! One run moves start → continue → run → ... → cleanup, every transition
//! delivered as a scheduler action. Correctness under duplicate delivery
//! and overlapping starts rests on two mechanisms, both re-checked on every
//! run-scoped action rather than enforced transactionally:
//!
//! - the latest-run pointer: an action whose run identity is no longer
//!   current for its task and start arguments is discarded;
//! - the completed history: a run that already cleaned up never cleans up
//!   again, even if a stray `continue` arrives afterwards.

use crate::error::{EngineError, ScheduleError};
use crate::scheduler::{ActionId, ActionScheduler};
use crate::task::{BackgroundTask, ChunkContext, TaskRegistry};
use pf_core::{ActionGroup, Args, Clock, RunId, TaskAction, TaskName};
use pf_store::runs;
use pf_store::KeyedStore;
use std::sync::Arc;
use std::time::Duration;

/// Delay before the next `continue` after a chunk completes. Exists to pace
/// calls against external rate limits, not for correctness.
pub const DEFAULT_CONTINUE_DELAY: Duration = Duration::from_secs(60);

/// Drives task runs chunk by chunk. Owns all mutation of the latest-run
/// pointers and work queues; no other component writes them.
pub struct TaskRunner<C: Clock> {
    store: Arc<dyn KeyedStore>,
    scheduler: Arc<dyn ActionScheduler>,
    registry: Arc<TaskRegistry>,
    clock: C,
    continue_delay: Duration,
}

impl<C: Clock> TaskRunner<C> {
    pub fn new(
        store: Arc<dyn KeyedStore>,
        scheduler: Arc<dyn ActionScheduler>,
        registry: Arc<TaskRegistry>,
        clock: C,
    ) -> Self {
        Self { store, scheduler, registry, clock, continue_delay: DEFAULT_CONTINUE_DELAY }
    }

    pub fn with_continue_delay(mut self, delay: Duration) -> Self {
        self.continue_delay = delay;
        self
    }

    // ── Public scheduling API ────────────────────────────────────────────────

    /// Enroll a start to fire asap. Skipped (returning `None`) when an
    /// equivalent start is already pending.
    pub fn enqueue_task(
        &self,
        task: &TaskName,
        args: Args,
    ) -> Result<Option<ActionId>, EngineError> {
        Ok(self.enroll_deduped(None, TaskAction::Start { task: task.clone(), args }, None)?)
    }

    /// Enroll a start to fire once at `at_epoch_ms`.
    pub fn schedule_task(
        &self,
        task: &TaskName,
        at_epoch_ms: u64,
        args: Args,
    ) -> Result<Option<ActionId>, EngineError> {
        Ok(self.enroll_deduped(
            Some(at_epoch_ms),
            TaskAction::Start { task: task.clone(), args },
            None,
        )?)
    }

    /// Enroll a recurring start.
    pub fn schedule_recurring_task(
        &self,
        task: &TaskName,
        first_epoch_ms: u64,
        interval: Duration,
        args: Args,
    ) -> Result<Option<ActionId>, EngineError> {
        let action = TaskAction::Start { task: task.clone(), args };
        if self.scheduler.has_pending(&action, None) {
            tracing::debug!(task = %task, "equivalent recurring start already pending, skipping");
            return Ok(None);
        }
        Ok(Some(self.scheduler.schedule_recurring(first_epoch_ms, interval, action)?))
    }

    /// Stop any current run of `task` for these start arguments: unschedule
    /// the matching pending start, cancel the run's action group, and drop
    /// its queue. History is untouched.
    pub fn stop_task(&self, task: &TaskName, args: &Args) -> Result<(), EngineError> {
        let latest = runs::latest_run_id(&*self.store, task, Some(args))?;

        self.scheduler
            .cancel(&TaskAction::Start { task: task.clone(), args: args.clone() });

        // None means this is probably the very first run
        if let Some(run_id) = latest {
            self.scheduler.cancel_group(&ActionGroup::for_run(task, &run_id));
            runs::clear_queue(&*self.store, task, &run_id)?;
            tracing::info!(task = %task, run_id = %run_id, "stopped run");
        }
        Ok(())
    }

    // ── Action dispatch ──────────────────────────────────────────────────────

    /// Handle one scheduler-delivered action.
    pub async fn handle(&self, action: TaskAction) -> Result<(), EngineError> {
        tracing::info!("handling action {}", action.log_summary());
        match action {
            TaskAction::Start { task, args } => self.start(&task, &args).await,
            TaskAction::Continue { task, run_id } => self.continue_run(&task, &run_id).await,
            TaskAction::Run { task, run_id, chunk } => {
                self.run_chunk(&task, &run_id, chunk).await
            }
            TaskAction::Cleanup { task, run_id } => self.cleanup_run(&task, &run_id).await,
        }
    }

    /// Start a new run: bury any current run for (task, args), mint a fresh
    /// run identity, materialize the queue, and continue immediately.
    async fn start(&self, task: &TaskName, args: &Args) -> Result<(), EngineError> {
        let def = self.task_def(task)?;
        self.stop_task(task, args)?;

        let run_id = RunId::mint();
        runs::set_latest_run(&*self.store, task, args, &run_id)?;
        runs::record_started(&*self.store, task, &run_id)?;

        let queue = def.generate_queue(args, &run_id).await.map_err(|source| {
            EngineError::QueueGeneration { task: task.clone(), source }
        })?;
        runs::write_queue(&*self.store, task, &run_id, &queue)?;
        tracing::info!(task = %task, run_id = %run_id, chunks = queue.len(), "run started");

        self.continue_run(task, &run_id).await
    }

    /// Pop the next chunk and dispatch it, or dispatch cleanup when the
    /// queue is exhausted. Popping an empty or never-created queue is "no
    /// more work", not an error.
    async fn continue_run(&self, task: &TaskName, run_id: &RunId) -> Result<(), EngineError> {
        if self.already_completed(task, run_id)? {
            tracing::info!(task = %task, run_id = %run_id, "run already completed, skipping continue");
            return Ok(());
        }

        let group = ActionGroup::for_run(task, run_id);
        let next = match runs::pop_front(&*self.store, task, run_id)? {
            Some(chunk) => {
                TaskAction::Run { task: task.clone(), run_id: run_id.clone(), chunk }
            }
            None => TaskAction::Cleanup { task: task.clone(), run_id: run_id.clone() },
        };
        self.enroll_deduped(None, next, Some(group))?;
        Ok(())
    }

    /// Process one chunk, then re-arm `continue` after the pacing delay.
    async fn run_chunk(
        &self,
        task: &TaskName,
        run_id: &RunId,
        chunk: Args,
    ) -> Result<(), EngineError> {
        if self.is_stale(task, run_id)? {
            tracing::info!(task = %task, run_id = %run_id, "skipping old run action");
            return Ok(());
        }

        let def = self.task_def(task)?;
        let ctx = ChunkContext::new(&*self.store, task, run_id);
        if let Err(error) = def.process_chunk(&ctx, chunk).await {
            // Forward progress over per-chunk strict success: the failure is
            // logged and the run still advances.
            tracing::error!(task = %task, run_id = %run_id, %error, "chunk processing failed");
        }

        let due = self.clock.epoch_ms() + self.continue_delay.as_millis() as u64;
        let group = ActionGroup::for_run(task, run_id);
        let action = TaskAction::Continue { task: task.clone(), run_id: run_id.clone() };
        self.enroll_deduped(Some(due), action, Some(group))?;
        Ok(())
    }

    /// Run the task's cleanup hook at most once, then retire the run into
    /// the completed history.
    async fn cleanup_run(&self, task: &TaskName, run_id: &RunId) -> Result<(), EngineError> {
        if self.is_stale(task, run_id)? {
            tracing::info!(task = %task, run_id = %run_id, "skipping old run cleanup");
            return Ok(());
        }
        if self.already_completed(task, run_id)? {
            tracing::info!(task = %task, run_id = %run_id, "cleanup already ran, skipping");
            return Ok(());
        }

        let def = self.task_def(task)?;
        if let Err(error) = def.cleanup(run_id).await {
            tracing::error!(task = %task, run_id = %run_id, %error, "cleanup hook failed");
        }
        runs::record_completed(&*self.store, task, run_id)?;
        tracing::info!(task = %task, run_id = %run_id, "run completed");
        Ok(())
    }

    // ── Guards ───────────────────────────────────────────────────────────────

    /// An action is stale when its run identity no longer matches the
    /// latest-run pointer for the run's original start arguments (falling
    /// back to the task-global pointer when the start-args record is gone).
    fn is_stale(&self, task: &TaskName, run_id: &RunId) -> Result<bool, EngineError> {
        let args = runs::start_args(&*self.store, task, run_id)?;
        let latest = runs::latest_run_id(&*self.store, task, args.as_ref())?;
        Ok(latest.as_ref() != Some(run_id))
    }

    fn already_completed(&self, task: &TaskName, run_id: &RunId) -> Result<bool, EngineError> {
        let args = runs::start_args(&*self.store, task, run_id)?;
        let history = runs::completed_history(&*self.store, task, args.as_ref())?;
        Ok(history.contains(run_id))
    }

    fn task_def(&self, task: &TaskName) -> Result<&Arc<dyn BackgroundTask>, EngineError> {
        self.registry.get(task).ok_or_else(|| EngineError::UnknownTask(task.clone()))
    }

    /// Enroll unless an equivalent action is already pending. A scheduler
    /// refusal propagates — silently dropping the enrollment would leave the
    /// run with no path forward.
    fn enroll_deduped(
        &self,
        due_epoch_ms: Option<u64>,
        action: TaskAction,
        group: Option<ActionGroup>,
    ) -> Result<Option<ActionId>, ScheduleError> {
        if self.scheduler.has_pending(&action, group.as_ref()) {
            tracing::debug!("equivalent action already pending, skipping {}", action.log_summary());
            return Ok(None);
        }
        let id = match due_epoch_ms {
            Some(due) => self.scheduler.schedule_at(due, action, group)?,
            None => self.scheduler.enqueue(action, group)?,
        };
        Ok(Some(id))
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;

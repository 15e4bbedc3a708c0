// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error taxonomy.
//!
//! Scheduler enrollment failures and store failures are structural: they
//! abort the current transition. Task-level failures inside a chunk are
//! logged and the run advances anyway — the engine favors forward progress
//! over per-item strict success. Stale actions are not errors at all.

use pf_core::TaskName;
use pf_store::StoreError;
use thiserror::Error;

/// The external scheduler refused to enroll an action.
///
/// Never retried: a run with no scheduled next action has no path forward,
/// so the current operation aborts loudly instead of dropping work.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("scheduler refused to enroll '{action}': {reason}")]
    Enroll { action: String, reason: String },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Failure reported by a task hook (queue generator, chunk processor, or
/// cleanup).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TaskError(Box<dyn std::error::Error + Send + Sync>);

impl TaskError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }

    pub fn msg(message: impl Into<String>) -> Self {
        Self(message.into().into())
    }
}

impl From<StoreError> for TaskError {
    fn from(err: StoreError) -> Self {
        Self::new(err)
    }
}

/// Errors that can occur while handling a task action.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No task definition registered under this name. Programmer error —
    /// raised immediately, not a runtime condition to recover from.
    #[error("unknown task '{0}'")]
    UnknownTask(TaskName),
    /// Two task definitions claimed the same name at registry build time.
    #[error("duplicate task '{0}'")]
    DuplicateTask(TaskName),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A queue generator failed; the run cannot be materialized.
    #[error("task '{task}' failed to generate its queue: {source}")]
    QueueGeneration { task: TaskName, source: TaskError },
}

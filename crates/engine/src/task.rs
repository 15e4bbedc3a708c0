// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The background task contract and registry.
//!
//! A task is a named, versioned unit of importable work: it turns start
//! arguments into an ordered chunk list, processes one chunk at a time, and
//! optionally cleans up after the queue drains. Tasks are registered once
//! at startup into an explicit registry that the run manager holds by
//! reference — there is no ambient global lookup.

use crate::error::{EngineError, ScheduleError, TaskError};
use crate::scheduler::ActionScheduler;
use async_trait::async_trait;
use pf_core::{Args, RunId, TaskName};
use pf_store::KeyedStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Handle given to a chunk processor, scoped to one (task, run).
///
/// `push_front` is the continuation mechanism for open-ended pagination:
/// a chunk that discovers another results page pushes the next page's
/// arguments before returning, and the following `continue` picks it up
/// ahead of anything else queued.
pub struct ChunkContext<'a> {
    store: &'a dyn KeyedStore,
    task: &'a TaskName,
    run_id: &'a RunId,
}

impl<'a> ChunkContext<'a> {
    pub(crate) fn new(store: &'a dyn KeyedStore, task: &'a TaskName, run_id: &'a RunId) -> Self {
        Self { store, task, run_id }
    }

    pub fn run_id(&self) -> &RunId {
        self.run_id
    }

    /// Prepend a chunk to this run's work queue.
    pub fn push_front(&self, chunk: Args) -> Result<(), TaskError> {
        pf_store::runs::push_front(self.store, self.task, self.run_id, chunk)?;
        Ok(())
    }
}

/// A named background task definition.
#[async_trait]
pub trait BackgroundTask: Send + Sync {
    /// Stable task name; doubles as the action and storage namespace, so it
    /// must be unique across registered tasks.
    fn name(&self) -> TaskName;

    /// Enroll this task's kick-off schedule (once at a timestamp, or
    /// recurring at an interval). Configuration, not state machine.
    fn register(
        &self,
        scheduler: &dyn ActionScheduler,
        now_ms: u64,
    ) -> Result<(), ScheduleError>;

    /// Produce the run's initial chunk list. The default returns the start
    /// arguments as the single chunk, so single-chunk tasks work with zero
    /// ceremony.
    async fn generate_queue(
        &self,
        start_args: &Args,
        run_id: &RunId,
    ) -> Result<Vec<Args>, TaskError> {
        let _ = run_id;
        Ok(vec![start_args.clone()])
    }

    /// Perform one unit of work.
    async fn process_chunk(&self, ctx: &ChunkContext<'_>, chunk: Args) -> Result<(), TaskError>;

    /// Runs once after the queue drains. Default is a no-op.
    async fn cleanup(&self, run_id: &RunId) -> Result<(), TaskError> {
        let _ = run_id;
        Ok(())
    }
}

/// Explicit task registry, built once at startup.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: HashMap<TaskName, Arc<dyn BackgroundTask>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task definition. A duplicate name is a wiring mistake and is
    /// rejected.
    pub fn register(&mut self, task: Arc<dyn BackgroundTask>) -> Result<(), EngineError> {
        let name = task.name();
        if self.tasks.contains_key(&name) {
            return Err(EngineError::DuplicateTask(name));
        }
        self.tasks.insert(name, task);
        Ok(())
    }

    pub fn get(&self, name: &TaskName) -> Option<&Arc<dyn BackgroundTask>> {
        self.tasks.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &TaskName> {
        self.tasks.keys()
    }

    /// Enroll every task's kick-off schedule.
    pub fn register_schedules(
        &self,
        scheduler: &dyn ActionScheduler,
        now_ms: u64,
    ) -> Result<(), ScheduleError> {
        for task in self.tasks.values() {
            task.register(scheduler, now_ms)?;
        }
        Ok(())
    }
}

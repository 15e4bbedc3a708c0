// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actions delivered by the durable scheduler.
//!
//! A closed tagged union instead of string-composed hook names: the run
//! manager pattern-matches on the variant, and each variant carries a fixed
//! typed payload.

use crate::args::Args;
use crate::id::{RunId, TaskName};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Group tag binding every non-start action to one run.
///
/// `stop` cancels a whole run by cancelling its group, without enumerating
/// action kinds. Format is `{task}|{run_id}`; the tag is derived, never
/// parsed back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionGroup(SmolStr);

impl ActionGroup {
    pub fn for_run(task: &TaskName, run_id: &RunId) -> Self {
        Self(SmolStr::new(format!("{task}|{run_id}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Actions that drive the background task state machine.
///
/// Serializes with `{"type": "task:name", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TaskAction {
    #[serde(rename = "task:start")]
    Start { task: TaskName, args: Args },

    #[serde(rename = "task:continue")]
    Continue { task: TaskName, run_id: RunId },

    #[serde(rename = "task:run")]
    Run { task: TaskName, run_id: RunId, chunk: Args },

    #[serde(rename = "task:cleanup")]
    Cleanup { task: TaskName, run_id: RunId },
}

impl TaskAction {
    /// Action name for log spans.
    pub fn name(&self) -> &'static str {
        match self {
            TaskAction::Start { .. } => "start",
            TaskAction::Continue { .. } => "continue",
            TaskAction::Run { .. } => "run",
            TaskAction::Cleanup { .. } => "cleanup",
        }
    }

    pub fn task(&self) -> &TaskName {
        match self {
            TaskAction::Start { task, .. }
            | TaskAction::Continue { task, .. }
            | TaskAction::Run { task, .. }
            | TaskAction::Cleanup { task, .. } => task,
        }
    }

    /// The run this action belongs to. `Start` mints its run later, so it
    /// has none.
    pub fn run_id(&self) -> Option<&RunId> {
        match self {
            TaskAction::Start { .. } => None,
            TaskAction::Continue { run_id, .. }
            | TaskAction::Run { run_id, .. }
            | TaskAction::Cleanup { run_id, .. } => Some(run_id),
        }
    }

    /// Group for run-scoped actions; `Start` is never grouped.
    pub fn group(&self) -> Option<ActionGroup> {
        self.run_id().map(|run_id| ActionGroup::for_run(self.task(), run_id))
    }

    /// One-line summary for log output.
    pub fn log_summary(&self) -> String {
        match self.run_id() {
            Some(run_id) => format!("{}:{} run={}", self.task(), self.name(), run_id.short(8)),
            None => format!("{}:{}", self.task(), self.name()),
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task and run identifier types.
//!
//! A `TaskName` is a stable, human-chosen label that selects which task
//! definition handles an action. A `RunId` is minted fresh for every run of
//! a task and is the correlation key binding the run's queue, chunk actions,
//! and cleanup together.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Stable name of a background task (e.g. `initial_import`).
///
/// Never generated at runtime; doubles as the event namespace and the
/// storage-key namespace, so it must be unique across registered tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskName(SmolStr);

impl TaskName {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for TaskName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TaskName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Unique identifier for one run of a background task.
///
/// The format is `run-{nanoid}` where the nanoid is 19 random characters;
/// the total of 23 characters fits SmolStr inline capacity and carries
/// enough entropy that a collision over a task's operational lifetime is
/// negligible. Minted in `start`, buried by the next `start` for the same
/// task and arguments, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(SmolStr);

impl RunId {
    pub const PREFIX: &'static str = "run-";

    /// Mint a new random run identifier.
    pub fn mint() -> Self {
        Self(SmolStr::new(format!("{}{}", Self::PREFIX, nanoid::nanoid!(19))))
    }

    /// Rebuild an identifier from its stored form.
    pub fn from_string(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the suffix (without prefix) truncated to at most `n` characters.
    pub fn short(&self, n: usize) -> &str {
        let suffix = self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0);
        let end = std::cmp::min(n, suffix.len());
        &suffix[..end]
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl PartialEq<str> for RunId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RunId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;

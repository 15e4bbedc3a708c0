// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single-threaded worker loop.
//!
//! Actions run strictly one at a time; the only timing lever is the
//! scheduler's own due times. An action failure is logged and the loop
//! moves on — except scheduler enrollment failures, which mean the
//! environment is broken and stop the daemon.

use crate::error::DaemonError;
use pf_core::Clock;
use pf_engine::{EngineError, LocalScheduler, TaskRunner};
use std::sync::Arc;
use std::time::Duration;

/// How long to sleep when nothing is scheduled (new work may still be
/// enrolled by a restarted recurring action).
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Deliver every currently due action.
pub async fn drain_due<C: Clock>(
    scheduler: &LocalScheduler,
    runner: &TaskRunner<C>,
    clock: &C,
) -> Result<(), DaemonError> {
    for action in scheduler.due(clock.epoch_ms())? {
        match runner.handle(action).await {
            Ok(()) => {}
            Err(EngineError::Schedule(error)) => return Err(error.into()),
            Err(error) => tracing::error!(%error, "action failed"),
        }
    }
    Ok(())
}

/// Run until ctrl-c.
pub async fn run<C: Clock>(
    scheduler: Arc<LocalScheduler>,
    runner: TaskRunner<C>,
    clock: C,
) -> Result<(), DaemonError> {
    loop {
        let now = clock.epoch_ms();
        let wait = scheduler
            .next_due_ms()
            .map(|due| Duration::from_millis(due.saturating_sub(now)))
            .unwrap_or(IDLE_POLL)
            .min(IDLE_POLL);

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                return Ok(());
            }
            _ = tokio::time::sleep(wait) => {
                drain_due(&scheduler, &runner, &clock).await?;
            }
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon-level errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("store error: {0}")]
    Store(#[from] pf_store::StoreError),
    /// The scheduler refused an enrollment — configuration/environment
    /// fatal, the loop stops.
    #[error("schedule error: {0}")]
    Schedule(#[from] pf_engine::ScheduleError),
    #[error("engine error: {0}")]
    Engine(#[from] pf_engine::EngineError),
    #[error("sink error: {0}")]
    Sink(#[from] pf_import::SinkError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

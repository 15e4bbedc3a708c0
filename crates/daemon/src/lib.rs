// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pf-daemon: the photoflow importer daemon
//!
//! Wires the engine to the real world: TOML configuration, a file-backed
//! keyed store, the Flickr client, a filesystem content sink, and the
//! single-threaded worker loop that delivers due scheduler actions.

pub mod config;
pub mod error;
pub mod fs_sink;
pub mod worker;

pub use config::Config;
pub use error::DaemonError;
pub use fs_sink::FsSink;

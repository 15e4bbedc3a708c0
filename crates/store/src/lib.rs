// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pf-store: durable keyed storage and run bookkeeping
//!
//! The keyed store is the system of record for run identities, work queues,
//! and run history. It is deliberately dumb — string keys, JSON values —
//! and owns no invariants; those live in the engine, which re-validates
//! cross-key state via the staleness check instead of transactions.

pub mod keyed;
pub mod runs;

pub use keyed::{FileStore, KeyedStore, KeyedStoreExt, MemoryStore, StoreError};

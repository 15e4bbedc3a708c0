// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pf-import: Flickr importers and their background tasks
//!
//! Three tasks drive everything: the one-shot initial import, the hourly
//! fetch-latest refresh, and the twice-daily comment delta. Each is a thin
//! [`pf_engine::BackgroundTask`] over an importer that does the actual
//! fetching and hands results to the content sink.

pub mod comment_delta;
pub mod error;
pub mod photo_stream;
pub mod settings;
pub mod sink;
pub mod staging;
pub mod tasks;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use comment_delta::CommentDeltaImporter;
pub use error::ImportError;
pub use photo_stream::{ImportStep, PhotoStreamImporter};
pub use settings::Settings;
pub use sink::{ContentSink, NewComment, NewPost, SinkError};
pub use staging::Staging;
pub use tasks::{FetchCommentDeltaTask, FetchLatestTask, InitialImportTask};

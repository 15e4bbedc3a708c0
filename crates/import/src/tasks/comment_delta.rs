// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Twice-daily comment delta refresh.

use crate::comment_delta::CommentDeltaImporter;
use crate::settings::Settings;
use async_trait::async_trait;
use pf_core::{Args, RunId, TaskAction, TaskName};
use pf_engine::{ActionScheduler, BackgroundTask, ChunkContext, ScheduleError, TaskError};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60 * 60 * 12);

pub struct FetchCommentDeltaTask {
    importer: Arc<CommentDeltaImporter>,
    settings: Settings,
    interval: Duration,
}

impl FetchCommentDeltaTask {
    pub const NAME: &'static str = "fetch_comment_delta_import";

    pub fn new(importer: Arc<CommentDeltaImporter>, settings: Settings) -> Self {
        Self { importer, settings, interval: DEFAULT_INTERVAL }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

#[async_trait]
impl BackgroundTask for FetchCommentDeltaTask {
    fn name(&self) -> TaskName {
        TaskName::new(Self::NAME)
    }

    /// Recurring, first firing one interval out — comments can wait until
    /// the initial import has had time to land content.
    fn register(
        &self,
        scheduler: &dyn ActionScheduler,
        now_ms: u64,
    ) -> Result<(), ScheduleError> {
        let action = TaskAction::Start { task: self.name(), args: Args::new() };
        if !scheduler.has_pending(&action, None) {
            let first = now_ms + self.interval.as_millis() as u64;
            scheduler.schedule_recurring(first, self.interval, action)?;
        }
        Ok(())
    }

    async fn generate_queue(
        &self,
        _start_args: &Args,
        _run_id: &RunId,
    ) -> Result<Vec<Args>, TaskError> {
        // The fetch-latest task defers while this flag is up (shared API
        // rate budget)
        self.settings.set_comment_delta_running(true)?;
        Ok(vec![CommentDeltaImporter::chunk(1)])
    }

    async fn process_chunk(&self, ctx: &ChunkContext<'_>, chunk: Args) -> Result<(), TaskError> {
        let page = chunk.get_u64("page").unwrap_or(1);
        if let Some(next) = self.importer.run_page(page).await? {
            ctx.push_front(next)?;
        }
        Ok(())
    }

    async fn cleanup(&self, _run_id: &RunId) -> Result<(), TaskError> {
        self.settings.set_comment_delta_running(false)?;
        Ok(())
    }
}

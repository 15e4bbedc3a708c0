// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hourly incremental refresh of the photo stream.

use crate::photo_stream::{parse_chunk, ImportStep, PhotoStreamImporter};
use crate::settings::Settings;
use async_trait::async_trait;
use pf_core::{Args, Clock, RunId, TaskAction, TaskName};
use pf_engine::{ActionScheduler, BackgroundTask, ChunkContext, ScheduleError, TaskError};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub struct FetchLatestTask<C: Clock> {
    importer: Arc<PhotoStreamImporter>,
    settings: Settings,
    clock: C,
    interval: Duration,
}

impl<C: Clock> FetchLatestTask<C> {
    pub const NAME: &'static str = "fetch_latest_import";

    pub fn new(importer: Arc<PhotoStreamImporter>, settings: Settings, clock: C) -> Self {
        Self { importer, settings, clock, interval: DEFAULT_INTERVAL }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

#[async_trait]
impl<C: Clock> BackgroundTask for FetchLatestTask<C> {
    fn name(&self) -> TaskName {
        TaskName::new(Self::NAME)
    }

    /// Recurring, first firing right away.
    fn register(
        &self,
        scheduler: &dyn ActionScheduler,
        now_ms: u64,
    ) -> Result<(), ScheduleError> {
        let action = TaskAction::Start { task: self.name(), args: Args::new() };
        if !scheduler.has_pending(&action, None) {
            scheduler.schedule_recurring(now_ms, self.interval, action)?;
        }
        Ok(())
    }

    /// Defers (empty queue) until the initial import has stamped a
    /// watermark, and while the comment delta is draining the API budget.
    async fn generate_queue(
        &self,
        _start_args: &Args,
        _run_id: &RunId,
    ) -> Result<Vec<Args>, TaskError> {
        let watermark = self.settings.latest_import_time()?;
        let delta_running = self.settings.comment_delta_running()?;

        let Some(watermark) = watermark else {
            return Ok(vec![]);
        };
        if delta_running {
            return Ok(vec![]);
        }

        // This run imports everything since the previous watermark; the next
        // one picks up from this run's start.
        self.settings.set_current_latest_import_time(watermark)?;
        self.settings.set_latest_import_time(self.clock.epoch_ms() / 1000)?;
        self.settings.set_import_running(true)?;

        Ok(vec![ImportStep::Photosets.chunk(1)])
    }

    async fn process_chunk(&self, ctx: &ChunkContext<'_>, chunk: Args) -> Result<(), TaskError> {
        if chunk.is_empty() {
            return Ok(());
        }
        let Some(since) = self.settings.current_latest_import_time()? else {
            return Ok(());
        };

        let (step, page) = parse_chunk(&chunk)?;
        if let Some(next) = self.importer.run_step(step, page, Some(since)).await? {
            ctx.push_front(next)?;
        }
        Ok(())
    }

    async fn cleanup(&self, _run_id: &RunId) -> Result<(), TaskError> {
        self.importer.finish()?;
        self.settings.set_import_running(false)?;
        Ok(())
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot initial import of the whole photo stream.

use crate::photo_stream::{parse_chunk, ImportStep, PhotoStreamImporter};
use crate::settings::Settings;
use async_trait::async_trait;
use pf_core::{Args, Clock, RunId, TaskAction, TaskName};
use pf_engine::{ActionScheduler, BackgroundTask, ChunkContext, ScheduleError, TaskError};
use std::sync::Arc;

pub struct InitialImportTask<C: Clock> {
    importer: Arc<PhotoStreamImporter>,
    settings: Settings,
    clock: C,
}

impl<C: Clock> InitialImportTask<C> {
    pub const NAME: &'static str = "initial_import";

    pub fn new(importer: Arc<PhotoStreamImporter>, settings: Settings, clock: C) -> Self {
        Self { importer, settings, clock }
    }
}

#[async_trait]
impl<C: Clock> BackgroundTask for InitialImportTask<C> {
    fn name(&self) -> TaskName {
        TaskName::new(Self::NAME)
    }

    /// Kick off once, right away. A finished import never re-registers, and
    /// an interrupted one resumes from its persisted queue instead of
    /// starting over.
    fn register(
        &self,
        scheduler: &dyn ActionScheduler,
        now_ms: u64,
    ) -> Result<(), ScheduleError> {
        if self.settings.initial_import_finished()? || self.settings.initial_import_running()? {
            return Ok(());
        }

        let action = TaskAction::Start { task: self.name(), args: Args::new() };
        if !scheduler.has_pending(&action, None) {
            scheduler.schedule_at(now_ms, action, None)?;
        }
        Ok(())
    }

    async fn generate_queue(
        &self,
        _start_args: &Args,
        _run_id: &RunId,
    ) -> Result<Vec<Args>, TaskError> {
        let now_secs = self.clock.epoch_ms() / 1000;
        self.settings.set_latest_import_time(now_secs)?;
        self.settings.set_initial_import_running(true)?;

        Ok(vec![ImportStep::Photosets.chunk(1)])
    }

    async fn process_chunk(&self, ctx: &ChunkContext<'_>, chunk: Args) -> Result<(), TaskError> {
        let (step, page) = parse_chunk(&chunk)?;
        if let Some(next) = self.importer.run_step(step, page, None).await? {
            ctx.push_front(next)?;
        }
        Ok(())
    }

    async fn cleanup(&self, _run_id: &RunId) -> Result<(), TaskError> {
        self.importer.finish()?;
        self.settings.set_initial_import_finished(true)?;
        self.settings.set_import_running(false)?;
        self.settings.set_initial_import_running(false)?;

        // In place of the original notification mail
        tracing::info!("initial flickr import complete; periodic refresh takes over from here");
        Ok(())
    }
}

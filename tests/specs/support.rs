// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared spec harness: a whole importer world on fakes.

use pf_core::{Clock, FakeClock};
use pf_engine::{ActionScheduler, LocalScheduler, TaskRegistry, TaskRunner};
use pf_flickr::FlickrApi;
use pf_import::test_support::{FakeFlickr, MemorySink};
use pf_import::{
    CommentDeltaImporter, ContentSink, FetchCommentDeltaTask, FetchLatestTask, InitialImportTask,
    PhotoStreamImporter, Settings, Staging,
};
use pf_store::{KeyedStore, MemoryStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const NSID: &str = "12345@N00";

/// Which task definitions a world carries.
#[derive(Clone, Copy)]
pub struct TaskSet {
    pub initial: bool,
    pub fetch_latest: bool,
    pub comment_delta: bool,
}

impl TaskSet {
    pub fn initial_only() -> Self {
        Self { initial: true, fetch_latest: false, comment_delta: false }
    }

    pub fn with_fetch_latest() -> Self {
        Self { initial: true, fetch_latest: true, comment_delta: false }
    }

    pub fn fetch_latest_only() -> Self {
        Self { initial: false, fetch_latest: true, comment_delta: false }
    }

    pub fn with_comment_delta() -> Self {
        Self { initial: true, fetch_latest: false, comment_delta: true }
    }
}

pub struct World {
    pub store: Arc<MemoryStore>,
    pub scheduler: Arc<LocalScheduler>,
    pub clock: FakeClock,
    pub flickr: Arc<FakeFlickr>,
    pub sink: Arc<MemorySink>,
    pub settings: Settings,
    pub runner: TaskRunner<FakeClock>,
    tasks: TaskSet,
    dir: TempDir,
}

impl World {
    pub fn new(tasks: TaskSet) -> World {
        let store = Arc::new(MemoryStore::new());
        let clock = FakeClock::new();
        clock.set_epoch_ms(1_700_000_000_000);
        let flickr = Arc::new(FakeFlickr::new(NSID));
        let sink = Arc::new(MemorySink::new());
        let dir = TempDir::new().expect("tempdir");

        Self::build(store, clock, flickr, sink, tasks, dir)
    }

    /// Rebuild the scheduler and runner over the same durable state —
    /// a process restart, as far as the engine can tell.
    pub fn restart(self) -> World {
        let World { store, clock, flickr, sink, tasks, dir, .. } = self;
        Self::build(store, clock, flickr, sink, tasks, dir)
    }

    fn build(
        store: Arc<MemoryStore>,
        clock: FakeClock,
        flickr: Arc<FakeFlickr>,
        sink: Arc<MemorySink>,
        tasks: TaskSet,
        dir: TempDir,
    ) -> World {
        let settings = Settings::new(Arc::clone(&store) as Arc<dyn KeyedStore>);
        settings.set_credentials("key", "secret", "alice", "editor").expect("credentials");

        let scheduler =
            LocalScheduler::open(Arc::clone(&store) as Arc<dyn KeyedStore>).expect("scheduler");
        let scheduler = Arc::new(scheduler);

        let photo_stream = Arc::new(PhotoStreamImporter::new(
            Arc::clone(&flickr) as Arc<dyn FlickrApi>,
            Arc::clone(&sink) as Arc<dyn ContentSink>,
            settings.clone(),
            Staging::new(dir.path().join("staging")),
        ));
        let comment_delta = Arc::new(CommentDeltaImporter::new(
            Arc::clone(&flickr) as Arc<dyn FlickrApi>,
            Arc::clone(&sink) as Arc<dyn ContentSink>,
            settings.clone(),
        ));

        let mut registry = TaskRegistry::new();
        if tasks.initial {
            registry
                .register(Arc::new(InitialImportTask::new(
                    Arc::clone(&photo_stream),
                    settings.clone(),
                    clock.clone(),
                )))
                .expect("register initial");
        }
        if tasks.fetch_latest {
            registry
                .register(Arc::new(FetchLatestTask::new(
                    Arc::clone(&photo_stream),
                    settings.clone(),
                    clock.clone(),
                )))
                .expect("register fetch latest");
        }
        if tasks.comment_delta {
            registry
                .register(Arc::new(FetchCommentDeltaTask::new(
                    Arc::clone(&comment_delta),
                    settings.clone(),
                )))
                .expect("register comment delta");
        }
        let registry = Arc::new(registry);

        let runner = TaskRunner::new(
            Arc::clone(&store) as Arc<dyn KeyedStore>,
            Arc::clone(&scheduler) as Arc<dyn ActionScheduler>,
            Arc::clone(&registry),
            clock.clone(),
        );

        registry
            .register_schedules(&*scheduler, clock.epoch_ms())
            .expect("register schedules");

        World { store, scheduler, clock, flickr, sink, settings, runner, tasks, dir }
    }

    /// Process due actions, advancing the clock deadline by deadline, for
    /// up to `duration` of simulated time.
    pub async fn pump_for(&self, duration: Duration) {
        let deadline = self.clock.epoch_ms() + duration.as_millis() as u64;
        let mut steps = 0;
        while let Some(due) = self.scheduler.next_due_ms() {
            if due > deadline {
                break;
            }
            if due > self.clock.epoch_ms() {
                self.clock.set_epoch_ms(due);
            }
            for action in self.scheduler.due(self.clock.epoch_ms()).expect("due") {
                self.runner.handle(action).await.expect("handle");
            }
            steps += 1;
            assert!(steps < 1_000, "spec pump did not converge");
        }
        if deadline > self.clock.epoch_ms() {
            self.clock.set_epoch_ms(deadline);
        }
    }

    /// Pump a single due batch (one scheduler deadline).
    pub async fn pump_one(&self) {
        let Some(due) = self.scheduler.next_due_ms() else { return };
        if due > self.clock.epoch_ms() {
            self.clock.set_epoch_ms(due);
        }
        for action in self.scheduler.due(self.clock.epoch_ms()).expect("due") {
            self.runner.handle(action).await.expect("handle");
        }
    }
}

/// Enough simulated time for an import with minute-spaced continues, kept
/// shy of the hourly refresh recurrence.
pub const IMPORT_WINDOW: Duration = Duration::from_secs(55 * 60);

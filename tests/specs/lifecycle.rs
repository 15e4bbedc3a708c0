// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run lifecycle under restarts and duplicate triggers.

use crate::support::{TaskSet, World, IMPORT_WINDOW};
use pf_core::{Args, TaskName};
use pf_import::test_support::photo;

#[tokio::test]
async fn interrupted_import_resumes_after_restart() {
    let world = World::new(TaskSet::initial_only());
    world.flickr.add_photo_page(vec![photo("53001", 100)]);
    world.flickr.add_photo_page(vec![photo("53002", 200)]);

    // Start and process only the first couple of deadlines, then "crash"
    world.pump_one().await;
    world.pump_one().await;
    let imported_before = world.sink.posts().len();
    assert!(imported_before < 2, "import should still be in flight");

    let world = world.restart();
    world.pump_for(IMPORT_WINDOW).await;

    // The persisted queue and pending actions carried the run through
    assert_eq!(world.sink.posts().len(), 2);
    let completed =
        pf_store::runs::completed_history(&*world.store, &TaskName::new("initial_import"), None)
            .unwrap();
    assert_eq!(completed.len(), 1);
}

#[tokio::test]
async fn duplicate_triggers_leave_one_surviving_run() {
    let world = World::new(TaskSet::initial_only());
    world.flickr.add_photo_page(vec![photo("53001", 100)]);

    // A second admin trigger while the first start is still pending is
    // de-duplicated outright
    let first = world.runner.enqueue_task(&TaskName::new("initial_import"), Args::new()).unwrap();
    let second = world.runner.enqueue_task(&TaskName::new("initial_import"), Args::new()).unwrap();
    assert!(first.is_none() || second.is_none());

    world.pump_for(IMPORT_WINDOW).await;

    let task = TaskName::new("initial_import");
    let started = pf_store::runs::started_history(&*world.store, &task, None).unwrap();
    let completed = pf_store::runs::completed_history(&*world.store, &task, None).unwrap();

    // However many runs started, only the survivor completed and content
    // is not duplicated
    assert_eq!(completed.len(), 1);
    assert!(started.contains(&completed[0]));
    assert_eq!(world.sink.posts().len(), 1);
}

#[tokio::test]
async fn fetch_latest_defers_until_a_watermark_exists() {
    let world = World::new(TaskSet::fetch_latest_only());

    // No initial watermark yet: the first recurring run degenerates to a
    // cleanup-only pass
    world.pump_one().await;
    world.pump_for(std::time::Duration::from_secs(120)).await;

    let completed = pf_store::runs::completed_history(
        &*world.store,
        &TaskName::new("fetch_latest_import"),
        None,
    )
    .unwrap();
    assert!(!completed.is_empty());
    assert_eq!(world.sink.posts().len(), 0);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic refreshes on top of a finished initial import.

use crate::support::{TaskSet, World, IMPORT_WINDOW};
use pf_import::test_support::{comment, photo};
use std::time::Duration;

#[tokio::test]
async fn comment_delta_picks_up_late_comments() {
    let world = World::new(TaskSet::with_comment_delta());
    world.flickr.add_photo_page(vec![photo("53001", 100)]);
    world.flickr.set_comments("53001", vec![comment("c-1", "bob", 1_000, "nice")]);

    world.pump_for(IMPORT_WINDOW).await;
    assert_eq!(world.sink.post_for_media("53001").unwrap().comments.len(), 1);

    // A comment lands on Flickr after the import finished
    world.flickr.set_comments(
        "53001",
        vec![comment("c-1", "bob", 1_000, "nice"), comment("c-2", "eve", 2_000, "late!")],
    );

    // The delta task first fires twelve hours out
    world.pump_for(Duration::from_secs(13 * 60 * 60)).await;

    let comments = world.sink.post_for_media("53001").unwrap().comments;
    assert_eq!(comments.len(), 2);
    assert!(comments.iter().any(|c| c.body == "late!"));
    assert!(!world.settings.comment_delta_running().unwrap());
}

#[tokio::test]
async fn fetch_latest_imports_only_new_uploads() {
    let world = World::new(TaskSet::with_fetch_latest());
    world.flickr.add_photo_page(vec![photo("53001", 100)]);

    world.pump_for(IMPORT_WINDOW).await;
    assert!(world.sink.post_for_media("53001").is_some());

    // A new upload appears, dated after the first run's watermark
    world.flickr.add_photo_page(vec![photo("53099", 1_900_000_000)]);

    // The hourly refresh picks it up on its next firing
    world.pump_for(Duration::from_secs(2 * 60 * 60)).await;

    assert!(world.sink.post_for_media("53099").is_some());
    assert_eq!(world.sink.posts().len(), 2);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The content sink boundary.
//!
//! Imported items become durable content records somewhere else — the
//! engine only cares whether each call succeeded. Identity is carried by
//! the Flickr media/comment ids so every operation is safely repeatable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown post '{0}'")]
    UnknownPost(String),
}

/// A post to create for one imported media item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    /// Flickr media id; the dedup key for the whole record.
    pub media_id: String,
    pub title: String,
    pub body: String,
    /// Content author the operator configured, if any.
    pub author: Option<String>,
    /// Upload time, epoch seconds; doubles as the publish date.
    pub uploaded_epoch: u64,
    pub taken: Option<String>,
    pub tags: Vec<String>,
    /// Category ids from [`ContentSink::upsert_category`].
    pub categories: Vec<String>,
}

/// A comment to attach to an imported post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub comment_id: String,
    pub author_nsid: String,
    pub author_name: String,
    pub author_realname: String,
    pub created_epoch: u64,
    pub body: String,
}

/// Where imported content lands.
#[async_trait]
pub trait ContentSink: Send + Sync {
    /// Post id previously created for this media item, if any.
    async fn find_post_for_media(&self, media_id: &str) -> Result<Option<String>, SinkError>;

    /// Create (or return) the category for a Flickr album. Returns its id.
    async fn upsert_category(
        &self,
        album_id: &str,
        name: &str,
        description: &str,
    ) -> Result<String, SinkError>;

    /// Create the post and return its id.
    async fn create_post(&self, post: NewPost) -> Result<String, SinkError>;

    /// Attach a downloaded media file to a post; returns the attachment id.
    async fn attach_media(&self, post_id: &str, source: &Path) -> Result<String, SinkError>;

    /// Drop every comment on a post (clean slate before re-import).
    async fn clear_comments(&self, post_id: &str) -> Result<(), SinkError>;

    /// Does a comment by this author at this time already exist?
    async fn comment_exists(
        &self,
        post_id: &str,
        author_name: &str,
        created_epoch: u64,
    ) -> Result<bool, SinkError>;

    async fn insert_comment(&self, post_id: &str, comment: NewComment) -> Result<(), SinkError>;

    /// Stable-ordered page of every imported media id, for delta refreshes.
    async fn imported_media_ids(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<String>, SinkError>;

    async fn imported_media_count(&self) -> Result<usize, SinkError>;
}

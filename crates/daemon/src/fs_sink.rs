// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem content sink.
//!
//! Posts are one JSON document each under `posts/`, media files are copied
//! into `media/{post_id}/`, and categories live in `categories.json`. The
//! post id is derived from the Flickr media id, so re-creating a record is
//! naturally idempotent.

use async_trait::async_trait;
use parking_lot::Mutex;
use pf_import::{ContentSink, NewComment, NewPost, SinkError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PostDoc {
    id: String,
    post: NewPost,
    attachments: Vec<String>,
    comments: Vec<NewComment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Category {
    id: String,
    name: String,
    description: String,
}

#[derive(Default)]
struct Index {
    /// media id → post document
    posts: BTreeMap<String, PostDoc>,
    /// album id → category
    categories: BTreeMap<String, Category>,
}

pub struct FsSink {
    root: PathBuf,
    index: Mutex<Index>,
}

impl FsSink {
    /// Open the sink rooted at `root`, loading every existing post doc.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let root = root.into();
        fs::create_dir_all(root.join("posts"))?;

        let mut index = Index::default();
        for entry in fs::read_dir(root.join("posts"))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let doc: PostDoc = serde_json::from_str(&fs::read_to_string(&path)?)?;
            index.posts.insert(doc.post.media_id.clone(), doc);
        }

        let categories_path = root.join("categories.json");
        if categories_path.exists() {
            index.categories = serde_json::from_str(&fs::read_to_string(&categories_path)?)?;
        }

        Ok(Self { root, index: Mutex::new(index) })
    }

    fn post_path(&self, post_id: &str) -> PathBuf {
        self.root.join("posts").join(format!("{post_id}.json"))
    }

    fn write_post(&self, doc: &PostDoc) -> Result<(), SinkError> {
        fs::write(self.post_path(&doc.id), serde_json::to_vec_pretty(doc)?)?;
        Ok(())
    }

    fn write_categories(&self, categories: &BTreeMap<String, Category>) -> Result<(), SinkError> {
        fs::write(self.root.join("categories.json"), serde_json::to_vec_pretty(categories)?)?;
        Ok(())
    }

    fn with_post<T>(
        &self,
        post_id: &str,
        apply: impl FnOnce(&mut PostDoc) -> T,
    ) -> Result<T, SinkError> {
        let mut index = self.index.lock();
        let doc = index
            .posts
            .values_mut()
            .find(|d| d.id == post_id)
            .ok_or_else(|| SinkError::UnknownPost(post_id.to_string()))?;
        let result = apply(doc);
        let doc = doc.clone();
        drop(index);
        self.write_post(&doc)?;
        Ok(result)
    }
}

#[async_trait]
impl ContentSink for FsSink {
    async fn find_post_for_media(&self, media_id: &str) -> Result<Option<String>, SinkError> {
        Ok(self.index.lock().posts.get(media_id).map(|d| d.id.clone()))
    }

    async fn upsert_category(
        &self,
        album_id: &str,
        name: &str,
        description: &str,
    ) -> Result<String, SinkError> {
        let mut index = self.index.lock();
        if let Some(category) = index.categories.get(album_id) {
            return Ok(category.id.clone());
        }

        let category = Category {
            id: format!("cat-{album_id}"),
            name: name.to_string(),
            description: description.to_string(),
        };
        let id = category.id.clone();
        index.categories.insert(album_id.to_string(), category);
        let categories = index.categories.clone();
        drop(index);
        self.write_categories(&categories)?;
        Ok(id)
    }

    async fn create_post(&self, post: NewPost) -> Result<String, SinkError> {
        let doc = PostDoc {
            id: format!("post-{}", post.media_id),
            post,
            attachments: vec![],
            comments: vec![],
        };
        let id = doc.id.clone();
        self.write_post(&doc)?;
        self.index.lock().posts.insert(doc.post.media_id.clone(), doc);
        Ok(id)
    }

    async fn attach_media(&self, post_id: &str, source: &Path) -> Result<String, SinkError> {
        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("media.bin")
            .to_string();
        let dir = self.root.join("media").join(post_id);
        fs::create_dir_all(&dir)?;
        let target = dir.join(&file_name);
        fs::copy(source, &target)?;

        let attachment = target.display().to_string();
        self.with_post(post_id, |doc| {
            if !doc.attachments.contains(&attachment) {
                doc.attachments.push(attachment.clone());
            }
        })?;
        Ok(format!("att-{post_id}-{file_name}"))
    }

    async fn clear_comments(&self, post_id: &str) -> Result<(), SinkError> {
        self.with_post(post_id, |doc| doc.comments.clear())
    }

    async fn comment_exists(
        &self,
        post_id: &str,
        author_name: &str,
        created_epoch: u64,
    ) -> Result<bool, SinkError> {
        Ok(self.index.lock().posts.values().any(|d| {
            d.id == post_id
                && d.comments
                    .iter()
                    .any(|c| c.author_name == author_name && c.created_epoch == created_epoch)
        }))
    }

    async fn insert_comment(&self, post_id: &str, comment: NewComment) -> Result<(), SinkError> {
        self.with_post(post_id, |doc| doc.comments.push(comment))
    }

    async fn imported_media_ids(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<String>, SinkError> {
        // BTreeMap keys are already in stable order
        Ok(self.index.lock().posts.keys().skip(offset).take(limit).cloned().collect())
    }

    async fn imported_media_count(&self) -> Result<usize, SinkError> {
        Ok(self.index.lock().posts.len())
    }
}

#[cfg(test)]
#[path = "fs_sink_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Comment delta import.
//!
//! Walks every already-imported media item in stable pages, refetches its
//! comments, and inserts the ones that are missing. Paging is open-ended
//! the same way the photo stream is: each page reports the next page's
//! arguments until the imported set is exhausted.

use crate::error::ImportError;
use crate::settings::Settings;
use crate::sink::{ContentSink, NewComment};
use pf_core::Args;
use pf_flickr::FlickrApi;
use std::sync::Arc;

const DEFAULT_PER_PAGE: usize = 300;

pub struct CommentDeltaImporter {
    flickr: Arc<dyn FlickrApi>,
    sink: Arc<dyn ContentSink>,
    settings: Settings,
    per_page: usize,
}

impl CommentDeltaImporter {
    pub fn new(flickr: Arc<dyn FlickrApi>, sink: Arc<dyn ContentSink>, settings: Settings) -> Self {
        Self { flickr, sink, settings, per_page: DEFAULT_PER_PAGE }
    }

    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    /// Chunk arguments for one delta page.
    pub fn chunk(page: u64) -> Args {
        Args::new().with("page", page)
    }

    /// Refresh comments for one page of imported media. Returns the next
    /// page's arguments while pages remain.
    pub async fn run_page(&self, page: u64) -> Result<Option<Args>, ImportError> {
        // Fail early when the configured account is wrong
        let username =
            self.settings.username()?.ok_or(ImportError::MissingSetting("username"))?;
        self.flickr.find_user_by_username(&username).await?;

        let page = page.max(1);
        let total = self.sink.imported_media_count().await?;
        let total_pages = total.div_ceil(self.per_page) as u64;

        let offset = (page as usize - 1) * self.per_page;
        let media_ids = self.sink.imported_media_ids(offset, self.per_page).await?;
        if media_ids.is_empty() {
            return Ok(None);
        }

        tracing::info!(page, total_pages, items = media_ids.len(), "refreshing comment page");
        for media_id in &media_ids {
            if let Err(error) = self.refresh_one(media_id).await {
                tracing::error!(media_id = %media_id, %error, "failed to refresh comments");
            }
        }

        if page < total_pages {
            Ok(Some(Self::chunk(page + 1)))
        } else {
            Ok(None)
        }
    }

    async fn refresh_one(&self, media_id: &str) -> Result<(), ImportError> {
        let Some(post_id) = self.sink.find_post_for_media(media_id).await? else {
            // The id came from the sink, so this only happens when content
            // was deleted mid-run
            return Ok(());
        };

        for comment in self.flickr.comments_for_photo(media_id).await? {
            let created = comment.created_epoch().unwrap_or(0);
            if self.sink.comment_exists(&post_id, &comment.authorname, created).await? {
                continue;
            }
            self.sink
                .insert_comment(
                    &post_id,
                    NewComment {
                        comment_id: comment.id.clone(),
                        author_nsid: comment.author.clone(),
                        author_name: comment.authorname.clone(),
                        author_realname: comment.realname.clone(),
                        created_epoch: created,
                        body: comment.content.clone(),
                    },
                )
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "comment_delta_tests.rs"]
mod tests;

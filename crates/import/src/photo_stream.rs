// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chunked photo-stream import.
//!
//! The stream is consumed in two kinds of chunks: one `photosets` chunk
//! that stages every album's photo listing, then one `media` chunk per
//! photo-stream page. Each chunk reports the next chunk's arguments (if
//! any), which the owning task pushes to the front of its run queue — the
//! total page count is unknown up front, so pagination is open-ended.

use crate::error::ImportError;
use crate::settings::Settings;
use crate::sink::{ContentSink, NewComment, NewPost};
use crate::staging::{AlbumRef, Staging};
use pf_core::Args;
use pf_flickr::{Comment, FlickrApi, Photo, PhotoQuery};
use std::collections::HashMap;
use std::sync::Arc;

const PHOTOSET_PAGE_SIZE: u32 = 500;

/// What a chunk of the photo-stream import does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStep {
    /// Stage album listings for category resolution.
    Photosets,
    /// Import one page of the user's photo stream.
    Media,
}

impl ImportStep {
    pub fn as_str(self) -> &'static str {
        match self {
            ImportStep::Photosets => "photosets",
            ImportStep::Media => "media",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "photosets" => Some(ImportStep::Photosets),
            "media" => Some(ImportStep::Media),
            _ => None,
        }
    }

    /// Chunk arguments for this step at `page`.
    pub fn chunk(self, page: u32) -> Args {
        Args::new().with("action", self.as_str()).with("page", page)
    }
}

/// Parse `(step, page)` out of chunk arguments.
pub fn parse_chunk(args: &Args) -> Result<(ImportStep, u32), ImportError> {
    let action = args
        .get_str("action")
        .ok_or_else(|| ImportError::InvalidChunk(format!("missing action in {args:?}")))?;
    let step = ImportStep::parse(action)
        .ok_or_else(|| ImportError::InvalidChunk(format!("unknown action '{action}'")))?;
    let page = args.get_u64("page").unwrap_or(1) as u32;
    Ok((step, page))
}

pub struct PhotoStreamImporter {
    flickr: Arc<dyn FlickrApi>,
    sink: Arc<dyn ContentSink>,
    settings: Settings,
    staging: Staging,
}

impl PhotoStreamImporter {
    pub fn new(
        flickr: Arc<dyn FlickrApi>,
        sink: Arc<dyn ContentSink>,
        settings: Settings,
        staging: Staging,
    ) -> Self {
        Self { flickr, sink, settings, staging }
    }

    /// Drive one chunk. Returns the next chunk's arguments while more work
    /// remains; `since` restricts media pages to photos uploaded after the
    /// watermark (incremental refresh).
    pub async fn run_step(
        &self,
        step: ImportStep,
        page: u32,
        since: Option<u64>,
    ) -> Result<Option<Args>, ImportError> {
        match step {
            ImportStep::Photosets => self.stage_photosets().await,
            ImportStep::Media => self.import_media_page(page, since).await,
        }
    }

    /// Wipe the staging area after the queue drains.
    pub fn finish(&self) -> Result<(), ImportError> {
        self.staging.clear()
    }

    async fn resolve_user(&self) -> Result<String, ImportError> {
        let username =
            self.settings.username()?.ok_or(ImportError::MissingSetting("username"))?;
        let user = self.flickr.find_user_by_username(&username).await?;
        Ok(user.nsid)
    }

    /// Stage every photoset's full photo listing, then hand off to the
    /// first media page. Listings staged by an earlier attempt are kept.
    async fn stage_photosets(&self) -> Result<Option<Args>, ImportError> {
        let nsid = self.resolve_user().await?;
        let photosets = self.flickr.photosets_for_user(&nsid).await?;

        for photoset in &photosets {
            if self.staging.has_photoset_listing(&photoset.id) {
                continue;
            }

            let mut photos = Vec::new();
            let mut page = 1;
            loop {
                let listing = self
                    .flickr
                    .photos_for_photoset(&photoset.id, page, PHOTOSET_PAGE_SIZE)
                    .await?;
                photos.extend(listing.photo);
                if listing.page >= listing.pages {
                    break;
                }
                page += 1;
            }
            self.staging.save_photoset_listing(photoset, &photos)?;
            tracing::info!(photoset_id = %photoset.id, photos = photos.len(), "staged photoset listing");
        }

        Ok(Some(ImportStep::Media.chunk(1)))
    }

    /// Import one photo-stream page: meta, comments, the original file, and
    /// the content records. Item failures are logged and skipped; the page
    /// as a whole still completes.
    async fn import_media_page(
        &self,
        page: u32,
        since: Option<u64>,
    ) -> Result<Option<Args>, ImportError> {
        let nsid = self.resolve_user().await?;

        let mut query = PhotoQuery::import_defaults(page);
        if let Some(since) = since {
            query = query.since(since);
        }
        let photos = self.flickr.photos_for_user(&nsid, &query).await?;
        let memberships = self.staging.album_memberships()?;

        tracing::info!(page = photos.page, pages = photos.pages, items = photos.photo.len(), "importing media page");
        for photo in &photos.photo {
            if let Err(error) = self.import_one(photo, &memberships).await {
                tracing::error!(media_id = %photo.id, %error, "failed to import media item");
            }
        }

        if photos.pages > 0 && photos.page < photos.pages {
            Ok(Some(ImportStep::Media.chunk(photos.page + 1)))
        } else {
            Ok(None)
        }
    }

    async fn import_one(
        &self,
        photo: &Photo,
        memberships: &HashMap<String, Vec<AlbumRef>>,
    ) -> Result<(), ImportError> {
        if self.sink.find_post_for_media(&photo.id).await?.is_some() {
            tracing::info!(media_id = %photo.id, "skipping already imported media");
            return Ok(());
        }

        let mut categories = Vec::new();
        if let Some(albums) = memberships.get(&photo.id) {
            for album in albums {
                categories
                    .push(self.sink.upsert_category(&album.id, &album.title, &album.description).await?);
            }
        }

        let url = if photo.is_video() {
            self.video_source(photo).await?
        } else {
            photo.url_o.clone().ok_or_else(|| ImportError::NoOriginalUrl(photo.id.clone()))?
        };
        let bytes = self.flickr.download(&url).await?;
        let extension = photo
            .originalformat
            .clone()
            .unwrap_or_else(|| if photo.is_video() { "mp4".into() } else { "jpg".into() });
        let staged = self.staging.save_media_file(&photo.media, &photo.id, &extension, &bytes)?;

        let post = NewPost {
            media_id: photo.id.clone(),
            title: photo.title.clone(),
            body: photo.description.content.clone(),
            author: self.settings.site_author_username()?,
            uploaded_epoch: photo.uploaded_epoch().unwrap_or(0),
            taken: photo.datetaken.clone(),
            tags: photo
                .tags
                .as_deref()
                .unwrap_or("")
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            categories,
        };
        let post_id = self.sink.create_post(post).await?;
        self.sink.attach_media(&post_id, &staged).await?;

        // Clean comment slate, then import the current set
        let comments = self.flickr.comments_for_photo(&photo.id).await?;
        self.sink.clear_comments(&post_id).await?;
        for comment in comments {
            if let Err(error) =
                self.sink.insert_comment(&post_id, new_comment(&comment)).await
            {
                tracing::error!(
                    media_id = %photo.id,
                    comment_id = %comment.id,
                    %error,
                    "failed to import comment"
                );
            }
        }

        tracing::info!(media_id = %photo.id, post_id = %post_id, "imported media item");
        Ok(())
    }

    /// Videos don't carry `url_o`; the downloadable rendition comes from
    /// the sizes listing, matched by the original height when known.
    async fn video_source(&self, photo: &Photo) -> Result<String, ImportError> {
        let sizes = self.flickr.photo_sizes(&photo.id).await?;
        let videos: Vec<_> =
            sizes.iter().filter(|s| s.media.as_deref() == Some("video")).collect();

        let best = match photo.original_height() {
            Some(height) => videos
                .iter()
                .find(|s| s.height_u64() == Some(height))
                .or_else(|| videos.first()),
            None => videos.first(),
        };
        best.map(|s| s.source.clone()).ok_or_else(|| ImportError::NoVideoSource(photo.id.clone()))
    }
}

fn new_comment(comment: &Comment) -> NewComment {
    NewComment {
        comment_id: comment.id.clone(),
        author_nsid: comment.author.clone(),
        author_name: comment.authorname.clone(),
        author_realname: comment.realname.clone(),
        created_epoch: comment.created_epoch().unwrap_or(0),
        body: comment.content.clone(),
    }
}

#[cfg(test)]
#[path = "photo_stream_tests.rs"]
mod tests;

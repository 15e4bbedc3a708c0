// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test doubles for importer consumers: a canned Flickr API and an
//! in-memory content sink.

use crate::sink::{ContentSink, NewComment, NewPost, SinkError};
use async_trait::async_trait;
use parking_lot::Mutex;
use pf_flickr::{
    Comment, Content, FlickrApi, FlickrError, FlickrUser, Photo, PhotoPage, PhotoQuery, PhotoRef,
    Photoset, PhotosetPhotos, SizeEntry,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Build a photo-stream item with sensible defaults.
pub fn photo(id: &str, uploaded: u64) -> Photo {
    Photo {
        id: id.to_string(),
        title: format!("photo {id}"),
        media: "photo".to_string(),
        url_o: Some(format!("https://fake.flickr/{id}_o.jpg")),
        originalformat: Some("jpg".to_string()),
        dateupload: Some(serde_json::json!(uploaded.to_string())),
        datetaken: Some("2024-01-20 17:31:02".to_string()),
        tags: Some("test".to_string()),
        description: Content { content: format!("description {id}") },
        height_o: None,
    }
}

/// Build a video item (no `url_o`; source resolves through sizes).
pub fn video(id: &str, uploaded: u64, height: u64) -> Photo {
    Photo {
        url_o: None,
        media: "video".to_string(),
        originalformat: Some("mp4".to_string()),
        height_o: Some(serde_json::json!(height)),
        ..photo(id, uploaded)
    }
}

pub fn comment(id: &str, author_name: &str, created: u64, body: &str) -> Comment {
    Comment {
        id: id.to_string(),
        author: format!("{author_name}@nsid"),
        authorname: author_name.to_string(),
        realname: String::new(),
        datecreate: Some(serde_json::json!(created.to_string())),
        content: body.to_string(),
    }
}

#[derive(Default)]
struct FlickrState {
    photosets: Vec<(Photoset, Vec<PhotoRef>)>,
    photo_pages: Vec<Vec<Photo>>,
    comments: HashMap<String, Vec<Comment>>,
    sizes: HashMap<String, Vec<SizeEntry>>,
    failing_downloads: HashSet<String>,
}

/// Canned Flickr API.
pub struct FakeFlickr {
    nsid: String,
    state: Mutex<FlickrState>,
}

impl FakeFlickr {
    pub fn new(nsid: &str) -> Self {
        Self { nsid: nsid.to_string(), state: Mutex::new(FlickrState::default()) }
    }

    pub fn add_photoset(&self, id: &str, title: &str, member_ids: &[&str]) {
        let photoset = Photoset {
            id: id.to_string(),
            title: Content { content: title.to_string() },
            description: Content::default(),
        };
        let members = member_ids
            .iter()
            .map(|id| PhotoRef { id: id.to_string(), title: None })
            .collect();
        self.state.lock().photosets.push((photoset, members));
    }

    /// Append one photo-stream page.
    pub fn add_photo_page(&self, photos: Vec<Photo>) {
        self.state.lock().photo_pages.push(photos);
    }

    pub fn set_comments(&self, media_id: &str, comments: Vec<Comment>) {
        self.state.lock().comments.insert(media_id.to_string(), comments);
    }

    pub fn set_sizes(&self, media_id: &str, sizes: Vec<SizeEntry>) {
        self.state.lock().sizes.insert(media_id.to_string(), sizes);
    }

    /// Make downloads of this URL fail.
    pub fn fail_download(&self, url: &str) {
        self.state.lock().failing_downloads.insert(url.to_string());
    }
}

#[async_trait]
impl FlickrApi for FakeFlickr {
    async fn find_user_by_username(&self, username: &str) -> Result<FlickrUser, FlickrError> {
        Ok(FlickrUser {
            nsid: self.nsid.clone(),
            id: Some(self.nsid.clone()),
            username: Some(Content { content: username.to_string() }),
        })
    }

    async fn photosets_for_user(&self, _nsid: &str) -> Result<Vec<Photoset>, FlickrError> {
        Ok(self.state.lock().photosets.iter().map(|(ps, _)| ps.clone()).collect())
    }

    async fn photos_for_photoset(
        &self,
        photoset_id: &str,
        page: u32,
        _per_page: u32,
    ) -> Result<PhotosetPhotos, FlickrError> {
        let state = self.state.lock();
        let members = state
            .photosets
            .iter()
            .find(|(ps, _)| ps.id == photoset_id)
            .map(|(_, members)| members.clone())
            .unwrap_or_default();
        Ok(PhotosetPhotos { page, pages: 1, photo: members })
    }

    async fn photos_for_user(
        &self,
        _nsid: &str,
        query: &PhotoQuery,
    ) -> Result<PhotoPage, FlickrError> {
        let state = self.state.lock();
        let pages = state.photo_pages.len() as u32;
        let page = query.page.clamp(1, pages.max(1));
        let photos = state
            .photo_pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|p| {
                query
                    .min_upload_date
                    .map_or(true, |since| p.uploaded_epoch().unwrap_or(0) >= since)
            })
            .collect();
        Ok(PhotoPage { page, pages, photo: photos })
    }

    async fn photo_sizes(&self, photo_id: &str) -> Result<Vec<SizeEntry>, FlickrError> {
        Ok(self.state.lock().sizes.get(photo_id).cloned().unwrap_or_default())
    }

    async fn comments_for_photo(&self, photo_id: &str) -> Result<Vec<Comment>, FlickrError> {
        Ok(self.state.lock().comments.get(photo_id).cloned().unwrap_or_default())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, FlickrError> {
        if self.state.lock().failing_downloads.contains(url) {
            return Err(FlickrError::Api { code: 404, message: format!("not found: {url}") });
        }
        Ok(url.as_bytes().to_vec())
    }
}

/// One post as stored by [`MemorySink`].
#[derive(Debug, Clone)]
pub struct StoredPost {
    pub id: String,
    pub post: NewPost,
    pub attachments: Vec<PathBuf>,
    pub comments: Vec<NewComment>,
}

#[derive(Default)]
struct SinkState {
    posts: Vec<StoredPost>,
    /// album id → category id
    categories: HashMap<String, String>,
    next_id: u64,
}

/// In-memory content sink.
#[derive(Default)]
pub struct MemorySink {
    state: Mutex<SinkState>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> Vec<StoredPost> {
        self.state.lock().posts.clone()
    }

    pub fn post_for_media(&self, media_id: &str) -> Option<StoredPost> {
        self.state.lock().posts.iter().find(|p| p.post.media_id == media_id).cloned()
    }

    pub fn category_count(&self) -> usize {
        self.state.lock().categories.len()
    }

    /// Pre-seed an imported post (for delta tests).
    pub fn seed_post(&self, media_id: &str) -> String {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = format!("post-{}", state.next_id);
        state.posts.push(StoredPost {
            id: id.clone(),
            post: NewPost {
                media_id: media_id.to_string(),
                title: String::new(),
                body: String::new(),
                author: None,
                uploaded_epoch: 0,
                taken: None,
                tags: vec![],
                categories: vec![],
            },
            attachments: vec![],
            comments: vec![],
        });
        id
    }
}

#[async_trait]
impl ContentSink for MemorySink {
    async fn find_post_for_media(&self, media_id: &str) -> Result<Option<String>, SinkError> {
        Ok(self
            .state
            .lock()
            .posts
            .iter()
            .find(|p| p.post.media_id == media_id)
            .map(|p| p.id.clone()))
    }

    async fn upsert_category(
        &self,
        album_id: &str,
        _name: &str,
        _description: &str,
    ) -> Result<String, SinkError> {
        let mut state = self.state.lock();
        if let Some(id) = state.categories.get(album_id) {
            return Ok(id.clone());
        }
        let id = format!("cat-{}", state.categories.len() + 1);
        state.categories.insert(album_id.to_string(), id.clone());
        Ok(id)
    }

    async fn create_post(&self, post: NewPost) -> Result<String, SinkError> {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = format!("post-{}", state.next_id);
        state.posts.push(StoredPost { id: id.clone(), post, attachments: vec![], comments: vec![] });
        Ok(id)
    }

    async fn attach_media(&self, post_id: &str, source: &Path) -> Result<String, SinkError> {
        let mut state = self.state.lock();
        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| SinkError::UnknownPost(post_id.to_string()))?;
        post.attachments.push(source.to_path_buf());
        Ok(format!("att-{post_id}"))
    }

    async fn clear_comments(&self, post_id: &str) -> Result<(), SinkError> {
        let mut state = self.state.lock();
        if let Some(post) = state.posts.iter_mut().find(|p| p.id == post_id) {
            post.comments.clear();
        }
        Ok(())
    }

    async fn comment_exists(
        &self,
        post_id: &str,
        author_name: &str,
        created_epoch: u64,
    ) -> Result<bool, SinkError> {
        Ok(self.state.lock().posts.iter().any(|p| {
            p.id == post_id
                && p.comments
                    .iter()
                    .any(|c| c.author_name == author_name && c.created_epoch == created_epoch)
        }))
    }

    async fn insert_comment(&self, post_id: &str, comment: NewComment) -> Result<(), SinkError> {
        let mut state = self.state.lock();
        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| SinkError::UnknownPost(post_id.to_string()))?;
        post.comments.push(comment);
        Ok(())
    }

    async fn imported_media_ids(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<String>, SinkError> {
        let mut ids: Vec<String> =
            self.state.lock().posts.iter().map(|p| p.post.media_id.clone()).collect();
        ids.sort_unstable();
        Ok(ids.into_iter().skip(offset).take(limit).collect())
    }

    async fn imported_media_count(&self) -> Result<usize, SinkError> {
        Ok(self.state.lock().posts.len())
    }
}

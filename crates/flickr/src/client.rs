// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! REST client for the Flickr API.

use crate::error::FlickrError;
use crate::types::{Comment, FlickrUser, PhotoPage, Photoset, PhotosetPhotos, SizeEntry};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://api.flickr.com/services/rest/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Paging parameters for photo-stream fetches.
#[derive(Debug, Clone)]
pub struct PhotoQuery {
    pub page: u32,
    pub per_page: u32,
    /// Extra photo fields to request, comma-separated.
    pub extras: String,
    /// Only photos uploaded at or after this epoch second.
    pub min_upload_date: Option<u64>,
}

impl PhotoQuery {
    /// The extras the importer needs for a full content record.
    pub fn import_defaults(page: u32) -> Self {
        Self {
            page,
            per_page: 500,
            extras: [
                "url_o",
                "description",
                "license",
                "date_upload",
                "date_taken",
                "original_format",
                "last_update",
                "geo",
                "tags",
                "machine_tags",
                "views",
                "media",
            ]
            .join(","),
            min_upload_date: None,
        }
    }

    pub fn since(mut self, epoch: u64) -> Self {
        self.min_upload_date = Some(epoch);
        self
    }
}

/// The Flickr calls the importer depends on.
#[async_trait]
pub trait FlickrApi: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<FlickrUser, FlickrError>;

    async fn photosets_for_user(&self, nsid: &str) -> Result<Vec<Photoset>, FlickrError>;

    async fn photos_for_photoset(
        &self,
        photoset_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<PhotosetPhotos, FlickrError>;

    async fn photos_for_user(
        &self,
        nsid: &str,
        query: &PhotoQuery,
    ) -> Result<PhotoPage, FlickrError>;

    async fn photo_sizes(&self, photo_id: &str) -> Result<Vec<SizeEntry>, FlickrError>;

    async fn comments_for_photo(&self, photo_id: &str) -> Result<Vec<Comment>, FlickrError>;

    /// Fetch a media file (original photo or video rendition).
    async fn download(&self, url: &str) -> Result<Vec<u8>, FlickrError>;
}

/// Response envelope: every call carries `stat`, failures add code/message.
#[derive(Deserialize)]
struct Envelope<T> {
    stat: String,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    body: Option<T>,
}

/// Check `stat` and unwrap the payload.
pub(crate) fn parse_body<T: DeserializeOwned>(
    method: &str,
    raw: serde_json::Value,
) -> Result<T, FlickrError> {
    let envelope: Envelope<T> = serde_json::from_value(raw)?;
    if envelope.stat != "ok" {
        return Err(FlickrError::Api {
            code: envelope.code.unwrap_or(0),
            message: envelope.message.unwrap_or_else(|| "unknown error".to_string()),
        });
    }
    envelope.body.ok_or_else(|| FlickrError::Unexpected { method: method.to_string() })
}

pub struct FlickrClient {
    client: reqwest::Client,
    api_key: String,
}

impl FlickrClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), api_key: api_key.into() }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, FlickrError> {
        tracing::debug!(method, "calling flickr api");
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("method", method),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
                ("nojsoncallback", "1"),
            ])
            .query(params)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(FlickrError::Api { code: i64::from(status.as_u16()), message });
        }

        parse_body(method, resp.json().await?)
    }
}

#[derive(Deserialize)]
struct UserBody {
    user: FlickrUser,
}

#[derive(Deserialize)]
struct PhotosetsBody {
    photosets: PhotosetList,
}

#[derive(Deserialize)]
struct PhotosetList {
    #[serde(default)]
    photoset: Vec<Photoset>,
}

#[derive(Deserialize)]
struct PhotosetPhotosBody {
    photoset: PhotosetPhotos,
}

#[derive(Deserialize)]
struct PhotosBody {
    photos: PhotoPage,
}

#[derive(Deserialize)]
struct SizesBody {
    sizes: SizeList,
}

#[derive(Deserialize)]
struct SizeList {
    #[serde(default)]
    size: Vec<SizeEntry>,
}

#[derive(Deserialize)]
struct CommentsBody {
    comments: CommentList,
}

#[derive(Deserialize)]
struct CommentList {
    #[serde(default)]
    comment: Vec<Comment>,
}

#[async_trait]
impl FlickrApi for FlickrClient {
    async fn find_user_by_username(&self, username: &str) -> Result<FlickrUser, FlickrError> {
        let body: UserBody = self
            .call("flickr.people.findByUsername", &[("username", username.to_string())])
            .await?;
        Ok(body.user)
    }

    async fn photosets_for_user(&self, nsid: &str) -> Result<Vec<Photoset>, FlickrError> {
        let body: PhotosetsBody =
            self.call("flickr.photosets.getList", &[("user_id", nsid.to_string())]).await?;
        Ok(body.photosets.photoset)
    }

    async fn photos_for_photoset(
        &self,
        photoset_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<PhotosetPhotos, FlickrError> {
        let body: PhotosetPhotosBody = self
            .call(
                "flickr.photosets.getPhotos",
                &[
                    ("photoset_id", photoset_id.to_string()),
                    ("page", page.to_string()),
                    ("per_page", per_page.to_string()),
                ],
            )
            .await?;
        Ok(body.photoset)
    }

    async fn photos_for_user(
        &self,
        nsid: &str,
        query: &PhotoQuery,
    ) -> Result<PhotoPage, FlickrError> {
        let mut params = vec![
            ("user_id", nsid.to_string()),
            ("page", query.page.to_string()),
            ("per_page", query.per_page.to_string()),
            ("extras", query.extras.clone()),
        ];
        if let Some(since) = query.min_upload_date {
            params.push(("min_upload_date", since.to_string()));
        }

        let body: PhotosBody = self.call("flickr.people.getPhotos", &params).await?;
        Ok(body.photos)
    }

    async fn photo_sizes(&self, photo_id: &str) -> Result<Vec<SizeEntry>, FlickrError> {
        let body: SizesBody =
            self.call("flickr.photos.getSizes", &[("photo_id", photo_id.to_string())]).await?;
        Ok(body.sizes.size)
    }

    async fn comments_for_photo(&self, photo_id: &str) -> Result<Vec<Comment>, FlickrError> {
        let body: CommentsBody = self
            .call("flickr.photos.comments.getList", &[("photo_id", photo_id.to_string())])
            .await?;
        Ok(body.comments.comment)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, FlickrError> {
        let resp = self.client.get(url).timeout(REQUEST_TIMEOUT).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FlickrError::Api {
                code: i64::from(status.as_u16()),
                message: format!("media download failed for {url}"),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

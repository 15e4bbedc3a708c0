// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed Flickr response fragments.
//!
//! Only the fields the importer consumes are modeled. Flickr is loose with
//! numeric types (heights and dates arrive as strings or numbers depending
//! on the call), so the flexible ones stay `Value` behind typed accessors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flickr's ubiquitous `{"_content": "..."}` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(rename = "_content", default)]
    pub content: String,
}

/// flickr.people.findByUsername
#[derive(Debug, Clone, Deserialize)]
pub struct FlickrUser {
    pub nsid: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<Content>,
}

/// One photoset from flickr.photosets.getList.
#[derive(Debug, Clone, Deserialize)]
pub struct Photoset {
    pub id: String,
    #[serde(default)]
    pub title: Content,
    #[serde(default)]
    pub description: Content,
}

/// One page of flickr.photosets.getPhotos.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotosetPhotos {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub photo: Vec<PhotoRef>,
}

/// Membership entry inside a photoset listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRef {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// One page of flickr.people.getPhotos.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub photo: Vec<Photo>,
}

/// One photo-stream item with the extras the importer requests.
#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_media")]
    pub media: String,
    #[serde(default)]
    pub url_o: Option<String>,
    #[serde(default)]
    pub originalformat: Option<String>,
    #[serde(default)]
    pub dateupload: Option<Value>,
    #[serde(default)]
    pub datetaken: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub description: Content,
    #[serde(default)]
    pub height_o: Option<Value>,
}

fn default_media() -> String {
    "photo".to_string()
}

impl Photo {
    pub fn is_video(&self) -> bool {
        self.media == "video"
    }

    /// Upload time as epoch seconds; Flickr sends it as a string.
    pub fn uploaded_epoch(&self) -> Option<u64> {
        value_as_u64(self.dateupload.as_ref()?)
    }

    pub fn original_height(&self) -> Option<u64> {
        value_as_u64(self.height_o.as_ref()?)
    }
}

/// One rendition from flickr.photos.getSizes.
#[derive(Debug, Clone, Deserialize)]
pub struct SizeEntry {
    pub label: String,
    pub source: String,
    #[serde(default)]
    pub media: Option<String>,
    #[serde(default)]
    pub height: Option<Value>,
}

impl SizeEntry {
    pub fn height_u64(&self) -> Option<u64> {
        value_as_u64(self.height.as_ref()?)
    }
}

/// One comment from flickr.photos.comments.getList.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    #[serde(default)]
    pub authorname: String,
    #[serde(default)]
    pub realname: String,
    #[serde(default)]
    pub datecreate: Option<Value>,
    #[serde(rename = "_content", default)]
    pub content: String,
}

impl Comment {
    /// Creation time as epoch seconds.
    pub fn created_epoch(&self) -> Option<u64> {
        value_as_u64(self.datecreate.as_ref()?)
    }
}

fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;

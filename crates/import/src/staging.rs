// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk staging area for one import run.
//!
//! Photoset listings are staged first so that media pages can resolve album
//! membership without refetching; downloaded media files are parked here
//! until the sink picks them up. The whole directory is wiped in the run's
//! cleanup step.

use crate::error::ImportError;
use pf_flickr::{PhotoRef, Photoset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Album identity for category creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Serialize, Deserialize)]
struct StagedListing {
    album: AlbumRef,
    photos: Vec<PhotoRef>,
}

pub struct Staging {
    root: PathBuf,
}

impl Staging {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn photosets_dir(&self) -> PathBuf {
        self.root.join("photosets")
    }

    fn listing_path(&self, photoset_id: &str) -> PathBuf {
        self.photosets_dir().join(format!("{photoset_id}.json"))
    }

    pub fn has_photoset_listing(&self, photoset_id: &str) -> bool {
        self.listing_path(photoset_id).exists()
    }

    /// Stage one photoset's full photo listing.
    pub fn save_photoset_listing(
        &self,
        photoset: &Photoset,
        photos: &[PhotoRef],
    ) -> Result<(), ImportError> {
        fs::create_dir_all(self.photosets_dir())?;
        let listing = StagedListing {
            album: AlbumRef {
                id: photoset.id.clone(),
                title: photoset.title.content.clone(),
                description: photoset.description.content.clone(),
            },
            photos: photos.to_vec(),
        };
        fs::write(self.listing_path(&photoset.id), serde_json::to_vec_pretty(&listing)?)?;
        Ok(())
    }

    /// Media id → albums containing it, built from every staged listing.
    pub fn album_memberships(&self) -> Result<HashMap<String, Vec<AlbumRef>>, ImportError> {
        let mut memberships: HashMap<String, Vec<AlbumRef>> = HashMap::new();
        let dir = self.photosets_dir();
        if !dir.exists() {
            return Ok(memberships);
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let listing: StagedListing = serde_json::from_str(&fs::read_to_string(&path)?)?;
            for photo in &listing.photos {
                memberships.entry(photo.id.clone()).or_default().push(listing.album.clone());
            }
        }
        Ok(memberships)
    }

    /// Park a downloaded media file; returns its staged path.
    pub fn save_media_file(
        &self,
        media: &str,
        media_id: &str,
        extension: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, ImportError> {
        let dir = self.root.join("media").join(media).join(media_id);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("media.{extension}"));
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Remove the entire staging area. Absence is fine.
    pub fn clear(&self) -> Result<(), ImportError> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "staging_tests.rs"]
mod tests;

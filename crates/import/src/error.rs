// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Importer errors.

use pf_engine::TaskError;
use pf_flickr::FlickrError;
use pf_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("flickr error: {0}")]
    Flickr(#[from] FlickrError),
    #[error("sink error: {0}")]
    Sink(#[from] crate::sink::SinkError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// Required importer setting is absent; the run cannot proceed.
    #[error("missing setting '{0}'")]
    MissingSetting(&'static str),
    /// A video item exposed no downloadable rendition.
    #[error("no video source for media {0}")]
    NoVideoSource(String),
    /// A photo item arrived without its original URL.
    #[error("no original url for media {0}")]
    NoOriginalUrl(String),
    /// Malformed chunk arguments reaching a processor.
    #[error("invalid chunk arguments: {0}")]
    InvalidChunk(String),
}

impl From<ImportError> for TaskError {
    fn from(err: ImportError) -> Self {
        TaskError::new(err)
    }
}

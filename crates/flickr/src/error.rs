// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flickr client errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlickrError {
    #[error("request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered but with `stat != "ok"` (or a non-success HTTP
    /// status).
    #[error("flickr api error {code}: {message}")]
    Api { code: i64, message: String },

    /// `stat` was ok but the expected payload was missing.
    #[error("unexpected response shape for {method}")]
    Unexpected { method: String },

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

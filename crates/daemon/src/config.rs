// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration.
//!
//! Loaded from a TOML file (default `$XDG_DATA_HOME/photoflow/pfd.toml`,
//! overridable via `PFD_CONFIG`). Credentials given here are written into
//! the settings store at boot so the import tasks can see them.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the store, staging area, content, and logs live.
    pub data_dir: PathBuf,
    /// Pacing delay between a chunk and the next continue, seconds.
    pub continue_delay_secs: u64,
    pub fetch_latest_interval_secs: u64,
    pub comment_delta_interval_secs: u64,
    pub flickr: Option<FlickrCredentials>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlickrCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub username: String,
    pub site_author_username: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("photoflow");
        Self {
            data_dir,
            continue_delay_secs: 60,
            fetch_latest_interval_secs: 60 * 60,
            comment_delta_interval_secs: 60 * 60 * 12,
            flickr: None,
        }
    }
}

impl Config {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn continue_delay(&self) -> Duration {
        Duration::from_secs(self.continue_delay_secs)
    }

    pub fn fetch_latest_interval(&self) -> Duration {
        Duration::from_secs(self.fetch_latest_interval_secs)
    }

    pub fn comment_delta_interval(&self) -> Duration {
        Duration::from_secs(self.comment_delta_interval_secs)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

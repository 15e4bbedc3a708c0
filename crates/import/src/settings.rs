// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed importer settings over the keyed store.
//!
//! Settings live under `setting_{name}` keys, separate from the engine's
//! run bookkeeping. Credentials are operator-provided; the flags and
//! watermarks are written by the tasks themselves to coordinate across
//! runs (e.g. the fetch-latest task defers while the comment delta is
//! draining the API budget).

use pf_store::{KeyedStore, KeyedStoreExt, StoreError};
use std::sync::Arc;

#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn KeyedStore>,
}

impl Settings {
    pub fn new(store: Arc<dyn KeyedStore>) -> Self {
        Self { store }
    }

    fn key(name: &str) -> String {
        format!("setting_{name}")
    }

    pub fn get_raw(&self, name: &str) -> Result<Option<serde_json::Value>, StoreError> {
        self.store.get_raw(&Self::key(name))
    }

    pub fn update_raw(&self, name: &str, value: serde_json::Value) -> Result<(), StoreError> {
        self.store.set_raw(&Self::key(name), value)
    }

    fn get_string(&self, name: &str) -> Result<Option<String>, StoreError> {
        self.store.get(&Self::key(name))
    }

    fn get_flag(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.store.get::<bool>(&Self::key(name))?.unwrap_or(false))
    }

    fn set_flag(&self, name: &str, value: bool) -> Result<(), StoreError> {
        self.store.set(&Self::key(name), &value)
    }

    fn get_epoch(&self, name: &str) -> Result<Option<u64>, StoreError> {
        self.store.get(&Self::key(name))
    }

    fn set_epoch(&self, name: &str, value: u64) -> Result<(), StoreError> {
        self.store.set(&Self::key(name), &value)
    }

    // ── Credentials ──────────────────────────────────────────────────────────

    pub fn api_key(&self) -> Result<Option<String>, StoreError> {
        self.get_string("api_key")
    }

    pub fn api_secret(&self) -> Result<Option<String>, StoreError> {
        self.get_string("api_secret")
    }

    pub fn username(&self) -> Result<Option<String>, StoreError> {
        self.get_string("username")
    }

    pub fn site_author_username(&self) -> Result<Option<String>, StoreError> {
        self.get_string("site_author_username")
    }

    pub fn set_credentials(
        &self,
        api_key: &str,
        api_secret: &str,
        username: &str,
        site_author_username: &str,
    ) -> Result<(), StoreError> {
        self.store.set(&Self::key("api_key"), &api_key)?;
        self.store.set(&Self::key("api_secret"), &api_secret)?;
        self.store.set(&Self::key("username"), &username)?;
        self.store.set(&Self::key("site_author_username"), &site_author_username)
    }

    /// All four credential settings must be present and non-empty before
    /// any import task is allowed to register.
    pub fn credentials_exist(&self) -> Result<bool, StoreError> {
        for name in ["api_key", "api_secret", "username", "site_author_username"] {
            match self.get_string(name)? {
                Some(value) if !value.is_empty() => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }

    // ── Import flags ─────────────────────────────────────────────────────────

    pub fn initial_import_running(&self) -> Result<bool, StoreError> {
        self.get_flag("initial_import_running")
    }

    pub fn set_initial_import_running(&self, value: bool) -> Result<(), StoreError> {
        self.set_flag("initial_import_running", value)
    }

    pub fn initial_import_finished(&self) -> Result<bool, StoreError> {
        self.get_flag("initial_import_finished")
    }

    pub fn set_initial_import_finished(&self, value: bool) -> Result<(), StoreError> {
        self.set_flag("initial_import_finished", value)
    }

    pub fn import_running(&self) -> Result<bool, StoreError> {
        self.get_flag("import_running")
    }

    pub fn set_import_running(&self, value: bool) -> Result<(), StoreError> {
        self.set_flag("import_running", value)
    }

    pub fn comment_delta_running(&self) -> Result<bool, StoreError> {
        self.get_flag("comment_delta_running")
    }

    pub fn set_comment_delta_running(&self, value: bool) -> Result<(), StoreError> {
        self.set_flag("comment_delta_running", value)
    }

    // ── Watermarks (epoch seconds) ───────────────────────────────────────────

    pub fn latest_import_time(&self) -> Result<Option<u64>, StoreError> {
        self.get_epoch("latest_import_time")
    }

    pub fn set_latest_import_time(&self, epoch: u64) -> Result<(), StoreError> {
        self.set_epoch("latest_import_time", epoch)
    }

    pub fn current_latest_import_time(&self) -> Result<Option<u64>, StoreError> {
        self.get_epoch("current_latest_import_time")
    }

    pub fn set_current_latest_import_time(&self, epoch: u64) -> Result<(), StoreError> {
        self.set_epoch("current_latest_import_time", epoch)
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;

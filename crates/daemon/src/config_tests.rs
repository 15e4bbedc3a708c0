// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.continue_delay_secs, 60);
    assert_eq!(config.fetch_latest_interval_secs, 3600);
    assert_eq!(config.comment_delta_interval_secs, 43_200);
    assert!(config.flickr.is_none());
}

#[test]
fn full_config_parses() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pfd.toml");
    std::fs::write(
        &path,
        r#"
data_dir = "/var/lib/photoflow"
continue_delay_secs = 5

[flickr]
api_key = "key"
api_secret = "secret"
username = "alice"
site_author_username = "editor"
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.data_dir, PathBuf::from("/var/lib/photoflow"));
    assert_eq!(config.continue_delay(), Duration::from_secs(5));
    // Unset fields keep their defaults
    assert_eq!(config.fetch_latest_interval(), Duration::from_secs(3600));
    let creds = config.flickr.unwrap();
    assert_eq!(creds.username, "alice");
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pfd.toml");
    std::fs::write(&path, "data_dirr = \"/tmp\"\n").unwrap();

    assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
}

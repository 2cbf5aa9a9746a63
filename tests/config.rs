//! Config file persistence

use mkdx::config::AuthConfig;
use mkdx::{Client, Config, MkdxError};
use tempfile::TempDir;

#[test]
fn save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mkdx").join("config.toml");

    let config = Config {
        auth: AuthConfig::new("key-123", "feed-1"),
        version: 2,
        aggregate_limit: 50,
        time_offset_minutes: -30,
        ..Config::default()
    };
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[cfg(unix)]
#[test]
fn saved_config_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    Config::default().save_to(&path).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn missing_file_is_read_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, MkdxError::ConfigRead { .. }));
}

#[test]
fn malformed_file_is_invalid_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "version = \"one\"").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, MkdxError::InvalidConfig(_)));
}

#[test]
fn loaded_config_builds_client() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
aggregate_limit = 10
version = 2

[auth]
api_key = "key-123"
feed_id = "feed-1"
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    let client = Client::from_config(&config).unwrap();

    assert_eq!(client.feed_id(), "feed-1");
    assert_eq!(client.version(), 2);
    assert_eq!(client.aggregate_limit(), 10);
}

#[test]
fn store_credentials_keeps_other_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
api_url = "http://file.example/feeds"
version = 3

[auth]
api_key = "old-key"
feed_id = "old-feed"
"#,
    )
    .unwrap();

    let stored = Config::store_credentials(&path, AuthConfig::new("new-key", "new-feed")).unwrap();
    let loaded = Config::load_from(&path).unwrap();

    assert_eq!(loaded, stored);
    assert_eq!(loaded.auth, AuthConfig::new("new-key", "new-feed"));
    assert_eq!(loaded.api_url, "http://file.example/feeds");
    assert_eq!(loaded.version, 3);
    assert_eq!(loaded.ingest_url, mkdx::config::default_ingest_url());
}

#[test]
fn store_credentials_replaces_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is [not toml").unwrap();

    Config::store_credentials(&path, AuthConfig::new("key-123", "feed-1")).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(
        loaded,
        Config {
            auth: AuthConfig::new("key-123", "feed-1"),
            ..Config::default()
        }
    );
}

#[test]
fn store_credentials_requires_both_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let err = Config::store_credentials(&path, AuthConfig::new("key-123", " ")).unwrap_err();

    assert!(matches!(err, MkdxError::MissingCredentials(_)));
    assert!(!path.exists());
}

#[test]
fn clear_credentials_keeps_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let config = Config {
        auth: AuthConfig::new("key-123", "feed-1"),
        aggregate_limit: 20,
        ..Config::default()
    };
    config.save_to(&path).unwrap();

    assert!(Config::clear_credentials(&path).unwrap());

    let loaded = Config::load_from(&path).unwrap();
    assert!(!loaded.auth.is_authenticated());
    assert_eq!(loaded.aggregate_limit, 20);
}

#[test]
fn clear_credentials_without_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    assert!(!Config::clear_credentials(&path).unwrap());
    assert!(!path.exists());
}

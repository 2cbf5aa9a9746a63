//! Configuration management for the MKDX client
//!
//! Handles loading, validating, and persisting client configuration including
//! credentials, endpoint URLs, and fetch settings.

use crate::error::{MkdxError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod auth;
pub mod defaults;

pub use auth::AuthConfig;
pub use defaults::*;

/// Main client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Credentials
    #[serde(default)]
    pub auth: AuthConfig,

    /// Data-service URL used for reads
    #[serde(default = "defaults::default_api_url")]
    pub api_url: String,

    /// Ingestion URL used for writes
    #[serde(default = "defaults::default_ingest_url")]
    pub ingest_url: String,

    /// Feed protocol version
    #[serde(default = "defaults::default_version")]
    pub version: u32,

    /// Readings fetched in aggregate mode
    #[serde(default = "defaults::default_aggregate_limit")]
    pub aggregate_limit: u32,

    /// Minutes added to the local UTC clock when stamping readings
    #[serde(default)]
    pub time_offset_minutes: i64,

    /// Request timeout in seconds
    #[serde(default = "defaults::default_timeout")]
    pub timeout_secs: u64,

    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

impl Config {
    /// Load configuration from default location
    ///
    /// Tries in order:
    /// 1. XDG_CONFIG_HOME/mkdx/config.toml
    /// 2. ~/.config/mkdx/config.toml
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Err(MkdxError::NoConfig);
        }
        Self::load_from(&path)
    }

    /// Load configuration from the default location, or defaults when no file exists
    pub fn load_or_default() -> Result<Self> {
        match Self::load() {
            Err(MkdxError::NoConfig) => Ok(Self::default()),
            other => other,
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| MkdxError::ConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&contents).map_err(|e| MkdxError::InvalidConfig(e.to_string()))
    }

    /// Load the file at `path` in order to rewrite it
    ///
    /// A missing or unreadable file starts from defaults so a broken config
    /// can always be replaced.
    #[must_use]
    pub fn load_for_update(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(path).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), %err, "replacing unreadable config");
            Self::default()
        })
    }

    /// Write `auth` into the file at `path`, keeping its other settings
    ///
    /// Only credentials change; environment and command-line overrides in
    /// effect are never persisted.
    pub fn store_credentials(path: &Path, auth: AuthConfig) -> Result<Self> {
        if !auth.is_authenticated() {
            return Err(MkdxError::MissingCredentials(
                "API key and feed id are required".to_string(),
            ));
        }
        let mut config = Self::load_for_update(path);
        config.auth = auth;
        config.save_to(path)?;
        Ok(config)
    }

    /// Remove credentials from the file at `path`
    ///
    /// Returns `false` when there was no file to update.
    pub fn clear_credentials(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        let mut config = Self::load_for_update(path);
        config.auth.clear();
        config.save_to(path)?;
        Ok(true)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| MkdxError::DirError {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| MkdxError::SerializationError(e.to_string()))?;

        fs::write(path, contents).map_err(|e| MkdxError::ConfigWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        // Contains the API key
        #[cfg(unix)]
        {
            use std::fs::Permissions;
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, Permissions::from_mode(0o600)).map_err(|e| {
                MkdxError::ConfigWrite {
                    path: path.to_path_buf(),
                    reason: format!("Failed to set permissions: {e}"),
                }
            })?;
        }

        tracing::debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        config_home
            .ok_or_else(|| {
                MkdxError::Internal(
                    "Could not determine config directory: XDG_CONFIG_HOME not set and no home directory found"
                        .to_string(),
                )
            })
            .map(|path| path.join("mkdx").join("config.toml"))
    }

    /// Override values from `MKDX_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override values from any key lookup; blank values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(api_key) = get(ENV_API_KEY) {
            self.auth.api_key = api_key;
        }
        if let Some(feed_id) = get(ENV_FEED_ID) {
            self.auth.feed_id = feed_id;
        }
        if let Some(url) = get(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(url) = get(ENV_INGEST_URL) {
            self.ingest_url = url;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(MkdxError::InvalidConfig("api_url cannot be empty".to_string()));
        }

        if self.ingest_url.trim().is_empty() {
            return Err(MkdxError::InvalidConfig(
                "ingest_url cannot be empty".to_string(),
            ));
        }

        if self.version == 0 {
            return Err(MkdxError::InvalidConfig(
                "version must be at least 1".to_string(),
            ));
        }

        if self.aggregate_limit == 0 {
            return Err(MkdxError::InvalidConfig(
                "aggregate_limit must be greater than 0".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(MkdxError::InvalidConfig(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        check_time_offset(self.time_offset_minutes)?;

        Ok(())
    }
}

/// Reject event-time offsets beyond [`MAX_TIME_OFFSET_MINUTES`]
pub fn check_time_offset(minutes: i64) -> Result<()> {
    if minutes.unsigned_abs() > MAX_TIME_OFFSET_MINUTES.unsigned_abs() {
        return Err(MkdxError::InvalidConfig(format!(
            "time_offset_minutes must be within ±{MAX_TIME_OFFSET_MINUTES}, got {minutes}"
        )));
    }
    Ok(())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth: AuthConfig::default(),
            api_url: default_api_url(),
            ingest_url: default_ingest_url(),
            version: default_version(),
            aggregate_limit: default_aggregate_limit(),
            time_offset_minutes: 0,
            timeout_secs: default_timeout(),
            verbose: false,
        }
    }
}

use crate::utils::expand_env;
use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing config value: {0}")]
    MissingField(&'static str),

    #[error("Failed to resolve directory {path}: {source}")]
    InvalidDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid server address: {0}")]
    InvalidServer(String),
}

/// Configuration as written in the config file, before expansion
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    /// Directory to keep in sync with the server
    #[serde(rename = "ModsDir", default)]
    pub mods_dir: String,
    /// Server address as `host:port`
    #[serde(rename = "Server", default)]
    pub server: String,
}

impl RawConfig {
    /// Replace file values with explicitly supplied ones
    pub fn with_overrides(mut self, mods_dir: Option<String>, server: Option<String>) -> Self {
        if let Some(dir) = mods_dir {
            self.mods_dir = dir;
        }
        if let Some(server) = server {
            self.server = server;
        }
        self
    }

    /// Expand environment variables, make the directory absolute and check the host.
    pub fn resolve(self) -> Result<SyncConfig, ConfigError> {
        let mods_dir = expand_env(&self.mods_dir);
        let host = expand_env(&self.server);

        if mods_dir.is_empty() {
            return Err(ConfigError::MissingField("ModsDir"));
        }
        if host.is_empty() {
            return Err(ConfigError::MissingField("Server"));
        }

        let target_directory =
            std::path::absolute(&mods_dir).map_err(|source| ConfigError::InvalidDirectory {
                path: mods_dir.clone(),
                source,
            })?;

        let config = SyncConfig {
            target_directory,
            host,
        };
        config.base_url()?;
        Ok(config)
    }
}

/// Resolved configuration handed to the sync engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Absolute path of the directory being mirrored
    pub target_directory: PathBuf,
    /// Server address as `host:port`
    pub host: String,
}

impl SyncConfig {
    pub fn new(target_directory: impl Into<PathBuf>, host: impl Into<String>) -> Self {
        Self {
            target_directory: target_directory.into(),
            host: host.into(),
        }
    }

    /// `http://{host}/`
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&format!("http://{}/", self.host))
            .map_err(|e| ConfigError::InvalidServer(format!("{}: {e}", self.host)))?;

        // Anything past the authority means the host string smuggled in a path
        if url.host_str().is_none() || url.path() != "/" || url.query().is_some() {
            return Err(ConfigError::InvalidServer(self.host.clone()));
        }

        Ok(url)
    }
}

/// Read the configuration file
pub async fn read_config(config_path: &Path) -> Result<RawConfig, ConfigError> {
    let content = fs::read_to_string(config_path)
        .await
        .map_err(|source| ConfigError::IoError {
            path: config_path.to_path_buf(),
            source,
        })?;
    let config: RawConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Whether the config file is needed, i.e. not every value is overridden
pub fn needs_config_file(mods_dir: Option<&str>, server: Option<&str>) -> bool {
    mods_dir.is_none() || server.is_none()
}

/// Build the resolved configuration from the file and any overrides.
///
/// The file is skipped entirely when both values are overridden.
pub async fn load_config(
    config_path: &Path,
    mods_dir: Option<String>,
    server: Option<String>,
) -> Result<SyncConfig, ConfigError> {
    let raw = if needs_config_file(mods_dir.as_deref(), server.as_deref()) {
        read_config(config_path).await?
    } else {
        RawConfig::default()
    };

    raw.with_overrides(mods_dir, server).resolve()
}

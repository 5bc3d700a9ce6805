//! Driver configuration.
//!
//! Stored as TOML, by default at `~/.config/teldrive/driver.toml`:
//!
//! ```toml
//! access_token = "..."
//! api_host = "https://drive.example.com"
//! channel_id = 1234567890
//! chunk_size = 500
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use teldrive_client::ClientConfig;
use teldrive_transfer::{DEFAULT_CHUNK_SIZE_MB, MAX_CHUNK_SIZE_MB, MIB};
use teldrive_upload::UploadOptions;

/// Errors loading or validating a [`DriverConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// TelDrive driver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Value of the `access_token` cookie.
    pub access_token: String,

    /// Base URL of the TelDrive API.
    pub api_host: String,

    /// Alternate base URL for chunk uploads (empty = `api_host`).
    #[serde(default)]
    pub upload_host: String,

    /// Channel the file parts are stored in.
    pub channel_id: i64,

    /// Chunk size in MiB.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,

    /// Give chunks random names instead of `<file>.part.NNN`.
    #[serde(default = "default_true")]
    pub random_chunk_name: bool,

    /// Ask the server to encrypt uploaded parts.
    #[serde(default)]
    pub encrypt_files: bool,

    /// Requested parallel chunk uploads. Chunks are currently sent one at
    /// a time regardless.
    #[serde(default = "default_upload_concurrency")]
    pub upload_concurrency: usize,
}

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE_MB
}

fn default_true() -> bool {
    true
}

fn default_upload_concurrency() -> usize {
    4
}

impl DriverConfig {
    /// Reads and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DriverConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token.trim().is_empty() {
            return Err(ConfigError::Invalid("access_token is empty".into()));
        }
        if !is_http_url(&self.api_host) {
            return Err(ConfigError::Invalid(format!(
                "api_host must be an http(s) URL, got {:?}",
                self.api_host
            )));
        }
        if !self.upload_host.is_empty() && !is_http_url(&self.upload_host) {
            return Err(ConfigError::Invalid(format!(
                "upload_host must be an http(s) URL, got {:?}",
                self.upload_host
            )));
        }
        if self.channel_id == 0 {
            return Err(ConfigError::Invalid("channel_id is required".into()));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid(
                "chunk_size must be greater than zero".into(),
            ));
        }
        if self.chunk_size > MAX_CHUNK_SIZE_MB {
            return Err(ConfigError::Invalid(format!(
                "chunk_size {} MiB exceeds the {MAX_CHUNK_SIZE_MB} MiB limit",
                self.chunk_size
            )));
        }
        if self.upload_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "upload_concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Chunk size in bytes.
    pub fn chunk_size_bytes(&self) -> u64 {
        self.chunk_size.saturating_mul(MIB)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_host: self.api_host.clone(),
            upload_host: Some(self.upload_host.clone()).filter(|h| !h.is_empty()),
            access_token: self.access_token.clone(),
        }
    }

    pub fn upload_options(&self) -> UploadOptions {
        UploadOptions {
            channel_id: self.channel_id,
            chunk_size: self.chunk_size_bytes(),
            random_chunk_name: self.random_chunk_name,
            encrypt: self.encrypt_files,
            concurrency: self.upload_concurrency,
        }
    }
}

fn is_http_url(s: &str) -> bool {
    s.strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty())
}

/// Platform-specific default config file location.
pub fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("teldrive").join("driver.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("teldrive")
            .join("driver.toml")
    }
}

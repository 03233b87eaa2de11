//! TOML configuration for the settings stores.
//!
//! Reads and writes [`StoreConfig`] at `<platform config dir>/prefkit/prefkit.toml`
//! (see [`crate::paths`] for the platform directories).
//!
//! ```toml
//! [retry]
//! attempts = 2
//! delay_ms = 100
//!
//! [files]
//! text_filename = "settings.cfg"
//! json_filename = "settings.json"
//!
//! [native]
//! max_recent_files = 10
//!
//! [logging]
//! level = "info"
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "some_fn")]`, so a partial file (or
//! none at all) still yields a complete configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use prefkit_core::RetryPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths;

/// Name of the directory created under the platform config directory.
pub const APP_DIR: &str = "prefkit";

/// Name of the configuration file.
pub const CONFIG_FILENAME: &str = "prefkit.toml";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub files: FileNames,
    #[serde(default)]
    pub native: NativeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Write-retry budget for file-backed stores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetryConfig {
    /// Total write attempts, including the first.  Values below 1 act as 1.
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Pause between attempts, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

/// Default backing file names for the flat stores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileNames {
    #[serde(default = "default_text_filename")]
    pub text_filename: String,
    #[serde(default = "default_json_filename")]
    pub json_filename: String,
}

/// Native registry store settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NativeConfig {
    /// Length of the recent-files list.
    #[serde(default = "default_max_recent_files")]
    pub max_recent_files: usize,
}

/// `tracing` output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_attempts() -> u32 {
    prefkit_core::retry::DEFAULT_ATTEMPTS
}
fn default_delay_ms() -> u64 {
    prefkit_core::retry::DEFAULT_DELAY.as_millis() as u64
}
fn default_text_filename() -> String {
    "settings.cfg".to_string()
}
fn default_json_filename() -> String {
    "settings.json".to_string()
}
fn default_max_recent_files() -> usize {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            text_filename: default_text_filename(),
            json_filename: default_json_filename(),
        }
    }
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            max_recent_files: default_max_recent_files(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl StoreConfig {
    /// The retry policy described by `[retry]`.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry.attempts, Duration::from_millis(self.retry.delay_ms))
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the directory holding the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    paths::settings_dir(APP_DIR).ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILENAME))
}

/// Loads the config from the platform location, returning defaults if the
/// file does not yet exist.
///
/// # Errors
///
/// As for [`load_config_from`], plus [`ConfigError::NoPlatformConfigDir`].
pub fn load_config() -> Result<StoreConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Persists `config` to the platform location.
///
/// # Errors
///
/// As for [`save_config_to`], plus [`ConfigError::NoPlatformConfigDir`].
pub fn save_config(config: &StoreConfig) -> Result<(), ConfigError> {
    save_config_to(&config_file_path()?, config)
}

/// Loads the config at `path`, returning defaults if it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<StoreConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &StoreConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

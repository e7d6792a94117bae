//! TOML-based configuration file for the client.
//!
//! Reads and writes [`FileConfig`] at the platform-appropriate path:
//! - Windows:  `%APPDATA%\mtmc\client.toml`
//! - Linux:    `~/.config/mtmc/client.toml`
//! - macOS:    `~/Library/Application Support/mtmc/client.toml`
//!
//! # File layout
//!
//! ```toml
//! [server]
//! url = "http://localhost:8081"
//! sse_path = "/sse"
//!
//! [client]
//! log_level = "info"
//! frame_interval_ms = 16
//!
//! [keyboard]
//! ArrowUp = "up"
//! KeyX = "a"
//!
//! [gamepad]
//! "12" = "up"
//! "0" = "a"
//! ```
//!
//! Every field is optional.  A missing file, section, or field falls back to
//! the built-in default, so the client runs on first start without any file.
//! A non-empty `[keyboard]` or `[gamepad]` table replaces the default table
//! for that surface entirely.
//!
//! # Merging (for beginners)
//!
//! The file is only one of two layers.  [`FileConfig::into_client_config`]
//! applies [`ConfigOverrides`] from the command line on top of it and
//! validates the mapping tables, producing the domain [`ClientConfig`] that
//! the rest of the program uses.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mtmc_core::keymap::{GamepadMap, KeyboardMap};
use mtmc_core::LogicalButton;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::config::{
    ClientConfig, DEFAULT_FRAME_INTERVAL, DEFAULT_SERVER_URL, DEFAULT_SSE_PATH,
};

/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "client.toml";

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

    /// A `[keyboard]` or `[gamepad]` entry names an unknown button or a
    /// non-numeric controller index.
    #[error("invalid [{section}] mapping {key:?} = {value:?}")]
    InvalidMapping {
        section: &'static str,
        key: String,
        value: String,
    },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// The on-disk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub client: ClientSection,
    /// Keyboard code → button name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keyboard: BTreeMap<String, String>,
    /// Controller button index (as a string key) → button name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub gamepad: BTreeMap<String, String>,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerSection {
    #[serde(default = "default_server_url")]
    pub url: String,

    #[serde(default = "default_sse_path")]
    pub sse_path: String,
}

/// `[client]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientSection {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub server_url: Option<String>,
    pub frame_interval_ms: Option<u64>,
    pub log_level: Option<String>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_sse_path() -> String {
    DEFAULT_SSE_PATH.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_frame_interval_ms() -> u64 {
    DEFAULT_FRAME_INTERVAL.as_millis() as u64
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            sse_path: default_sse_path(),
        }
    }
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

// ── Merging ───────────────────────────────────────────────────────────────────

impl FileConfig {
    /// Applies `overrides` and validates the mapping tables.
    ///
    /// The frame interval is clamped to at least one millisecond.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMapping`] for an unknown button name or
    /// a controller index that is not a number in `0..=255`.
    pub fn into_client_config(
        self,
        overrides: &ConfigOverrides,
    ) -> Result<ClientConfig, ConfigError> {
        let keyboard = if self.keyboard.is_empty() {
            KeyboardMap::default()
        } else {
            let pairs = self
                .keyboard
                .into_iter()
                .map(|(code, name)| {
                    let button = parse_button("keyboard", &code, &name)?;
                    Ok((code, button))
                })
                .collect::<Result<Vec<_>, ConfigError>>()?;
            KeyboardMap::from_pairs(pairs)
        };

        let gamepad = if self.gamepad.is_empty() {
            GamepadMap::default()
        } else {
            let pairs = self
                .gamepad
                .into_iter()
                .map(|(index, name)| {
                    let button = parse_button("gamepad", &index, &name)?;
                    let index = index.trim().parse::<u8>().map_err(|_| {
                        ConfigError::InvalidMapping {
                            section: "gamepad",
                            key: index.clone(),
                            value: name.clone(),
                        }
                    })?;
                    Ok((index, button))
                })
                .collect::<Result<Vec<_>, ConfigError>>()?;
            GamepadMap::from_pairs(pairs)
        };

        let frame_ms = overrides
            .frame_interval_ms
            .unwrap_or(self.client.frame_interval_ms)
            .max(1);

        Ok(ClientConfig {
            server_url: overrides.server_url.clone().unwrap_or(self.server.url),
            sse_path: self.server.sse_path,
            frame_interval: Duration::from_millis(frame_ms),
            log_level: overrides.log_level.clone().unwrap_or(self.client.log_level),
            keyboard,
            gamepad,
        })
    }
}

fn parse_button(section: &'static str, key: &str, value: &str) -> Result<LogicalButton, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidMapping {
        section,
        key: key.to_string(),
        value: value.to_string(),
    })
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the config from `path`, or from the default location when `path`
/// is `None`.  A file that does not exist yields [`FileConfig::default`].
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            Ok(FileConfig::default())
        }
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &FileConfig, path: &Path) -> Result<(), ConfigError> {
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
    })?;
    Ok(())
}

/// Resolves the platform config directory including the `mtmc` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("mtmc"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("mtmc"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("mtmc")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

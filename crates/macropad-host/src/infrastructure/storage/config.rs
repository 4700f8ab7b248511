//! TOML-based configuration for the host daemon.
//!
//! Reads `AppConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\MacropadHost\config.toml`
//! - Linux:    `~/.config/macropad-host/config.toml`
//! - macOS:    `~/Library/Application Support/MacropadHost/config.toml`
//!
//! Every field carries a serde default, so an absent file — the common case;
//! the daemon ships with working defaults — and a partial file both load
//! cleanly.  Example:
//!
//! ```toml
//! [host]
//! log_level = "debug"
//!
//! [serial]
//! baud_rate = 115200
//!
//! [cadence]
//! window_sync_secs = 5
//! ```
//!
//! The daemon never writes the file; configuration is owned by the user.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

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

    /// A cadence of zero seconds would spin the tick loop.
    #[error("cadence.{field} must be at least 1 second")]
    ZeroCadence { field: &'static str },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level daemon configuration read from disk.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub cadence: CadenceConfig,
}

/// General host behaviour settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HostConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Overrides the machine name announced to devices.  When absent the
    /// name is resolved from the environment at startup.
    #[serde(default)]
    pub host_name: Option<String>,
}

/// Serial link settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SerialConfig {
    /// Baud rate for every device link.  CircuitPython CDC ports ignore the
    /// value on the USB side, but the OS driver still wants one.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// Seconds between runs of each dispatch operation.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CadenceConfig {
    /// Discovery sweep for newly attached boards.
    #[serde(default = "default_discovery_secs")]
    pub discovery_secs: u64,
    /// Clock-sync fan-out (each device refreshes at most hourly regardless).
    #[serde(default = "default_time_sync_secs")]
    pub time_sync_secs: u64,
    /// Foreground-window title fan-out.
    #[serde(default = "default_window_sync_secs")]
    pub window_sync_secs: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_baud_rate() -> u32 {
    115_200
}
fn default_discovery_secs() -> u64 {
    5
}
fn default_time_sync_secs() -> u64 {
    60
}
fn default_window_sync_secs() -> u64 {
    2
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            host_name: None,
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: default_baud_rate(),
        }
    }
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            discovery_secs: default_discovery_secs(),
            time_sync_secs: default_time_sync_secs(),
            window_sync_secs: default_window_sync_secs(),
        }
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from the platform config path, returning
/// `AppConfig::default()` if the file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not
/// found", [`ConfigError::Parse`] if the TOML is malformed, and
/// [`ConfigError::ZeroCadence`] for a zero-second cadence.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from an explicit path (the `--config` flag).
///
/// # Errors
///
/// Same conditions as [`load_config`].
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
        Err(e) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    validate(config)
}

/// Rejects cadences the tick loop cannot honour.
fn validate(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let cadence = &config.cadence;
    for (field, value) in [
        ("discovery_secs", cadence.discovery_secs),
        ("time_sync_secs", cadence.time_sync_secs),
        ("window_sync_secs", cadence.window_sync_secs),
    ] {
        if value == 0 {
            return Err(ConfigError::ZeroCadence { field });
        }
    }
    Ok(config)
}

/// Resolves the platform config base directory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("MacropadHost"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("macropad-host"))
    }

    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/MacropadHost
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("MacropadHost")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        // Fallback for unsupported platforms.
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

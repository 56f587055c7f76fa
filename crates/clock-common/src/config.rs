//! Application configuration.
//!
//! Supports TOML deserialization with defaults matching the stock
//! clock face and timer, so an empty file (or no file) is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial clock face options.
    pub face: FaceConfig,

    /// Work-session timer configuration.
    pub timer: TimerConfig,

    /// Where settings and history are persisted.
    pub storage: StorageConfig,

    /// Terminal rendering.
    pub display: DisplayConfig,
}

/// Initial clock face options.
///
/// These are raw values: they pass through the face's validated
/// configuration path at startup, so bad values are reported the same
/// way as a bad runtime update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceConfig {
    /// Background color.
    pub background: String,
    /// Hand color (`#RRGGBB`).
    pub hand_color: String,
    /// Hour mark color (`#RRGGBB`).
    pub mark_color: String,
    /// Hour mark style: "ticks", "arabic" or "roman".
    pub marks: String,
    /// Face size in pixels.
    pub size: f64,
    /// Sub-second second-hand movement.
    pub smooth: bool,
    /// Refreshes per second while smooth.
    pub update_rate: f64,
    /// Take sub-second milliseconds from the wall clock instead of
    /// accumulating the nominal tick interval.
    pub measured_subsecond: bool,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            background: String::from("#DDEEEE"),
            hand_color: String::from("#0000EE"),
            mark_color: String::from("#FF9933"),
            marks: String::from("ticks"),
            size: 300.0,
            smooth: false,
            update_rate: 10.0,
            measured_subsecond: false,
        }
    }
}

/// Work-session timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Interval between session updates.
    #[serde(with = "humantime_serde")]
    pub update_interval: Duration,

    /// Share of gross pay shown as earnings (after-tax estimate).
    pub earnings_fraction: f64,

    /// Progress bar width in pixels.
    pub bar_width: f64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_millis(500),
            earnings_fraction: 0.71,
            bar_width: 150.0,
        }
    }
}

/// Persistence locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Settings document (JSON object).
    pub settings_file: PathBuf,
    /// Daily history document (JSON array).
    pub history_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_file: PathBuf::from("money_timer_settings.json"),
            history_file: PathBuf::from("money_timer_history.json"),
        }
    }
}

/// Terminal rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Draw the face and timer to stdout.
    pub enabled: bool,
    /// Character columns used for the face.
    pub columns: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            columns: 41,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Serialize configuration to TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Serde helper module for `Duration` using humantime format.
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

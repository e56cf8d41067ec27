//! Configuration loading and typed config structures for the impact dashboard.
//!
//! The canonical configuration lives in `impact-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads the file and applies
//! environment overrides. Every field has a default, so an empty document
//! (or no document at all) yields a working configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use impact_types::View;
use serde::Deserialize;

/// Environment variable that overrides `loader.data_file`.
pub const ENV_DATA_FILE: &str = "IMPACT_DATA_FILE";

/// Environment variable that overrides `automation.interval_ms`.
pub const ENV_AUTOMATION_INTERVAL_MS: &str = "IMPACT_AUTOMATION_INTERVAL_MS";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held an unusable value.
    #[error("invalid value for {name}: {reason}")]
    InvalidOverride {
        /// The environment variable name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level dashboard configuration.
///
/// Mirrors the structure of `impact-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardConfig {
    /// Data loader retry and source settings.
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Auto-advance timer settings.
    #[serde(default)]
    pub automation: AutomationConfig,

    /// Line chart geometry.
    #[serde(default)]
    pub chart: ChartConfig,

    /// Host process settings.
    #[serde(default)]
    pub host: HostConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DashboardConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `IMPACT_DATA_FILE` overrides `loader.data_file`
    /// - `IMPACT_AUTOMATION_INTERVAL_MS` overrides `automation.interval_ms`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidOverride`] if an override cannot be parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    /// Environment overrides are applied in both cases.
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file), except a missing file is not
    /// an error.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(
            std::env::var(ENV_DATA_FILE).ok(),
            std::env::var(ENV_AUTOMATION_INTERVAL_MS).ok(),
        )
    }

    /// Apply override values as if they came from the environment.
    fn apply_overrides(
        &mut self,
        data_file: Option<String>,
        interval_ms: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(path) = data_file.filter(|p| !p.trim().is_empty()) {
            self.loader.data_file = Some(PathBuf::from(path));
        }
        if let Some(raw) = interval_ms {
            let ms: u64 = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidOverride {
                    name: ENV_AUTOMATION_INTERVAL_MS,
                    reason: format!("{e}"),
                })?;
            if ms == 0 {
                return Err(ConfigError::InvalidOverride {
                    name: ENV_AUTOMATION_INTERVAL_MS,
                    reason: "interval must be at least 1ms".to_owned(),
                });
            }
            self.automation.interval_ms = ms;
        }
        Ok(())
    }
}

/// Data loader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoaderConfig {
    /// Total fetch attempts before giving up with an empty series.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first attempt, in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Backoff unit: attempt `i > 0` waits `backoff_base_ms * 2^i`.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Optional JSON file to read records from instead of the built-in set.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            backoff_base_ms: default_backoff_base_ms(),
            data_file: None,
        }
    }
}

/// Auto-advance configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AutomationConfig {
    /// Milliseconds between automated advances.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl AutomationConfig {
    /// The tick period as a [`Duration`], never shorter than 1ms.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

/// Line chart drawing area.
///
/// Points are spread evenly between `x_min` and `x_max`; a score of 0 sits
/// at `y_base` and a score of 100 sits `height` units above it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ChartConfig {
    /// X coordinate of the first point.
    #[serde(default = "default_x_min")]
    pub x_min: f64,

    /// X coordinate of the last point.
    #[serde(default = "default_x_max")]
    pub x_max: f64,

    /// Y coordinate of a zero score.
    #[serde(default = "default_y_base")]
    pub y_base: f64,

    /// Vertical extent of the drawable area.
    #[serde(default = "default_height")]
    pub height: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            x_min: default_x_min(),
            x_max: default_x_max(),
            y_base: default_y_base(),
            height: default_height(),
        }
    }
}

/// Host process configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostConfig {
    /// Stop after this many rendered frames (0 = run until interrupted).
    #[serde(default)]
    pub max_frames: u64,

    /// View shown at startup.
    #[serde(default)]
    pub initial_view: View,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            max_frames: 0,
            initial_view: View::Dashboard,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_initial_delay_ms() -> u64 {
    1500
}

const fn default_backoff_base_ms() -> u64 {
    1000
}

const fn default_interval_ms() -> u64 {
    3000
}

const fn default_x_min() -> f64 {
    50.0
}

const fn default_x_max() -> f64 {
    480.0
}

const fn default_y_base() -> f64 {
    270.0
}

const fn default_height() -> f64 {
    240.0
}

fn default_log_level() -> String {
    "info".to_owned()
}

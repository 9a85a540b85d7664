//! Inspector configuration.
//!
//! Optional settings live in `~/.config/taxi-inspect/config.toml`. Every
//! value has a command-line counterpart that wins over the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InspectError, InspectResult};
use crate::tracing::TracingOutputFormat;

/// Configuration for taxi-inspect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// Output settings.
    pub output: OutputSettings,

    /// Logging settings.
    pub logging: LoggingSettings,
}

/// How decoded records are printed and encoded ones written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Pretty-print JSON.
    pub pretty: bool,

    /// Treat files as length-prefixed frame streams.
    pub framed: bool,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,

    /// Log line format.
    pub format: TracingOutputFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: TracingOutputFormat::default(),
        }
    }
}

impl InspectConfig {
    /// Loads configuration from the default path, or defaults if there is
    /// no file.
    pub fn load() -> InspectResult<Self> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Loads configuration from a specific file.
    pub fn load_from(path: &Path) -> InspectResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            InspectError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| InspectError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taxi-inspect")
            .join("config.toml")
    }

    /// Parsed default log level.
    pub fn log_level(&self) -> InspectResult<tracing::Level> {
        self.logging
            .level
            .parse()
            .map_err(|_| InspectError::Config(format!("invalid log level {:?}", self.logging.level)))
    }
}

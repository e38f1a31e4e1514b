//! Run settings
//!
//! Read from an optional TOML file; command-line flags override file values.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// File picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "slsbench.toml";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid timestamp format {0:?}")]
    InvalidTimestampFormat(String),
}

/// slsbench settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory receiving enriched documents and scenario files
    pub output_dir: PathBuf,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// `strftime` pattern used in output file names
    pub timestamp_format: String,
    /// Indent scenario JSON
    pub pretty_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            log_level: "info".to_string(),
            log_json: false,
            timestamp_format: "%Y-%m-%d-%H:%M:%S".to_string(),
            pretty_json: true,
        }
    }
}

impl Settings {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_log_json(mut self, json: bool) -> Self {
        self.log_json = json;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Parse TOML; `origin` only labels errors
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load settings from `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Settings from `explicit`, else from [`DEFAULT_CONFIG_FILE`] in `dir`, else defaults
    ///
    /// An explicit file must exist; the default file is optional.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Render `now` with [`timestamp_format`](Self::timestamp_format)
    pub fn timestamp(&self, now: &DateTime<Local>) -> Result<String, ConfigError> {
        let mut out = String::new();
        write!(out, "{}", now.format(&self.timestamp_format))
            .map_err(|_| ConfigError::InvalidTimestampFormat(self.timestamp_format.clone()))?;
        Ok(out)
    }

    /// `<output_dir>/<prefix>-<timestamp>.<extension>`
    pub fn output_path(
        &self,
        prefix: &str,
        extension: &str,
        now: &DateTime<Local>,
    ) -> Result<PathBuf, ConfigError> {
        let stamp = self.timestamp(now)?;
        Ok(self.output_dir.join(format!("{prefix}-{stamp}.{extension}")))
    }
}

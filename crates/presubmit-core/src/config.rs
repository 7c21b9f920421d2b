//! Configuration types for presubmit.

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for presubmit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Check preset (`recommended`, `strict` or `minimal`).
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold that blocks the change (default: "error").
    #[serde(default)]
    pub fail_on: Option<String>,

    /// File discovery configuration.
    #[serde(default)]
    pub files: FilesConfig,

    /// Per-check configurations.
    #[serde(default)]
    pub checks: HashMap<String, CheckConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a check is enabled.
    #[must_use]
    pub fn is_check_enabled(&self, check_name: &str) -> bool {
        self.checks
            .get(check_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a check.
    #[must_use]
    pub fn check_severity(&self, check_name: &str) -> Option<Severity> {
        self.checks.get(check_name).and_then(|c| c.severity)
    }

    /// Gets the configuration block for a check, if present.
    #[must_use]
    pub fn check_config(&self, check_name: &str) -> Option<&CheckConfig> {
        self.checks.get(check_name)
    }

    /// Returns the severity at which the change is blocked.
    ///
    /// # Errors
    ///
    /// Returns an error if `fail_on` is not a known severity.
    pub fn fail_on(&self) -> Result<Severity, ConfigError> {
        self.fail_on
            .as_deref()
            .map_or(Ok(Severity::Error), |s| {
                s.parse().map_err(|message| ConfigError::Parse { message })
            })
    }
}

/// File discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Repository root (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude when walking the tree.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files when walking the tree.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: vec!["**/out/**".to_string(), "**/third_party/**".to_string()],
            respect_gitignore: true,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

/// Per-check configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Whether this check is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this check.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Check-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl CheckConfig {
    /// Gets a boolean option with a default value.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    /// Gets an integer option with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(default)
    }

    /// Gets a string array option.
    ///
    /// Returns `None` when the key is absent so callers can keep their
    /// defaults; non-string elements are dropped.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Option<Vec<String>> {
        self.options.get(key).and_then(|v| v.as_array()).map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

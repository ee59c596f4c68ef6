//! Application configuration
//!
//! A TOML file with two optional tables:
//!
//! ```toml
//! [backend]
//! failure_rate = 0.2
//! seed = 7
//!
//! [backend.latency]
//! get_all_ms = 50
//!
//! [notifications]
//! max_visible = 5
//! ```
//!
//! The file comes from `--config`, else from `TASKBOARD_CONFIG`; without
//! either every value takes its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use taskboard_backend::SimulationConfig;
use taskboard_store::NotifyConfig;
use thiserror::Error;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "TASKBOARD_CONFIG";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for [`AppConfig`]
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Dotted key
        key: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Whole-application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Simulated backend
    pub backend: SimulationConfig,
    /// Notification center
    pub notifications: NotifyConfig,
}

impl AppConfig {
    /// Load from `path`, else from [`CONFIG_ENV`], else defaults
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file cannot be read, parsed or holds
    /// out-of-range values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate one file
    ///
    /// # Errors
    /// See [`AppConfig::load`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.backend.failure_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::InvalidValue {
                key: "backend.failure_rate",
                reason: format!("{rate} is outside [0, 1]"),
            });
        }
        if self.notifications.max_visible == 0 {
            return Err(ConfigError::InvalidValue {
                key: "notifications.max_visible",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.notifications.history_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "notifications.history_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

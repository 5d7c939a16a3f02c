//! Configuration module for the Taskboard client.
//!
//! This module handles parsing configuration from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `TASKBOARD_BACKEND` | No | `http` | Store backend: `http` or `memory` |
//! | `TASKBOARD_API_URL` | With `http` | - | Todo collection URL (e.g., `https://example.mockapi.io/api/v1/todos`) |
//! | `TASKBOARD_STATE_DIR` | No | `~/.taskboard` | Directory for the session slot and log file |
//! | `TASKBOARD_REQUEST_TIMEOUT_SECS` | No | none | Per-request timeout for the HTTP backend |
//!
//! There is no built-in API URL: selecting the HTTP backend without
//! `TASKBOARD_API_URL` is a configuration error.
//!
//! # Example
//!
//! ```no_run
//! use taskboard_client::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("State dir: {}", config.state_dir.display());
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use directories::BaseDirs;
use thiserror::Error;

/// Default state directory name relative to home.
const DEFAULT_STATE_DIR: &str = ".taskboard";

/// Environment variable selecting the backend.
const ENV_BACKEND: &str = "TASKBOARD_BACKEND";

/// Environment variable holding the collection URL.
const ENV_API_URL: &str = "TASKBOARD_API_URL";

/// Environment variable overriding the state directory.
const ENV_STATE_DIR: &str = "TASKBOARD_STATE_DIR";

/// Environment variable for the request timeout.
const ENV_REQUEST_TIMEOUT: &str = "TASKBOARD_REQUEST_TIMEOUT_SECS";

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to determine home directory.
    #[error("failed to determine home directory")]
    NoHomeDirectory,
}

/// Which store backend the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// Remote REST collection resource.
    Http {
        /// Collection URL; item URLs are `{api_url}/{id}`.
        api_url: String,
        /// Optional per-request timeout. `None` leaves the transport default.
        request_timeout: Option<Duration>,
    },

    /// Process-local collection, lost on exit.
    InMemory,
}

/// Configuration for the Taskboard client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store backend selection.
    pub backend: BackendConfig,

    /// Directory holding `session.json` and `taskboard.log`.
    pub state_dir: PathBuf,
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - `TASKBOARD_BACKEND` is set to something other than `http` or `memory`
    /// - the HTTP backend is selected and `TASKBOARD_API_URL` is not set or empty
    /// - `TASKBOARD_REQUEST_TIMEOUT_SECS` is not a positive integer
    /// - the home directory cannot be determined (needed for the default state dir)
    pub fn from_env() -> Result<Self, ConfigError> {
        let state_dir = Self::state_dir_from_env()?;

        let backend = match env::var(ENV_BACKEND)
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            Err(_) | Ok("http") => Self::http_backend_from_env()?,
            Ok("memory") => BackendConfig::InMemory,
            Ok(other) => {
                return Err(ConfigError::InvalidValue {
                    key: ENV_BACKEND.to_string(),
                    message: format!("expected 'http' or 'memory', got '{other}'"),
                })
            }
        };

        Ok(Self { backend, state_dir })
    }

    /// The state directory: `TASKBOARD_STATE_DIR`, or `~/.taskboard`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoHomeDirectory` if the variable is unset and the
    /// home directory cannot be determined.
    pub fn state_dir_from_env() -> Result<PathBuf, ConfigError> {
        match env::var(ENV_STATE_DIR) {
            Ok(dir) => Ok(PathBuf::from(dir)),
            Err(_) => {
                let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
                Ok(base_dirs.home_dir().join(DEFAULT_STATE_DIR))
            }
        }
    }

    /// Switches to the in-memory backend regardless of the environment.
    #[must_use]
    pub fn offline(state_dir: PathBuf) -> Self {
        Self {
            backend: BackendConfig::InMemory,
            state_dir,
        }
    }

    /// Path of the durable session slot.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.state_dir.join("session.json")
    }

    /// Path of the log file.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join("taskboard.log")
    }

    fn http_backend_from_env() -> Result<BackendConfig, ConfigError> {
        let api_url = env::var(ENV_API_URL)
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(ENV_API_URL.to_string()))?;

        let request_timeout = match env::var(ENV_REQUEST_TIMEOUT) {
            Ok(val) => {
                let secs = val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    key: ENV_REQUEST_TIMEOUT.to_string(),
                    message: format!("expected positive integer, got '{val}'"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_REQUEST_TIMEOUT.to_string(),
                        message: "timeout must be at least 1 second".to_string(),
                    });
                }
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(BackendConfig::Http {
            api_url,
            request_timeout,
        })
    }
}

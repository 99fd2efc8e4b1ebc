//! Configuration file loading and parsing.
//!
//! This module handles loading the configuration file from disk and parsing
//! it into validated, type-safe structures.
//!
//! # Configuration File Locations
//!
//! The configuration file is searched in the following order:
//!
//! 1. Path specified via `--config` CLI flag
//! 2. Default location:
//!    - **Linux/macOS:** `~/.bga-fanout/config.json`
//!    - **Windows:** `%USERPROFILE%\.bga-fanout\config.json`
//!
//! When no file exists at the default location the built-in defaults are
//! used; an explicitly requested file must exist.
//!
//! # Example Configuration
//!
//! ```json
//! {
//!     "fanout": { "skip_outer_rings": 1, "edge_layer_rings": 0 },
//!     "logging": { "level": "info" }
//! }
//! ```

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{Config, FanoutConfig, LoggingConfig, MAX_RINGS};

use std::path::{Path, PathBuf};

/// Returns the default configuration directory.
///
/// - **Linux/macOS:** `~/.bga-fanout/`
/// - **Windows:** `%USERPROFILE%\.bga-fanout\`
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".bga-fanout"))
}

/// Returns the platform-specific default configuration file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join("config.json"))
}

/// Loads and parses the configuration file.
///
/// If `path` is `None`, uses the platform-specific default location.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration file cannot be found
/// - The file cannot be read
/// - The JSON is malformed
/// - Required fields are missing or invalid
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path().ok_or_else(|| ConfigError::NotFound {
            path: PathBuf::from("<default config path>"),
        })?,
    };

    if !config_path.exists() {
        return Err(ConfigError::NotFound { path: config_path });
    }

    let contents = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: config_path.clone(),
        source: e,
    })?;

    // Validate the configuration
    config.validate()?;

    Ok(config)
}

/// Loads the configuration, falling back to defaults when no path was given
/// and nothing exists at the default location.
///
/// # Errors
///
/// Same as [`load_config`], except that a missing default file is not an
/// error.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match load_config(path) {
        Err(ConfigError::NotFound { .. }) if path.is_none() => Ok(Config::default()),
        other => other,
    }
}

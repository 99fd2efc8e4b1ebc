//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

use super::MAX_RINGS;

/// Errors that can occur while loading or validating the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// A ring count exceeds [`MAX_RINGS`].
    #[error("{name} = {value} exceeds the maximum of {max}")]
    RingCountOutOfRange {
        /// Setting name, e.g. `skip_outer_rings`.
        name: &'static str,
        /// Requested ring count.
        value: u32,
        /// Largest accepted ring count.
        max: u32,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

impl ConfigError {
    /// Checks a ring count against [`MAX_RINGS`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RingCountOutOfRange`] if `value` is too large.
    pub fn check_ring_count(name: &'static str, value: u32) -> Result<u32, Self> {
        if value > MAX_RINGS {
            Err(Self::RingCountOutOfRange {
                name,
                value,
                max: MAX_RINGS,
            })
        } else {
            Ok(value)
        }
    }
}

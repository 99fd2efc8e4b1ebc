//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use serde::Deserialize;

use super::ConfigError;

/// Largest ring count accepted for either fanout parameter.
///
/// Real BGAs rarely exceed 40 rows, so anything beyond this is a typo.
pub const MAX_RINGS: u32 = 64;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Fanout defaults.
    #[serde(default)]
    pub fanout: FanoutConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_ring_count("skip_outer_rings", self.fanout.skip_outer_rings)?;
        ConfigError::check_ring_count("edge_layer_rings", self.fanout.edge_layer_rings)?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            });
        }
        Ok(())
    }
}

/// Fanout defaults, overridable from the command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FanoutConfig {
    /// Number of outer pad rings left without a dogbone.
    /// Default: 1
    #[serde(default = "default_skip_outer_rings")]
    pub skip_outer_rings: u32,

    /// Number of rings escaped with axis-aligned (edge) offsets.
    /// Default: 0
    #[serde(default)]
    pub edge_layer_rings: u32,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            skip_outer_rings: default_skip_outer_rings(),
            edge_layer_rings: 0,
        }
    }
}

const fn default_skip_outer_rings() -> u32 {
    1
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

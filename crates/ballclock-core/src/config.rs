//! Configuration loading and typed config structures for the ball clock.
//!
//! Configuration can come from a YAML file (see [`BallClockConfig::from_file`])
//! or be built directly. Every field is optional in YAML and falls back to
//! its default. Command-line flags in the driver override file values.
//!
//! ```yaml
//! clock:
//!   ball_count: 30
//!   run_minutes: 325
//! logging:
//!   level: debug
//! ```

use std::num::NonZeroU64;
use std::path::Path;

use serde::Deserialize;

/// Smallest supported ball count.
pub const MIN_BALLS: u16 = 27;

/// Largest supported ball count.
pub const MAX_BALLS: u16 = 127;

/// Errors that can occur when loading or validating configuration.
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

    /// The configuration cannot drive a simulation.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BallClockConfig {
    /// Clock parameters.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BallClockConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The result is not validated; call [`ClockConfig::validate`] once any
    /// command-line overrides have been applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Parameters of a single simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ClockConfig {
    /// Number of balls in the main queue. Must lie in
    /// [`MIN_BALLS`]`..=`[`MAX_BALLS`]. Zero means "not configured".
    #[serde(default)]
    pub ball_count: u16,

    /// Simulated minutes to run before stopping (0 = run until the
    /// starting order recurs).
    #[serde(default)]
    pub run_minutes: u64,
}

impl ClockConfig {
    /// Create a clock configuration.
    pub const fn new(ball_count: u16, run_minutes: u64) -> Self {
        Self {
            ball_count,
            run_minutes,
        }
    }

    /// Check that the ball count is within the supported range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] if the ball count lies
    /// outside [`MIN_BALLS`]`..=`[`MAX_BALLS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (MIN_BALLS..=MAX_BALLS).contains(&self.ball_count) {
            Ok(())
        } else {
            Err(ConfigError::InvalidConfiguration {
                reason: format!(
                    "ballCount must be between {MIN_BALLS} and {MAX_BALLS}, got {}",
                    self.ball_count
                ),
            })
        }
    }

    /// The run limit in simulated minutes, if one is set.
    pub const fn run_limit(&self) -> Option<NonZeroU64> {
        NonZeroU64::new(self.run_minutes)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter (trace, debug, info, warn, error). `RUST_LOG`
    /// takes precedence when set.
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
    "info".to_owned()
}

//! Error types for the `ballclock` binary.
//!
//! [`CliError`] wraps every failure mode between argument parsing and
//! printing the result, so `main` can propagate with `?`.

use ballclock_core::config::ConfigError;
use ballclock_core::engine::EngineError;
use ballclock_core::pipeline::PipelineError;
use ballclock_core::runner::RunnerError;

/// Top-level error for the `ballclock` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The engine could not be constructed.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: EngineError,
    },

    /// The sequential run failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: RunnerError,
    },

    /// The task pipeline failed.
    #[error("pipeline error: {source}")]
    Pipeline {
        /// The underlying pipeline error.
        #[from]
        source: PipelineError,
    },

    /// The result could not be rendered.
    #[error("render error: {source}")]
    Render {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl CliError {
    /// Whether the error is a rejected ball count or similar bad input,
    /// which is reported together with the usage text.
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::Config {
                source: ConfigError::InvalidConfiguration { .. }
            } | Self::Engine {
                source: EngineError::Config {
                    source: ConfigError::InvalidConfiguration { .. }
                }
            } | Self::Pipeline {
                source: PipelineError::Config {
                    source: ConfigError::InvalidConfiguration { .. }
                }
            }
        )
    }
}

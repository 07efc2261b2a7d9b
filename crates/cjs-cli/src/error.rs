//! Error handling for the cjsrt CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Harness error outside a fixture run
    #[error("Harness error: {0}")]
    Harness(#[from] cjs_harness::HarnessError),

    /// Engine error while preparing a run
    #[error("Engine error: {0}")]
    Engine(#[from] cjs_harness::EngineError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parse error
    #[error("Serialization error: {0}")]
    Serde(#[from] toml::de::Error),

    /// JSON report error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("Error: {0}")]
    Generic(#[from] anyhow::Error),

    /// Invalid command arguments
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// Missing required file or resource
    #[error("Missing resource: {0}")]
    MissingResource(String),

    /// At least one fixture did not roundtrip
    #[error("{failed} of {total} fixtures failed")]
    FixturesFailed {
        /// Failed fixtures
        failed: usize,
        /// Fixtures requested
        total: usize,
    },

    /// Two texts are not equivalent
    #[error("texts differ ({0} differences)")]
    Differences(usize),

    /// Debug target could not be started
    #[error("Launch error: {0}")]
    Launch(String),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }

    /// Create a missing resource error
    pub fn missing_resource(msg: impl Into<String>) -> Self {
        Self::MissingResource(msg.into())
    }

    /// Create a launch error
    pub fn launch(msg: impl Into<String>) -> Self {
        Self::Launch(msg.into())
    }
}

//! Error types for the CLI application.

use chronosieve_eval::EvalError;
use chronosieve_pipeline::PipelineError;
use chronosieve_store::StoreError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Pipeline error
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Link store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Evaluation error
    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),

    /// The checked corpus holds contradicting links
    #[error("Found {0} conflicting link(s)")]
    Inconsistent(usize),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::InvalidInput(_) | CliError::Toml(_) => 2,
            CliError::Inconsistent(_) => 3,
            _ => 1,
        }
    }
}

//! Error types for the pipeline

use chronosieve_domain::AlgebraError;
use chronosieve_store::StoreError;
use thiserror::Error;

/// Errors that can occur while building or running a pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A configured stage cannot run
    #[error("Sieve '{name}' unavailable: {reason}")]
    SieveUnavailable {
        /// Stage name
        name: String,
        /// Why it cannot run
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Relation algebra error
    #[error("Algebra error: {0}")]
    Algebra(#[from] AlgebraError),

    /// Link store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A worker task failed to complete
    #[error("Task join error: {0}")]
    Join(String),
}

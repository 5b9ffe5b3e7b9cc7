//! Store error types

use chronosieve_domain::AlgebraError;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A closure rule file could not be parsed
    #[error("Closure rule error on line {line}: {reason}")]
    RuleFile {
        /// One-based line number
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// A derived link could not be built
    #[error(transparent)]
    Algebra(#[from] AlgebraError),
}

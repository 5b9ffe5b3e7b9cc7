//! Evaluation error types

use thiserror::Error;

/// Errors that can occur during evaluation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Two gold documents share an identifier
    #[error("Duplicate gold document: {0}")]
    DuplicateDocument(String),
}

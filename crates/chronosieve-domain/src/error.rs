//! Domain error types

use crate::relation::{RelationMode, RelationType};
use thiserror::Error;

/// Errors raised by the relation algebra and link construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgebraError {
    /// A relation label matched none of the known relations or aliases
    #[error("Unknown relation label: '{0}'")]
    UnknownRelationLabel(String),

    /// The mode has no rule for the requested relation
    #[error("No {mode} rule for relation {relation}")]
    MissingModeRule {
        /// Relation that was looked up
        relation: RelationType,
        /// Mode it was looked up in
        mode: RelationMode,
    },

    /// Both endpoints of a link name the same entity
    #[error("Link endpoints must differ, got '{0}' twice")]
    SelfLink(String),

    /// An endpoint identifier was blank
    #[error("Link endpoint is empty")]
    EmptyEndpoint,
}

/// Errors a sieve can report while annotating a document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SieveError {
    /// A resource the sieve depends on could not be used
    #[error("Resource unavailable: {0}")]
    Unavailable(String),

    /// The sieve failed while processing the document
    #[error("Sieve failed: {0}")]
    Failed(String),

    /// The sieve built an invalid link
    #[error(transparent)]
    Algebra(#[from] AlgebraError),
}

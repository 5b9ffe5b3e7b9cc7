//! Chronosieve Domain Layer
//!
//! Core vocabulary for temporal relation extraction. Defines the relation
//! algebra, temporal links, the document model sieves read from, and the
//! [`Sieve`] trait every annotator implements.
//!
//! ## Key Concepts
//!
//! - **RelationType**: one of seventeen interval relations, closed under inversion
//! - **RelationMode**: a vocabulary restriction with its reduction table
//! - **TemporalLink**: a directed relation between two entity identifiers
//! - **Equivalence**: a link and its inverse restatement are the same fact
//!
//! No I/O happens here. Everything is pure data and functions.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod link;
pub mod relation;
pub mod traits;

// Re-exports for convenience
pub use document::{Document, Entity, EntityKind, Sentence};
pub use error::{AlgebraError, SieveError};
pub use link::{conflicts, equivalent, rank_by_confidence, LinkRecord, PairKey, TemporalLink};
pub use relation::{invert, invert_in, reduce_relation, Reduction, RelationMode, RelationType};
pub use traits::Sieve;

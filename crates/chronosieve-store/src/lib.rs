//! Chronosieve Storage Layer
//!
//! The per-document [`LinkStore`] that accumulates accepted temporal links,
//! plus the transitive closure rule table it can expand itself with.
//!
//! # Examples
//!
//! ```
//! use chronosieve_domain::{RelationType, TemporalLink};
//! use chronosieve_store::{LinkStore, ProposalOutcome};
//!
//! let mut store = LinkStore::new();
//! let first = TemporalLink::new("e1", "e2", RelationType::Before).unwrap();
//! assert_eq!(store.propose(first), ProposalOutcome::Accepted);
//!
//! let restated = TemporalLink::new("e2", "e1", RelationType::After).unwrap();
//! assert_eq!(store.propose(restated), ProposalOutcome::Duplicate);
//! ```

#![warn(missing_docs)]

pub mod closure;
pub mod error;
pub mod link_store;

pub use closure::ClosureRules;
pub use error::StoreError;
pub use link_store::{check_consistency, ClosureReport, ConflictEvent, LinkStore, ProposalOutcome};

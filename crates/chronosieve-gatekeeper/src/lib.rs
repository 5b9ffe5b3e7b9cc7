//! Chronosieve Gatekeeper
//!
//! Screens proposed links before they reach the link store.
//!
//! The Gatekeeper provides:
//! - Confidence bounds checking
//! - Endpoint resolution against the document's entities
//! - Relation vocabulary checking for the active mode
//!
//! # Examples
//!
//! ```
//! use chronosieve_domain::{RelationMode, RelationType, TemporalLink};
//! use chronosieve_gatekeeper::{Gatekeeper, ValidationConfig, ValidationStatus};
//!
//! let gatekeeper = Gatekeeper::new(ValidationConfig::default());
//! let link = TemporalLink::new("e1", "e2", RelationType::Before).unwrap();
//! let result = gatekeeper.validate(&link, RelationMode::Full, None);
//! assert_eq!(result.status, ValidationStatus::Accepted);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod validator;

pub use config::ValidationConfig;
pub use error::GatekeeperError;
pub use validator::{Gatekeeper, RejectionReason, ValidationResult, ValidationStatus};

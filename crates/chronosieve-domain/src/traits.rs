//! Trait definitions for pluggable annotators
//!
//! Sieves are implemented by the application layer (chronosieve-pipeline)
//! and by anything embedding the engine.

use crate::error::SieveError;
use crate::{Document, TemporalLink};

/// A component that proposes temporal links for a document
///
/// Sieves run one after another. Each sees the document and the links
/// accepted so far, and returns new proposals in priority order.
pub trait Sieve: Send + Sync {
    /// Stable name used for provenance and statistics
    fn name(&self) -> &str;

    /// Propose links for `document`
    fn annotate(
        &self,
        document: &Document,
        accepted: &[TemporalLink],
    ) -> Result<Vec<TemporalLink>, SieveError>;
}

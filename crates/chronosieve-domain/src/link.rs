//! Temporal links between two entities of a document
//!
//! A link and its restatement with swapped endpoints and the inverse
//! relation describe the same fact. Equality of facts is therefore
//! [`equivalent`], not `==`.

use crate::error::AlgebraError;
use crate::relation::{reduce_relation, RelationMode, RelationType};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Order-insensitive key for the pair of entities a link covers
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(String, String);

impl PairKey {
    /// Build the key for two endpoints in either order
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_string(), b.to_string())
        } else {
            Self(b.to_string(), a.to_string())
        }
    }

    /// Smaller endpoint
    pub fn first(&self) -> &str {
        &self.0
    }

    /// Larger endpoint
    pub fn second(&self) -> &str {
        &self.1
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.0, self.1)
    }
}

/// A directed temporal relation between two entity identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LinkRecord", into = "LinkRecord")]
pub struct TemporalLink {
    endpoint1: String,
    endpoint2: String,
    relation: RelationType,
    original_label: Option<String>,
    origin: Option<String>,
    confidence: f64,
    is_closure: bool,
}

fn check_endpoints(endpoint1: &str, endpoint2: &str) -> Result<(), AlgebraError> {
    if endpoint1.trim().is_empty() || endpoint2.trim().is_empty() {
        return Err(AlgebraError::EmptyEndpoint);
    }
    if endpoint1 == endpoint2 {
        return Err(AlgebraError::SelfLink(endpoint1.to_string()));
    }
    Ok(())
}

impl TemporalLink {
    /// Create a link, rejecting blank or identical endpoints
    pub fn new(
        endpoint1: impl Into<String>,
        endpoint2: impl Into<String>,
        relation: RelationType,
    ) -> Result<Self, AlgebraError> {
        let endpoint1 = endpoint1.into();
        let endpoint2 = endpoint2.into();
        check_endpoints(&endpoint1, &endpoint2)?;

        Ok(Self {
            endpoint1,
            endpoint2,
            relation,
            original_label: None,
            origin: None,
            confidence: 0.0,
            is_closure: false,
        })
    }

    /// Create a link from an external relation label, keeping the label when
    /// it differs from the canonical name
    pub fn from_label(
        endpoint1: impl Into<String>,
        endpoint2: impl Into<String>,
        label: &str,
    ) -> Result<Self, AlgebraError> {
        let relation = RelationType::normalize_from_label(label)?;
        let mut link = Self::new(endpoint1, endpoint2, relation)?;
        if label != relation.as_str() {
            link.original_label = Some(label.to_string());
        }
        Ok(link)
    }

    /// Create a link that was derived by closure
    pub fn derived(
        endpoint1: impl Into<String>,
        endpoint2: impl Into<String>,
        relation: RelationType,
    ) -> Result<Self, AlgebraError> {
        let mut link = Self::new(endpoint1, endpoint2, relation)?;
        link.is_closure = true;
        Ok(link)
    }

    /// Builder-style origin
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Builder-style confidence
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// First endpoint
    pub fn endpoint1(&self) -> &str {
        &self.endpoint1
    }

    /// Second endpoint
    pub fn endpoint2(&self) -> &str {
        &self.endpoint2
    }

    /// Relation from the first endpoint to the second
    pub fn relation(&self) -> RelationType {
        self.relation
    }

    /// The non-canonical label this link was parsed from, if any
    pub fn original_label(&self) -> Option<&str> {
        self.original_label.as_deref()
    }

    /// Name of whatever proposed the link
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Proposer's confidence
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// True if the link was derived by closure
    pub fn is_closure(&self) -> bool {
        self.is_closure
    }

    /// Replace the relation
    pub fn set_relation(&mut self, relation: RelationType) {
        self.relation = relation;
    }

    /// Replace the confidence
    pub fn set_confidence(&mut self, confidence: f64) {
        self.confidence = confidence;
    }

    /// Replace the origin
    pub fn set_origin(&mut self, origin: impl Into<String>) {
        self.origin = Some(origin.into());
    }

    /// Mark or unmark the link as closure-derived
    pub fn set_closure(&mut self, is_closure: bool) {
        self.is_closure = is_closure;
    }

    /// Key of the unordered endpoint pair
    pub fn ordered_pair_key(&self) -> PairKey {
        PairKey::new(&self.endpoint1, &self.endpoint2)
    }

    /// True if both links cover the same unordered pair
    pub fn covers_same_pair(&self, other: &TemporalLink) -> bool {
        (self.endpoint1 == other.endpoint1 && self.endpoint2 == other.endpoint2)
            || (self.endpoint1 == other.endpoint2 && self.endpoint2 == other.endpoint1)
    }

    /// The relation as seen from the lexicographically smaller endpoint
    pub fn ordered_relation(&self) -> RelationType {
        if self.endpoint1 <= self.endpoint2 {
            self.relation
        } else {
            self.relation.inverse()
        }
    }

    /// The same fact with endpoints swapped and the relation inverted
    pub fn restated(&self) -> TemporalLink {
        let mut link = self.clone();
        link.swap_endpoints();
        link.relation = self.relation.inverse();
        link
    }

    fn swap_endpoints(&mut self) {
        std::mem::swap(&mut self.endpoint1, &mut self.endpoint2);
    }

    /// Rewrite the link into the vocabulary of `mode`, swapping endpoints
    /// where the reduced relation requires it
    pub fn canonicalize(&mut self, mode: RelationMode) {
        let reduction = reduce_relation(self.relation, mode);
        if reduction.swap {
            self.swap_endpoints();
        }
        self.relation = reduction.relation;
    }

    /// Canonicalized copy of the link
    pub fn canonicalized(&self, mode: RelationMode) -> TemporalLink {
        let mut link = self.clone();
        link.canonicalize(mode);
        link
    }

    /// Restatement whose relation is checked against `mode`
    pub fn inverted_in(&self, mode: RelationMode) -> Result<TemporalLink, AlgebraError> {
        let relation = crate::relation::invert_in(self.relation, mode)?;
        let mut link = self.clone();
        link.swap_endpoints();
        link.relation = relation;
        Ok(link)
    }

    /// Rewrite backward relations (after, is-included, ...) into their
    /// forward partner by swapping endpoints
    pub fn to_one_direction(&mut self) {
        if self.relation.is_backward() {
            self.swap_endpoints();
            self.relation = self.relation.inverse();
        }
    }

    /// See [`equivalent`]
    pub fn is_equivalent_to(&self, other: &TemporalLink) -> bool {
        equivalent(self, other)
    }

    /// See [`conflicts`]
    pub fn conflicts_with(&self, other: &TemporalLink) -> bool {
        conflicts(self, other)
    }
}

impl fmt::Display for TemporalLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}={}", self.endpoint1, self.endpoint2, self.relation)?;
        if let Some(origin) = &self.origin {
            write!(f, " ({})", origin)?;
        }
        if self.is_closure {
            write!(f, " [closure]")?;
        }
        Ok(())
    }
}

/// True if both links state the same fact
pub fn equivalent(a: &TemporalLink, b: &TemporalLink) -> bool {
    if a.endpoint1 == b.endpoint1 && a.endpoint2 == b.endpoint2 {
        a.relation == b.relation
    } else if a.endpoint1 == b.endpoint2 && a.endpoint2 == b.endpoint1 {
        a.relation == b.relation.inverse()
    } else {
        false
    }
}

/// True if both links cover the same pair but disagree on the relation
pub fn conflicts(a: &TemporalLink, b: &TemporalLink) -> bool {
    a.covers_same_pair(b) && !equivalent(a, b)
}

/// Sort links by descending confidence. Ties keep their relative order.
pub fn rank_by_confidence(links: &mut [TemporalLink]) {
    links.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
}

/// Flat serialized form of a link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// First endpoint
    pub event1: String,
    /// Second endpoint
    pub event2: String,
    /// Relation label
    pub relation: String,
    /// Whether the link was derived by closure
    #[serde(default)]
    pub closed: bool,
    /// Proposer name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Proposer confidence
    #[serde(default)]
    pub confidence: f64,
}

impl From<TemporalLink> for LinkRecord {
    fn from(link: TemporalLink) -> Self {
        Self {
            relation: link.relation.as_str().to_string(),
            event1: link.endpoint1,
            event2: link.endpoint2,
            closed: link.is_closure,
            origin: link.origin,
            confidence: link.confidence,
        }
    }
}

impl From<&TemporalLink> for LinkRecord {
    fn from(link: &TemporalLink) -> Self {
        LinkRecord::from(link.clone())
    }
}

impl TryFrom<LinkRecord> for TemporalLink {
    type Error = AlgebraError;

    fn try_from(record: LinkRecord) -> Result<Self, Self::Error> {
        let mut link = TemporalLink::from_label(record.event1, record.event2, &record.relation)?;
        link.is_closure = record.closed;
        link.origin = record.origin;
        link.confidence = record.confidence;
        Ok(link)
    }
}

//! Temporal relation algebra
//!
//! The closed set of relation types between two temporal entities, their
//! inverses, and the relation modes that restrict the vocabulary a pipeline
//! works in. Every function here is pure; the active mode is always an
//! explicit argument.

use crate::error::AlgebraError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A temporal relation from a first endpoint to a second endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelationType {
    /// First ends before second starts, with a gap
    Before,
    /// Inverse of [`RelationType::Before`]
    After,
    /// First ends exactly where second starts
    IBefore,
    /// Inverse of [`RelationType::IBefore`]
    IAfter,
    /// First contains second
    Includes,
    /// Inverse of [`RelationType::Includes`]
    IsIncluded,
    /// First starts together with second and ends earlier
    Begins,
    /// Inverse of [`RelationType::Begins`]
    BegunBy,
    /// First ends together with second and starts later
    Ends,
    /// Inverse of [`RelationType::Ends`]
    EndedBy,
    /// Same interval
    Simultaneous,
    /// Intervals overlap in some unspecified way
    Overlap,
    /// Either before or overlapping
    BeforeOrOverlap,
    /// Inverse of [`RelationType::BeforeOrOverlap`]
    OverlapOrAfter,
    /// A relation exists but annotators could not pin it down
    Vague,
    /// No information
    Unknown,
    /// Explicitly no relation
    None,
}

impl RelationType {
    /// Every relation type, in declaration order
    pub const ALL: [RelationType; 17] = [
        RelationType::Before,
        RelationType::After,
        RelationType::IBefore,
        RelationType::IAfter,
        RelationType::Includes,
        RelationType::IsIncluded,
        RelationType::Begins,
        RelationType::BegunBy,
        RelationType::Ends,
        RelationType::EndedBy,
        RelationType::Simultaneous,
        RelationType::Overlap,
        RelationType::BeforeOrOverlap,
        RelationType::OverlapOrAfter,
        RelationType::Vague,
        RelationType::Unknown,
        RelationType::None,
    ];

    /// Canonical upper-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Before => "BEFORE",
            RelationType::After => "AFTER",
            RelationType::IBefore => "IBEFORE",
            RelationType::IAfter => "IAFTER",
            RelationType::Includes => "INCLUDES",
            RelationType::IsIncluded => "IS_INCLUDED",
            RelationType::Begins => "BEGINS",
            RelationType::BegunBy => "BEGUN_BY",
            RelationType::Ends => "ENDS",
            RelationType::EndedBy => "ENDED_BY",
            RelationType::Simultaneous => "SIMULTANEOUS",
            RelationType::Overlap => "OVERLAP",
            RelationType::BeforeOrOverlap => "BEFORE_OR_OVERLAP",
            RelationType::OverlapOrAfter => "OVERLAP_OR_AFTER",
            RelationType::Vague => "VAGUE",
            RelationType::Unknown => "UNKNOWN",
            RelationType::None => "NONE",
        }
    }

    /// The relation that holds when the endpoints are swapped.
    ///
    /// Total over the full vocabulary and an involution.
    pub fn inverse(&self) -> RelationType {
        match self {
            RelationType::Before => RelationType::After,
            RelationType::After => RelationType::Before,
            RelationType::IBefore => RelationType::IAfter,
            RelationType::IAfter => RelationType::IBefore,
            RelationType::Includes => RelationType::IsIncluded,
            RelationType::IsIncluded => RelationType::Includes,
            RelationType::Begins => RelationType::BegunBy,
            RelationType::BegunBy => RelationType::Begins,
            RelationType::Ends => RelationType::EndedBy,
            RelationType::EndedBy => RelationType::Ends,
            RelationType::BeforeOrOverlap => RelationType::OverlapOrAfter,
            RelationType::OverlapOrAfter => RelationType::BeforeOrOverlap,
            RelationType::Simultaneous
            | RelationType::Overlap
            | RelationType::Vague
            | RelationType::Unknown
            | RelationType::None => *self,
        }
    }

    /// True if the relation is its own inverse
    pub fn is_self_inverse(&self) -> bool {
        self.inverse() == *self
    }

    /// True for the "backward" half of each inverse pair.
    ///
    /// [`TemporalLink::to_one_direction`](crate::TemporalLink::to_one_direction)
    /// rewrites these into their forward partner by swapping endpoints.
    pub fn is_backward(&self) -> bool {
        matches!(
            self,
            RelationType::After
                | RelationType::IAfter
                | RelationType::IsIncluded
                | RelationType::BegunBy
                | RelationType::EndedBy
                | RelationType::OverlapOrAfter
        )
    }

    /// Parse an external relation label.
    ///
    /// Matching ignores case and surrounding whitespace, and treats `-` as
    /// `_`. The interval-algebra names `during`, `during_inv` and `identity`
    /// are accepted as aliases.
    pub fn normalize_from_label(text: &str) -> Result<RelationType, AlgebraError> {
        let label = text.trim().replace('-', "_").to_uppercase();
        match label.as_str() {
            "DURING" => return Ok(RelationType::IsIncluded),
            "DURING_INV" => return Ok(RelationType::Includes),
            "IDENTITY" => return Ok(RelationType::Simultaneous),
            _ => {}
        }
        RelationType::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == label)
            .ok_or_else(|| AlgebraError::UnknownRelationLabel(text.to_string()))
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = AlgebraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationType::normalize_from_label(s)
    }
}

/// Vocabulary restriction a pipeline runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationMode {
    /// All seventeen relations
    #[default]
    Full,
    /// Immediate relations folded into their plain forms, begins/ends into includes
    Reduced,
    /// Before, after and overlap, with begins/ends oriented like includes
    Basic,
    /// Before, after and overlap
    Symmetry,
    /// All relations, compared up to inversion
    #[serde(alias = "fullsymmetry")]
    FullSymmetry,
    /// Only before, everything else is none
    #[serde(alias = "before")]
    BeforeOnly,
    /// The six-label TempEval vocabulary
    Tempeval,
}

const FULL_VOCABULARY: &[RelationType] = &RelationType::ALL;

const REDUCED_VOCABULARY: &[RelationType] = &[
    RelationType::Before,
    RelationType::After,
    RelationType::Includes,
    RelationType::IsIncluded,
    RelationType::Simultaneous,
    RelationType::Overlap,
    RelationType::BeforeOrOverlap,
    RelationType::OverlapOrAfter,
    RelationType::Vague,
    RelationType::Unknown,
    RelationType::None,
];

const SYMMETRY_VOCABULARY: &[RelationType] = &[
    RelationType::Before,
    RelationType::After,
    RelationType::Overlap,
    RelationType::BeforeOrOverlap,
    RelationType::OverlapOrAfter,
    RelationType::Vague,
    RelationType::Unknown,
    RelationType::None,
];

const BEFORE_ONLY_VOCABULARY: &[RelationType] = &[RelationType::Before, RelationType::None];

const TEMPEVAL_VOCABULARY: &[RelationType] = &[
    RelationType::Before,
    RelationType::After,
    RelationType::Overlap,
    RelationType::BeforeOrOverlap,
    RelationType::OverlapOrAfter,
    RelationType::None,
];

impl RelationMode {
    /// Every mode
    pub const ALL: [RelationMode; 7] = [
        RelationMode::Full,
        RelationMode::Reduced,
        RelationMode::Basic,
        RelationMode::Symmetry,
        RelationMode::FullSymmetry,
        RelationMode::BeforeOnly,
        RelationMode::Tempeval,
    ];

    /// Lower-case mode name as used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationMode::Full => "full",
            RelationMode::Reduced => "reduced",
            RelationMode::Basic => "basic",
            RelationMode::Symmetry => "symmetry",
            RelationMode::FullSymmetry => "full_symmetry",
            RelationMode::BeforeOnly => "before_only",
            RelationMode::Tempeval => "tempeval",
        }
    }

    /// Relations a canonicalized link can carry in this mode
    pub fn vocabulary(&self) -> &'static [RelationType] {
        match self {
            RelationMode::Full | RelationMode::FullSymmetry => FULL_VOCABULARY,
            RelationMode::Reduced => REDUCED_VOCABULARY,
            RelationMode::Basic | RelationMode::Symmetry => SYMMETRY_VOCABULARY,
            RelationMode::BeforeOnly => BEFORE_ONLY_VOCABULARY,
            RelationMode::Tempeval => TEMPEVAL_VOCABULARY,
        }
    }

    /// True if `relation` belongs to this mode's vocabulary
    pub fn admits(&self, relation: RelationType) -> bool {
        self.vocabulary().contains(&relation)
    }
}

impl fmt::Display for RelationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().replace('-', "_").to_lowercase();
        match name.as_str() {
            "full" => Ok(RelationMode::Full),
            "reduced" => Ok(RelationMode::Reduced),
            "basic" => Ok(RelationMode::Basic),
            "symmetry" => Ok(RelationMode::Symmetry),
            "full_symmetry" | "fullsymmetry" => Ok(RelationMode::FullSymmetry),
            "before_only" | "before" => Ok(RelationMode::BeforeOnly),
            "tempeval" => Ok(RelationMode::Tempeval),
            _ => Err(format!("Unknown relation mode: '{}'", s)),
        }
    }
}

/// Result of rewriting a relation into a mode's vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reduction {
    /// Relation in the target vocabulary
    pub relation: RelationType,
    /// Whether the link's endpoints must be swapped for the relation to hold
    pub swap: bool,
}

impl Reduction {
    fn keep(relation: RelationType) -> Self {
        Self { relation, swap: false }
    }

    fn swapped(relation: RelationType) -> Self {
        Self { relation, swap: true }
    }
}

/// Rewrite a relation into the vocabulary of `mode`.
///
/// A link and its restatement with swapped endpoints and inverse relation
/// always reduce to the same fact, and reducing twice is the same as
/// reducing once.
pub fn reduce_relation(relation: RelationType, mode: RelationMode) -> Reduction {
    use RelationType as R;

    match mode {
        RelationMode::Full | RelationMode::FullSymmetry => Reduction::keep(relation),
        RelationMode::Reduced => match relation {
            R::IBefore => Reduction::keep(R::Before),
            R::IAfter => Reduction::keep(R::After),
            R::BegunBy | R::EndedBy => Reduction::keep(R::Includes),
            R::Begins | R::Ends => Reduction::swapped(R::Includes),
            other => Reduction::keep(other),
        },
        RelationMode::Basic | RelationMode::Symmetry => match relation {
            R::IBefore => Reduction::keep(R::Before),
            R::IAfter => Reduction::keep(R::After),
            R::Includes | R::IsIncluded | R::BegunBy | R::EndedBy | R::Simultaneous => {
                Reduction::keep(R::Overlap)
            }
            R::Begins | R::Ends if mode == RelationMode::Basic => Reduction::swapped(R::Overlap),
            R::Begins | R::Ends => Reduction::keep(R::Overlap),
            other => Reduction::keep(other),
        },
        RelationMode::BeforeOnly => match relation {
            R::Before | R::IBefore => Reduction::keep(R::Before),
            R::After | R::IAfter => Reduction::swapped(R::Before),
            _ => Reduction::keep(R::None),
        },
        RelationMode::Tempeval => match relation {
            R::Before | R::IBefore => Reduction::keep(R::Before),
            R::After | R::IAfter => Reduction::keep(R::After),
            R::None | R::BeforeOrOverlap | R::OverlapOrAfter => Reduction::keep(relation),
            _ => Reduction::keep(R::Overlap),
        },
    }
}

/// Inverse in the full vocabulary
pub fn invert(relation: RelationType) -> RelationType {
    relation.inverse()
}

/// Inverse restricted to the vocabulary of `mode`.
///
/// Fails when the relation, or its inverse, is not part of the mode.
pub fn invert_in(relation: RelationType, mode: RelationMode) -> Result<RelationType, AlgebraError> {
    let inverse = relation.inverse();
    if mode.admits(relation) && mode.admits(inverse) {
        Ok(inverse)
    } else {
        Err(AlgebraError::MissingModeRule { relation, mode })
    }
}

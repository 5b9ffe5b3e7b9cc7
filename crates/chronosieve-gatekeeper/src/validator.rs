//! Link validation logic

use crate::{GatekeeperError, ValidationConfig};
use chronosieve_domain::{Document, RelationMode, RelationType, TemporalLink};

/// Result of link validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether the link passed validation
    pub status: ValidationStatus,

    /// Rejection reasons (if any)
    pub reasons: Vec<RejectionReason>,
}

impl ValidationResult {
    /// True if the link passed
    pub fn is_accepted(&self) -> bool {
        self.status == ValidationStatus::Accepted
    }
}

/// Validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Link accepted
    Accepted,

    /// Link rejected
    Rejected,
}

/// Reasons for rejection
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Confidence is NaN or outside [0.0, 1.0]
    InvalidConfidence(f64),

    /// Confidence is below the configured minimum
    BelowMinConfidence {
        /// Minimum required
        required: f64,
        /// Actual confidence
        actual: f64,
    },

    /// An endpoint does not name an entity of the document
    UnknownEntity(String),

    /// The relation is outside the active mode's vocabulary
    OutsideVocabulary {
        /// Proposed relation
        relation: RelationType,
        /// Active mode
        mode: RelationMode,
    },
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::InvalidConfidence(c) => {
                write!(f, "confidence {} is outside [0.0, 1.0]", c)
            }
            RejectionReason::BelowMinConfidence { required, actual } => {
                write!(f, "confidence {} is below the minimum {}", actual, required)
            }
            RejectionReason::UnknownEntity(id) => write!(f, "unknown entity '{}'", id),
            RejectionReason::OutsideVocabulary { relation, mode } => {
                write!(f, "{} is not part of the {} vocabulary", relation, mode)
            }
        }
    }
}

/// The Gatekeeper validates proposed links before they are proposed to a store
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper after checking the configuration
    pub fn try_new(config: ValidationConfig) -> Result<Self, GatekeeperError> {
        config.validate().map_err(GatekeeperError::Config)?;
        Ok(Self::new(config))
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a proposed link against the configured rules
    ///
    /// # Arguments
    ///
    /// * `link` - The link as proposed, before any mode reduction
    /// * `mode` - The mode the pipeline runs in
    /// * `document` - The document to resolve endpoints against (optional)
    pub fn validate(
        &self,
        link: &TemporalLink,
        mode: RelationMode,
        document: Option<&Document>,
    ) -> ValidationResult {
        let mut reasons = Vec::new();

        // 1. Confidence
        if self.config.validate_confidence_bounds {
            if let Some(reason) = self.validate_confidence(link) {
                reasons.push(reason);
            }
        }

        // 2. Endpoints
        if self.config.validate_known_entities {
            if let Some(document) = document {
                reasons.extend(self.validate_entities(link, document));
            }
        }

        // 3. Vocabulary
        if self.config.validate_vocabulary && !mode.admits(link.relation()) {
            reasons.push(RejectionReason::OutsideVocabulary {
                relation: link.relation(),
                mode,
            });
        }

        let status = if reasons.is_empty() {
            ValidationStatus::Accepted
        } else {
            ValidationStatus::Rejected
        };

        ValidationResult { status, reasons }
    }

    fn validate_confidence(&self, link: &TemporalLink) -> Option<RejectionReason> {
        let confidence = link.confidence();
        if !(0.0..=1.0).contains(&confidence) {
            return Some(RejectionReason::InvalidConfidence(confidence));
        }
        if confidence < self.config.min_confidence {
            return Some(RejectionReason::BelowMinConfidence {
                required: self.config.min_confidence,
                actual: confidence,
            });
        }
        None
    }

    fn validate_entities(&self, link: &TemporalLink, document: &Document) -> Vec<RejectionReason> {
        [link.endpoint1(), link.endpoint2()]
            .into_iter()
            .filter(|id| {
                document.entity(id).is_none() && document.creation_time.as_deref() != Some(*id)
            })
            .map(|id| RejectionReason::UnknownEntity(id.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronosieve_domain::{Entity, Sentence};

    fn create_test_document() -> Document {
        Document::new("doc")
            .with_creation_time("t0")
            .with_sentence(Sentence::new(vec![
                Entity::event("e1", 0),
                Entity::event("e2", 3),
            ]))
    }

    fn create_test_link() -> TemporalLink {
        TemporalLink::new("e1", "e2", RelationType::Before)
            .unwrap()
            .with_confidence(0.8)
    }

    #[test]
    fn test_valid_link() {
        let gatekeeper = Gatekeeper::default_config();
        let doc = create_test_document();
        let result = gatekeeper.validate(&create_test_link(), RelationMode::Full, Some(&doc));

        assert_eq!(result.status, ValidationStatus::Accepted);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_confidence_out_of_range() {
        let gatekeeper = Gatekeeper::default_config();
        let link = create_test_link().with_confidence(1.5);
        let result = gatekeeper.validate(&link, RelationMode::Full, None);

        assert_eq!(result.status, ValidationStatus::Rejected);
        assert_eq!(result.reasons, vec![RejectionReason::InvalidConfidence(1.5)]);
    }

    #[test]
    fn test_nan_confidence() {
        let gatekeeper = Gatekeeper::default_config();
        let link = create_test_link().with_confidence(f64::NAN);
        let result = gatekeeper.validate(&link, RelationMode::Full, None);
        assert!(!result.is_accepted());
    }

    #[test]
    fn test_min_confidence() {
        let gatekeeper = Gatekeeper::try_new(ValidationConfig {
            min_confidence: 0.9,
            ..ValidationConfig::default()
        })
        .unwrap();
        let result = gatekeeper.validate(&create_test_link(), RelationMode::Full, None);
        match &result.reasons[0] {
            RejectionReason::BelowMinConfidence { required, actual } => {
                assert_eq!(*required, 0.9);
                assert_eq!(*actual, 0.8);
            }
            _ => panic!("Expected BelowMinConfidence"),
        }
    }

    #[test]
    fn test_unknown_entity() {
        let gatekeeper = Gatekeeper::default_config();
        let doc = create_test_document();
        let link = TemporalLink::new("e1", "e9", RelationType::Before).unwrap();
        let result = gatekeeper.validate(&link, RelationMode::Full, Some(&doc));
        assert_eq!(result.reasons, vec![RejectionReason::UnknownEntity("e9".to_string())]);
    }

    #[test]
    fn test_creation_time_is_known() {
        let gatekeeper = Gatekeeper::default_config();
        let doc = create_test_document();
        let link = TemporalLink::new("e1", "t0", RelationType::Vague).unwrap();
        assert!(gatekeeper
            .validate(&link, RelationMode::Full, Some(&doc))
            .is_accepted());
    }

    #[test]
    fn test_vocabulary_only_when_strict() {
        let link = TemporalLink::new("e1", "e2", RelationType::Includes).unwrap();

        let lenient = Gatekeeper::default_config();
        assert!(lenient.validate(&link, RelationMode::Tempeval, None).is_accepted());

        let strict = Gatekeeper::new(ValidationConfig::strict());
        let result = strict.validate(&link, RelationMode::Tempeval, None);
        assert_eq!(
            result.reasons,
            vec![RejectionReason::OutsideVocabulary {
                relation: RelationType::Includes,
                mode: RelationMode::Tempeval,
            }]
        );
    }

    #[test]
    fn test_multiple_validation_errors() {
        let gatekeeper = Gatekeeper::new(ValidationConfig::strict());
        let doc = create_test_document();
        let link = TemporalLink::new("x", "y", RelationType::Begins)
            .unwrap()
            .with_confidence(-0.1);
        let result = gatekeeper.validate(&link, RelationMode::Basic, Some(&doc));
        assert_eq!(result.reasons.len(), 4);
    }

    #[test]
    fn test_try_new_rejects_bad_config() {
        let err = Gatekeeper::try_new(ValidationConfig {
            min_confidence: -1.0,
            ..ValidationConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, GatekeeperError::Config(_)));
    }
}

//! Gatekeeper configuration

use serde::{Deserialize, Serialize};

/// Configuration for validation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject confidences outside [0.0, 1.0] or NaN
    pub validate_confidence_bounds: bool,

    /// Reject links whose endpoints are not entities of the document
    pub validate_known_entities: bool,

    /// Reject relations the active mode does not admit as proposed,
    /// instead of reducing them into the mode
    pub validate_vocabulary: bool,

    /// Minimum confidence a proposal needs
    pub min_confidence: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_confidence_bounds: true,
            validate_known_entities: true,
            validate_vocabulary: false,
            min_confidence: 0.0,
        }
    }
}

impl ValidationConfig {
    /// Create a permissive configuration (bounds checking only)
    pub fn permissive() -> Self {
        Self {
            validate_confidence_bounds: true,
            validate_known_entities: false,
            validate_vocabulary: false,
            min_confidence: 0.0,
        }
    }

    /// Create a strict configuration (all validations enabled)
    pub fn strict() -> Self {
        Self {
            validate_confidence_bounds: true,
            validate_known_entities: true,
            validate_vocabulary: true,
            min_confidence: 0.0,
        }
    }

    /// Check the configuration itself
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(format!(
                "min_confidence must be in [0.0, 1.0], got {}",
                self.min_confidence
            ));
        }
        Ok(())
    }
}

//! Configuration for the Pipeline

use crate::error::PipelineError;
use chronosieve_domain::RelationMode;
use chronosieve_gatekeeper::ValidationConfig;
use chronosieve_store::ClosureRules;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sieves run when no order is configured
pub const DEFAULT_SIEVES: &[&str] = &["TextOrderBefore", "CreationTimeVague", "AllVague"];

/// Configuration for the Pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sieve names in the order they run
    pub sieves: Vec<String>,

    /// Relation vocabulary proposals are reduced into
    pub mode: RelationMode,

    /// Expand transitive closure after every stage
    pub closure: bool,

    /// Closure rule file; the standard rules are used when unset
    pub closure_rules: Option<PathBuf>,

    /// Documents processed at once by the concurrent corpus runner
    pub concurrency: usize,

    /// Screen proposals with the gatekeeper
    pub validate: bool,

    /// Gatekeeper rules
    pub validation: ValidationConfig,
}

impl Default for PipelineConfig {
    /// Baseline configuration: built-in sieves, full mode, no closure
    fn default() -> Self {
        Self {
            sieves: DEFAULT_SIEVES.iter().map(|s| s.to_string()).collect(),
            mode: RelationMode::Full,
            closure: false,
            closure_rules: None,
            concurrency: 4,
            validate: true,
            validation: ValidationConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Baseline preset, identical to `default()`
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Baseline with closure expansion after every stage
    pub fn with_closure() -> Self {
        Self {
            closure: true,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.sieves.is_empty() {
            return Err("sieves must name at least one sieve".to_string());
        }
        if let Some(blank) = self.sieves.iter().position(|s| s.trim().is_empty()) {
            return Err(format!("sieve #{} has an empty name", blank + 1));
        }
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".to_string());
        }
        self.validation.validate()
    }

    /// Closure rules to expand with, or `None` when closure is off
    pub fn load_closure_rules(&self) -> Result<Option<ClosureRules>, PipelineError> {
        if !self.closure {
            return Ok(None);
        }
        match &self.closure_rules {
            None => Ok(Some(ClosureRules::standard())),
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    PipelineError::Config(format!(
                        "Failed to read closure rules {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(Some(ClosureRules::parse(&text)?))
            }
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

/// Parse a sieve list: one name per line, `#` starts a comment
pub fn parse_sieve_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.closure);
    }

    #[test]
    fn test_with_closure_config_is_valid() {
        let config = PipelineConfig::with_closure();
        assert!(config.validate().is_ok());
        assert!(config.closure);
    }

    #[test]
    fn test_empty_sieves_invalid() {
        let mut config = PipelineConfig::default();
        config.sieves.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_invalid() {
        let mut config = PipelineConfig::default();
        config.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = PipelineConfig::with_closure();
        config.mode = RelationMode::Tempeval;
        let toml_str = config.to_toml().unwrap();
        let parsed = PipelineConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = PipelineConfig::from_toml("mode = \"before_only\"\nclosure = true\n").unwrap();
        assert_eq!(parsed.mode, RelationMode::BeforeOnly);
        assert!(parsed.closure);
        assert_eq!(parsed.sieves.len(), DEFAULT_SIEVES.len());
    }

    #[test]
    fn test_closure_rules_disabled() {
        let config = PipelineConfig::default();
        assert!(config.load_closure_rules().unwrap().is_none());
    }

    #[test]
    fn test_closure_rules_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "BEFORE BEFORE BEFORE").unwrap();
        let config = PipelineConfig {
            closure_rules: Some(file.path().to_path_buf()),
            ..PipelineConfig::with_closure()
        };
        let rules = config.load_closure_rules().unwrap().unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_missing_closure_rules_file() {
        let config = PipelineConfig {
            closure_rules: Some(PathBuf::from("/nonexistent/closure.rules")),
            ..PipelineConfig::with_closure()
        };
        assert!(matches!(
            config.load_closure_rules(),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_parse_sieve_list() {
        let list = parse_sieve_list("# order\nTextOrderBefore\n\n  AllVague  # baseline\n");
        assert_eq!(list, vec!["TextOrderBefore", "AllVague"]);
    }
}

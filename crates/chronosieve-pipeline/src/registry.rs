//! Static sieve registry
//!
//! Maps sieve names to factories. Names are resolved once, when a pipeline
//! is built; a name that cannot be resolved becomes an unavailable stage
//! rather than an error, so only documents that reach it are affected.

use crate::sieves::{AllVague, CreationTimeVague, TextOrderBefore};
use chronosieve_domain::{Sieve, SieveError};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// Builds a sieve instance
pub type SieveFactory = Box<dyn Fn() -> Result<Arc<dyn Sieve>, SieveError> + Send + Sync>;

/// One configured pipeline stage
#[derive(Clone)]
pub enum Stage {
    /// A sieve ready to run
    Ready(Arc<dyn Sieve>),

    /// A configured stage that cannot run
    Unavailable {
        /// Configured name
        name: String,
        /// Why it cannot run
        reason: String,
    },
}

impl Stage {
    /// Stage name
    pub fn name(&self) -> &str {
        match self {
            Stage::Ready(sieve) => sieve.name(),
            Stage::Unavailable { name, .. } => name,
        }
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Ready(sieve) => f.debug_tuple("Ready").field(&sieve.name()).finish(),
            Stage::Unavailable { name, reason } => f
                .debug_struct("Unavailable")
                .field("name", name)
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Name to factory table
#[derive(Default)]
pub struct SieveRegistry {
    factories: BTreeMap<String, SieveFactory>,
}

impl SieveRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in rule sieves
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_sieve(TextOrderBefore);
        registry.register_sieve(CreationTimeVague);
        registry.register_sieve(AllVague);
        registry
    }

    /// Register a factory under `name`, replacing any previous one
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Arc<dyn Sieve>, SieveError> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Register an existing sieve under its own name
    pub fn register_sieve<S: Sieve + 'static>(&mut self, sieve: S) {
        let sieve: Arc<dyn Sieve> = Arc::new(sieve);
        let name = sieve.name().to_string();
        self.register(name, move || Ok(Arc::clone(&sieve)));
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// True if `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Resolve one stage
    pub fn stage(&self, name: &str) -> Stage {
        let Some(factory) = self.factories.get(name) else {
            warn!("Unknown sieve '{}'", name);
            return Stage::Unavailable {
                name: name.to_string(),
                reason: "not registered".to_string(),
            };
        };
        match factory() {
            Ok(sieve) => Stage::Ready(sieve),
            Err(e) => {
                warn!("Sieve '{}' failed to load: {}", name, e);
                Stage::Unavailable {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Resolve stages in order
    pub fn stages(&self, names: &[String]) -> Vec<Stage> {
        names.iter().map(|name| self.stage(name)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_registered() {
        let registry = SieveRegistry::with_builtins();
        assert_eq!(
            registry.names(),
            vec!["AllVague", "CreationTimeVague", "TextOrderBefore"]
        );
    }

    #[test]
    fn test_unknown_name_is_unavailable() {
        let registry = SieveRegistry::with_builtins();
        match registry.stage("MissingSieve") {
            Stage::Unavailable { name, reason } => {
                assert_eq!(name, "MissingSieve");
                assert_eq!(reason, "not registered");
            }
            other => panic!("Expected Unavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_failing_factory_is_unavailable() {
        let mut registry = SieveRegistry::new();
        registry.register("Wordnet", || {
            Err(SieveError::Unavailable("dictionary not found".to_string()))
        });
        let stage = registry.stage("Wordnet");
        assert!(matches!(stage, Stage::Unavailable { .. }));
        assert_eq!(stage.name(), "Wordnet");
    }

    #[test]
    fn test_stages_keep_order() {
        let registry = SieveRegistry::with_builtins();
        let names = vec!["AllVague".to_string(), "TextOrderBefore".to_string()];
        let stages = registry.stages(&names);
        let got: Vec<&str> = stages.iter().map(Stage::name).collect();
        assert_eq!(got, vec!["AllVague", "TextOrderBefore"]);
    }
}

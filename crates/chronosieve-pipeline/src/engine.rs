//! Core Pipeline implementation

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::registry::{SieveRegistry, Stage};
use crate::types::{DocumentReport, DocumentStatus, StageReport};
use chronosieve_domain::{Document, RelationMode, Sieve, TemporalLink};
use chronosieve_gatekeeper::Gatekeeper;
use chronosieve_store::{ClosureRules, ConflictEvent, LinkStore, ProposalOutcome};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Runs an ordered list of sieves over documents
///
/// Stages run strictly one after another. Each stage sees every link
/// accepted before it, and within a stage each proposal sees the ones
/// accepted before it in the same batch.
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Stage>,
    mode: RelationMode,
    gatekeeper: Option<Gatekeeper>,
    closure: Option<ClosureRules>,
}

impl Pipeline {
    /// Create a pipeline over the given stages, without validation or closure
    pub fn new(stages: Vec<Stage>, mode: RelationMode) -> Self {
        Self {
            stages,
            mode,
            gatekeeper: None,
            closure: None,
        }
    }

    /// Create a pipeline from ready sieves
    pub fn from_sieves(sieves: Vec<Arc<dyn Sieve>>, mode: RelationMode) -> Self {
        Self::new(sieves.into_iter().map(Stage::Ready).collect(), mode)
    }

    /// Build a pipeline from configuration, resolving sieve names in `registry`
    pub fn from_config(
        config: &PipelineConfig,
        registry: &SieveRegistry,
    ) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;

        let mut pipeline = Self::new(registry.stages(&config.sieves), config.mode);
        if config.validate {
            let gatekeeper = Gatekeeper::try_new(config.validation.clone())
                .map_err(|e| PipelineError::Config(e.to_string()))?;
            pipeline = pipeline.with_gatekeeper(gatekeeper);
        }
        if let Some(rules) = config.load_closure_rules()? {
            pipeline = pipeline.with_closure(rules);
        }

        info!(
            "Pipeline ready: {} stages, mode {}, closure {}",
            pipeline.stages.len(),
            pipeline.mode,
            if pipeline.closure.is_some() { "on" } else { "off" }
        );
        Ok(pipeline)
    }

    /// Screen proposals with a gatekeeper
    pub fn with_gatekeeper(mut self, gatekeeper: Gatekeeper) -> Self {
        self.gatekeeper = Some(gatekeeper);
        self
    }

    /// Expand closure with `rules` after every stage
    pub fn with_closure(mut self, rules: ClosureRules) -> Self {
        self.closure = Some(rules);
        self
    }

    /// Relation mode proposals are reduced into
    pub fn mode(&self) -> RelationMode {
        self.mode
    }

    /// Configured stages in order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Stage names in order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(Stage::name).collect()
    }

    /// Run every stage on one document
    ///
    /// A stage that is unavailable or fails halts the document. Links
    /// accepted before the halt are kept in the report.
    pub fn run_document(&self, document: &Document) -> DocumentReport {
        let mut store = LinkStore::new();
        let mut stages = Vec::with_capacity(self.stages.len());
        let mut conflicts = Vec::new();
        let mut status = DocumentStatus::Completed;

        debug!("Running {} stages on {}", self.stages.len(), document.id);

        for stage in &self.stages {
            let sieve = match stage {
                Stage::Ready(sieve) => sieve,
                Stage::Unavailable { name, reason } => {
                    warn!("Halting {}: sieve '{}' unavailable: {}", document.id, name, reason);
                    status = DocumentStatus::Halted {
                        stage: name.clone(),
                        reason: reason.clone(),
                    };
                    break;
                }
            };

            let proposals = match sieve.annotate(document, store.accepted_links()) {
                Ok(proposals) => proposals,
                Err(e) => {
                    warn!("Halting {}: sieve '{}' failed: {}", document.id, sieve.name(), e);
                    status = DocumentStatus::Halted {
                        stage: sieve.name().to_string(),
                        reason: e.to_string(),
                    };
                    break;
                }
            };

            let mut report = StageReport::new(sieve.name());
            report.proposed = proposals.len();
            for link in proposals {
                self.fold(&mut store, document, sieve.name(), link, &mut report, &mut conflicts);
            }

            if let Some(rules) = self.closure.as_ref().filter(|_| report.accepted > 0) {
                match store.expand_closure(rules, self.mode, sieve.name()) {
                    Ok(closure) => {
                        report.closure_derived = closure.derived.len();
                        report.closure_conflicts = closure.conflicts.len();
                        conflicts.extend(closure.conflicts);
                    }
                    Err(e) => {
                        warn!("Halting {}: closure after '{}' failed: {}", document.id, sieve.name(), e);
                        stages.push(report);
                        status = DocumentStatus::Halted {
                            stage: sieve.name().to_string(),
                            reason: e.to_string(),
                        };
                        break;
                    }
                }
            }

            info!(
                "{} on {}: {} proposed, {} accepted, {} rejected",
                report.sieve, document.id, report.proposed, report.accepted, report.rejected
            );
            stages.push(report);
        }

        DocumentReport {
            document_id: document.id.clone(),
            status,
            stages,
            conflicts,
            links: store.into_links(),
        }
    }

    /// Run the pipeline and attach the accepted links to the document
    pub fn annotate_document(&self, document: &mut Document) -> DocumentReport {
        let report = self.run_document(document);
        document.add_links(report.links.iter().cloned());
        report
    }

    fn fold(
        &self,
        store: &mut LinkStore,
        document: &Document,
        stage: &str,
        mut link: TemporalLink,
        report: &mut StageReport,
        conflicts: &mut Vec<ConflictEvent>,
    ) {
        link.set_origin(stage);

        if let Some(gatekeeper) = &self.gatekeeper {
            let result = gatekeeper.validate(&link, self.mode, Some(document));
            if !result.is_accepted() {
                let reasons: Vec<String> = result.reasons.iter().map(|r| r.to_string()).collect();
                debug!("Invalid proposal {}: {}", link, reasons.join(", "));
                report.invalid += 1;
                return;
            }
        }

        link.canonicalize(self.mode);
        match store.propose(link.clone()) {
            ProposalOutcome::Accepted => report.accepted += 1,
            ProposalOutcome::Duplicate => report.duplicates += 1,
            ProposalOutcome::Rejected { witness } => {
                report.rejected += 1;
                conflicts.push(ConflictEvent {
                    proposed: link,
                    witness,
                });
            }
        }
    }
}

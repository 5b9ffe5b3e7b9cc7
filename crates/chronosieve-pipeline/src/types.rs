//! Report types produced by pipeline runs

use chronosieve_domain::TemporalLink;
use chronosieve_store::ConflictEvent;
use serde::Serialize;

/// Counts for one stage on one document, or summed over a corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageReport {
    /// Sieve name
    pub sieve: String,

    /// Links the sieve returned
    pub proposed: usize,

    /// Proposals accepted into the store
    pub accepted: usize,

    /// Proposals already accepted in equivalent form
    pub duplicates: usize,

    /// Proposals that conflicted with an accepted link
    pub rejected: usize,

    /// Proposals removed by the gatekeeper
    pub invalid: usize,

    /// Links derived by closure after this stage
    pub closure_derived: usize,

    /// Closure links that conflicted with an accepted link
    pub closure_conflicts: usize,
}

impl StageReport {
    /// Empty report for a sieve
    pub fn new(sieve: impl Into<String>) -> Self {
        Self {
            sieve: sieve.into(),
            ..Self::default()
        }
    }

    /// Add another report's counts to this one
    pub fn absorb(&mut self, other: &StageReport) {
        self.proposed += other.proposed;
        self.accepted += other.accepted;
        self.duplicates += other.duplicates;
        self.rejected += other.rejected;
        self.invalid += other.invalid;
        self.closure_derived += other.closure_derived;
        self.closure_conflicts += other.closure_conflicts;
    }
}

/// How a document's run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Every stage ran
    Completed,

    /// A stage could not run; later stages were skipped
    Halted {
        /// Stage that failed
        stage: String,
        /// Failure description
        reason: String,
    },
}

/// Outcome of running the pipeline on one document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentReport {
    /// Document identifier
    pub document_id: String,

    /// Completed or halted
    pub status: DocumentStatus,

    /// Per-stage counts, for the stages that ran
    pub stages: Vec<StageReport>,

    /// Every proposal that lost to an accepted link
    pub conflicts: Vec<ConflictEvent>,

    /// Final accepted links in acceptance order
    pub links: Vec<TemporalLink>,
}

impl DocumentReport {
    /// True if every stage ran
    pub fn is_completed(&self) -> bool {
        self.status == DocumentStatus::Completed
    }
}

/// Reports for a whole corpus, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusReport {
    /// One report per document
    pub documents: Vec<DocumentReport>,
}

impl CorpusReport {
    /// Per-sieve counts summed over every document, in first-run order
    pub fn sieve_totals(&self) -> Vec<StageReport> {
        let mut totals: Vec<StageReport> = Vec::new();
        for stage in self.documents.iter().flat_map(|d| d.stages.iter()) {
            match totals.iter_mut().find(|t| t.sieve == stage.sieve) {
                Some(total) => total.absorb(stage),
                None => totals.push(stage.clone()),
            }
        }
        totals
    }

    /// Documents whose run halted
    pub fn halted(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents.iter().filter(|d| !d.is_completed())
    }

    /// Number of accepted links over all documents
    pub fn total_links(&self) -> usize {
        self.documents.iter().map(|d| d.links.len()).sum()
    }
}

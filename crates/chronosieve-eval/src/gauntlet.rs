//! Precision gauntlet
//!
//! Runs every sieve on its own, with nothing accepted before it, and scores
//! what it proposes against gold. Shows how precise each sieve is before
//! pipeline order decides which of its links survive.

use crate::evaluator::{GoldIndex, Score};
use crate::stats::{ratio, LinkKind, SieveStats};
use chronosieve_domain::{Document, RelationMode};
use chronosieve_pipeline::Stage;
use serde::Serialize;
use tracing::{info, warn};

/// Gauntlet result for one sieve
#[derive(Debug, Clone, Serialize)]
pub struct GauntletEntry {
    /// Scores over every document
    pub stats: SieveStats,

    /// Why the sieve could not run at all
    pub unavailable: Option<String>,

    /// Documents the sieve failed on
    pub failed_documents: Vec<String>,

    /// Gold links in the documents the sieve ran on
    pub gold_total: usize,
}

impl GauntletEntry {
    /// Correct guesses over every gold link
    pub fn recall(&self) -> f64 {
        ratio(self.stats.correct, self.gold_total)
    }
}

/// Gauntlet results, most precise sieve first
#[derive(Debug, Clone, Default, Serialize)]
pub struct GauntletReport {
    /// One entry per configured sieve
    pub entries: Vec<GauntletEntry>,
}

impl GauntletReport {
    /// Entry for a sieve
    pub fn entry(&self, sieve: &str) -> Option<&GauntletEntry> {
        self.entries.iter().find(|e| e.stats.sieve == sieve)
    }

    /// One line per sieve plus each sieve's confusion matrix
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        for entry in &self.entries {
            let stats = &entry.stats;
            match &entry.unavailable {
                Some(reason) => lines.push(format!("{:<24} unavailable: {}", stats.sieve, reason)),
                None => lines.push(format!(
                    "{:<24} p={:.2} {} of {}  Non-VAGUE: p={:.2} {} of {}",
                    stats.sieve,
                    stats.precision(),
                    stats.correct,
                    stats.scored(),
                    stats.precision_non_vague(),
                    stats.correct,
                    stats.correct + stats.incorrect_non_vague
                )),
            }
        }
        for entry in self.entries.iter().filter(|e| !e.stats.confusion.is_empty()) {
            lines.push(String::new());
            lines.push(format!("** {} **", entry.stats.sieve));
            lines.push(entry.stats.confusion.render(6));
        }
        lines.join("\n")
    }
}

/// Run each stage alone over `gold` and score its proposals
///
/// Sieves see each document with its gold links removed and an empty
/// accepted set. Proposals are rewritten into `mode` before scoring.
pub fn run_gauntlet(stages: &[Stage], gold: &[Document], mode: RelationMode) -> GauntletReport {
    let prepared: Vec<(Document, GoldIndex)> = gold
        .iter()
        .map(|document| {
            let mut bare = document.clone();
            bare.clear_links();
            (bare, GoldIndex::new(document, mode))
        })
        .collect();

    let mut entries: Vec<GauntletEntry> = stages
        .iter()
        .map(|stage| run_stage(stage, &prepared, mode))
        .collect();

    entries.sort_by(|a, b| b.stats.precision().total_cmp(&a.stats.precision()));
    info!("Gauntlet complete: {} sieves over {} documents", entries.len(), gold.len());
    GauntletReport { entries }
}

fn run_stage(stage: &Stage, prepared: &[(Document, GoldIndex)], mode: RelationMode) -> GauntletEntry {
    let mut entry = GauntletEntry {
        stats: SieveStats::new(stage.name()),
        unavailable: None,
        failed_documents: Vec::new(),
        gold_total: 0,
    };

    let sieve = match stage {
        Stage::Ready(sieve) => sieve,
        Stage::Unavailable { name, reason } => {
            warn!("Gauntlet skipping '{}': {}", name, reason);
            entry.unavailable = Some(reason.clone());
            return entry;
        }
    };

    for (document, index) in prepared {
        let proposals = match sieve.annotate(document, &[]) {
            Ok(proposals) => proposals,
            Err(e) => {
                warn!("Sieve '{}' failed on {}: {}", sieve.name(), document.id, e);
                entry.failed_documents.push(document.id.clone());
                continue;
            }
        };

        entry.gold_total += index.len();
        entry.stats.proposed += proposals.len();

        for mut guess in proposals {
            guess.canonicalize(mode);
            guess.set_origin(sieve.name());
            let kind = LinkKind::classify(document, &guess);
            match index.score(&guess) {
                Score::Correct => entry.stats.record_correct(&guess, kind),
                Score::Incorrect(gold_link) => entry.stats.record_incorrect(&guess, gold_link, kind),
                Score::NoGold => entry.stats.record_no_gold(),
            }
        }
    }

    entry
}

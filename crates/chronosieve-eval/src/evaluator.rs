//! Corpus evaluation against gold annotations

use crate::confusion::ConfusionMatrix;
use crate::error::EvalError;
use crate::stats::{ratio, LinkKind, SieveStats};
use chronosieve_domain::{Document, PairKey, RelationMode, RelationType, TemporalLink};
use chronosieve_pipeline::StageReport;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

/// Stats key for guesses without an origin
pub const UNKNOWN_ORIGIN: &str = "unknown";

/// True if some gold link states the same fact as `proposed`
///
/// Endpoint order does not matter: a gold `e1 BEFORE e2` matches a
/// proposed `e2 AFTER e1`.
pub fn is_correct<'a>(
    proposed: &TemporalLink,
    gold: impl IntoIterator<Item = &'a TemporalLink>,
) -> bool {
    gold.into_iter().any(|g| g.is_equivalent_to(proposed))
}

/// How one guess scored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score<'a> {
    /// Equivalent to a gold link
    Correct,
    /// Disagrees with the gold link on the same pair
    Incorrect(&'a TemporalLink),
    /// Gold does not label the pair
    NoGold,
}

/// Gold links of one document, looked up by endpoint pair
#[derive(Debug, Clone, Default)]
pub struct GoldIndex {
    by_pair: HashMap<PairKey, Vec<TemporalLink>>,
}

impl GoldIndex {
    /// Index the non-closure links of `document`, rewritten into `mode`
    pub fn new(document: &Document, mode: RelationMode) -> Self {
        let mut by_pair: HashMap<PairKey, Vec<TemporalLink>> = HashMap::new();
        for link in document.links_without_closure() {
            let link = link.canonicalized(mode);
            by_pair.entry(link.ordered_pair_key()).or_default().push(link);
        }
        Self { by_pair }
    }

    /// Gold links on the pair `key`
    pub fn get(&self, key: &PairKey) -> &[TemporalLink] {
        self.by_pair.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of gold links
    pub fn len(&self) -> usize {
        self.by_pair.values().map(Vec::len).sum()
    }

    /// True if the document has no gold links
    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }

    /// Pairs gold labels
    pub fn pairs(&self) -> impl Iterator<Item = &PairKey> {
        self.by_pair.keys()
    }

    /// Score a guess
    pub fn score(&self, guess: &TemporalLink) -> Score<'_> {
        let gold = self.get(&guess.ordered_pair_key());
        if is_correct(guess, gold) {
            Score::Correct
        } else if let Some(first) = gold.first() {
            Score::Incorrect(first)
        } else {
            Score::NoGold
        }
    }
}

/// Scores for a whole corpus
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationReport {
    /// Guesses equivalent to gold
    pub correct: usize,

    /// Guesses that disagree with gold
    pub incorrect: usize,

    /// Incorrect guesses where the gold label is not VAGUE
    pub incorrect_non_vague: usize,

    /// Gold links no guess covered
    pub missed: usize,

    /// Guesses on pairs without a gold link
    pub no_gold: usize,

    /// Guessed documents with no gold counterpart
    pub unmatched_documents: Vec<String>,

    /// Gold labels of the pairs that were guessed
    pub gold_label_counts: BTreeMap<String, usize>,

    /// Gold label against guessed label over all scored guesses
    pub confusion: ConfusionMatrix<String>,

    /// Statistics per sieve, in first-seen order
    pub sieves: Vec<SieveStats>,
}

impl EvaluationReport {
    /// `correct / (correct + incorrect)`
    pub fn precision(&self) -> f64 {
        ratio(self.correct, self.correct + self.incorrect)
    }

    /// `correct / (correct + incorrect + missed)`
    pub fn recall(&self) -> f64 {
        ratio(self.correct, self.correct + self.incorrect + self.missed)
    }

    /// Harmonic mean of precision and recall
    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r > 0.0 {
            2.0 * p * r / (p + r)
        } else {
            0.0
        }
    }

    /// Precision ignoring mistakes against VAGUE gold links
    pub fn precision_non_vague(&self) -> f64 {
        ratio(self.correct, self.correct + self.incorrect_non_vague)
    }

    /// Most frequent gold label and the score of always guessing it
    pub fn majority_baseline(&self) -> Option<(&str, f64)> {
        let total: usize = self.gold_label_counts.values().sum();
        let mut best: Option<(&str, usize)> = None;
        for (label, count) in &self.gold_label_counts {
            if best.map_or(true, |(_, c)| *count > c) {
                best = Some((label.as_str(), *count));
            }
        }
        best.map(|(label, count)| (label, ratio(count, total)))
    }

    /// Statistics for one sieve
    pub fn sieve(&self, name: &str) -> Option<&SieveStats> {
        self.sieves.iter().find(|s| s.sieve == name)
    }

    fn sieve_mut(&mut self, name: &str) -> &mut SieveStats {
        let index = match self.sieves.iter().position(|s| s.sieve == name) {
            Some(index) => index,
            None => {
                self.sieves.push(SieveStats::new(name));
                self.sieves.len() - 1
            }
        };
        &mut self.sieves[index]
    }

    /// Fold pipeline stage totals into the per-sieve statistics
    ///
    /// Sieves appear in stage order, followed by any origin that only the
    /// guessed links mention.
    pub fn absorb_stage_totals(&mut self, totals: &[StageReport]) {
        let mut ordered = Vec::with_capacity(self.sieves.len());
        for stage in totals {
            let mut stats = match self.sieves.iter().position(|s| s.sieve == stage.sieve) {
                Some(index) => self.sieves.remove(index),
                None => SieveStats::new(&stage.sieve),
            };
            stats.record_stage(stage);
            ordered.push(stats);
        }
        ordered.append(&mut self.sieves);
        self.sieves = ordered;
    }

    /// Generate a summary report of the scores
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Brief Sieve Stats".to_string(),
            "=================".to_string(),
        ];
        for stats in &self.sieves {
            lines.push(stats.one_line());
        }

        lines.push(String::new());
        lines.push("Full Results".to_string());
        lines.push("============".to_string());
        lines.push(format!(
            "precision = {:.3} ({} of {})",
            self.precision(),
            self.correct,
            self.correct + self.incorrect
        ));
        lines.push(format!(
            "recall = {:.3} ({} of {})",
            self.recall(),
            self.correct,
            self.correct + self.incorrect + self.missed
        ));
        lines.push(format!("F1 = {:.3}", self.f1()));
        lines.push(format!(
            "precision (non vague) = {:.3} ({} of {})",
            self.precision_non_vague(),
            self.correct,
            self.correct + self.incorrect_non_vague
        ));

        if let Some((label, score)) = self.majority_baseline() {
            lines.push(format!(
                "Local Baseline ({}): precision = recall = F1 = {:.3}",
                label, score
            ));
        }

        if !self.gold_label_counts.is_empty() {
            let total: usize = self.gold_label_counts.values().sum();
            lines.push(String::new());
            lines.push(format!("Gold label counts (out of {}):", total));
            for (label, count) in &self.gold_label_counts {
                lines.push(format!(
                    "  {}: {} ({:.0}%)",
                    label,
                    count,
                    100.0 * ratio(*count, total)
                ));
            }
        }

        if !self.confusion.is_empty() {
            lines.push(String::new());
            lines.push(self.confusion.render(7));
        }

        if !self.unmatched_documents.is_empty() {
            lines.push(String::new());
            lines.push(format!(
                "Documents without gold: {}",
                self.unmatched_documents.join(", ")
            ));
        }

        lines.join("\n")
    }
}

/// Score guessed documents against gold documents in the full vocabulary
pub fn evaluate_corpus(
    gold: &[Document],
    guessed: &[Document],
) -> Result<EvaluationReport, EvalError> {
    evaluate_corpus_in(gold, guessed, RelationMode::Full)
}

/// Score guessed documents against gold documents, rewriting gold links
/// into `mode` first
///
/// Documents are matched by identifier. Every guessed link is scored
/// against the gold link on its pair; gold links whose pair no guess
/// covered count as missed.
pub fn evaluate_corpus_in(
    gold: &[Document],
    guessed: &[Document],
    mode: RelationMode,
) -> Result<EvaluationReport, EvalError> {
    let mut gold_by_id: HashMap<&str, &Document> = HashMap::with_capacity(gold.len());
    for document in gold {
        if gold_by_id.insert(document.id.as_str(), document).is_some() {
            return Err(EvalError::DuplicateDocument(document.id.clone()));
        }
    }

    let mut report = EvaluationReport::default();

    for guessed_doc in guessed {
        let Some(gold_doc) = gold_by_id.get(guessed_doc.id.as_str()) else {
            warn!("No gold document for {}", guessed_doc.id);
            report.unmatched_documents.push(guessed_doc.id.clone());
            continue;
        };

        let index = GoldIndex::new(gold_doc, mode);
        let mut seen: HashSet<PairKey> = HashSet::new();

        for guess in &guessed_doc.links {
            let key = guess.ordered_pair_key();
            let origin = guess.origin().unwrap_or(UNKNOWN_ORIGIN).to_string();
            let kind = LinkKind::classify(gold_doc, guess);

            if let Some(first) = index.get(&key).first() {
                *report
                    .gold_label_counts
                    .entry(first.relation().as_str().to_string())
                    .or_insert(0) += 1;
                report.confusion.record(
                    first.ordered_relation().as_str().to_string(),
                    guess.ordered_relation().as_str().to_string(),
                );
                seen.insert(key);
            }

            match index.score(guess) {
                Score::Correct => {
                    report.correct += 1;
                    report.sieve_mut(&origin).record_correct(guess, kind);
                }
                Score::Incorrect(gold_link) => {
                    report.incorrect += 1;
                    if gold_link.relation() != RelationType::Vague {
                        report.incorrect_non_vague += 1;
                    }
                    debug!("Incorrect in {}: guessed {}, gold {}", guessed_doc.id, guess, gold_link);
                    report.sieve_mut(&origin).record_incorrect(guess, gold_link, kind);
                }
                Score::NoGold => {
                    report.no_gold += 1;
                    report.sieve_mut(&origin).record_no_gold();
                }
            }
        }

        report.missed += index.pairs().filter(|pair| !seen.contains(*pair)).count();
    }

    info!(
        "Evaluation: precision {:.3}, recall {:.3}, F1 {:.3} over {} documents",
        report.precision(),
        report.recall(),
        report.f1(),
        guessed.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(a: &str, b: &str, relation: RelationType) -> TemporalLink {
        TemporalLink::new(a, b, relation).unwrap()
    }

    #[test]
    fn test_inverted_gold_is_correct() {
        let gold = vec![link("e1", "e2", RelationType::Before)];
        assert!(is_correct(&link("e2", "e1", RelationType::After), &gold));
        assert!(!is_correct(&link("e2", "e1", RelationType::Before), &gold));
    }

    #[test]
    fn test_no_gold_is_never_correct() {
        let gold: Vec<TemporalLink> = Vec::new();
        assert!(!is_correct(&link("e1", "e2", RelationType::Before), &gold));
    }

    #[test]
    fn test_gold_index_score() {
        let doc = Document {
            links: vec![link("e1", "e2", RelationType::Before)],
            ..Document::new("d")
        };
        let index = GoldIndex::new(&doc, RelationMode::Full);
        assert_eq!(index.len(), 1);
        assert_eq!(index.score(&link("e2", "e1", RelationType::After)), Score::Correct);
        assert!(matches!(
            index.score(&link("e1", "e2", RelationType::Vague)),
            Score::Incorrect(_)
        ));
        assert_eq!(index.score(&link("e1", "e3", RelationType::Vague)), Score::NoGold);
    }

    #[test]
    fn test_gold_index_reduces_into_mode() {
        let doc = Document {
            links: vec![link("e1", "e2", RelationType::Includes)],
            ..Document::new("d")
        };
        let index = GoldIndex::new(&doc, RelationMode::Tempeval);
        assert_eq!(index.score(&link("e1", "e2", RelationType::Overlap)), Score::Correct);
    }

    #[test]
    fn test_majority_baseline() {
        let mut report = EvaluationReport::default();
        report.gold_label_counts.insert("BEFORE".to_string(), 3);
        report.gold_label_counts.insert("VAGUE".to_string(), 1);
        let (label, score) = report.majority_baseline().unwrap();
        assert_eq!(label, "BEFORE");
        assert_eq!(score, 0.75);
    }

    #[test]
    fn test_empty_report_scores_zero() {
        let report = EvaluationReport::default();
        assert_eq!(report.precision(), 0.0);
        assert_eq!(report.recall(), 0.0);
        assert_eq!(report.f1(), 0.0);
        assert!(report.majority_baseline().is_none());
    }

    #[test]
    fn test_summary_sections() {
        let mut report = EvaluationReport::default();
        report.sieves.push(SieveStats::new("AllVague"));
        let summary = report.summary();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(&lines[..2], &["Brief Sieve Stats", "================="]);
        assert!(lines.contains(&"Full Results"));
        assert!(lines.contains(&"precision = 0.000 (0 of 0)"));
    }

    #[test]
    fn test_absorb_stage_totals_orders_by_stage() {
        let mut report = EvaluationReport::default();
        report.sieve_mut("B").record_no_gold();
        report.sieve_mut("unknown").record_no_gold();
        let mut a = StageReport::new("A");
        a.proposed = 2;
        let b = StageReport::new("B");
        report.absorb_stage_totals(&[a, b]);
        let names: Vec<&str> = report.sieves.iter().map(|s| s.sieve.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "unknown"]);
        assert_eq!(report.sieve("A").unwrap().proposed, 2);
        assert_eq!(report.sieve("B").unwrap().no_gold, 1);
    }
}

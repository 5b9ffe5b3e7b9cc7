//! Per-sieve scoring statistics

use crate::confusion::ConfusionMatrix;
use chronosieve_domain::{Document, EntityKind, TemporalLink};
use chronosieve_pipeline::StageReport;
use serde::Serialize;
use std::collections::BTreeMap;

/// What kind of entities a link joins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Two events
    EventEvent,
    /// An event and the document creation time
    EventDct,
    /// An event and a time expression in the text
    EventTime,
    /// Two time expressions
    TimeTime,
    /// Endpoints not found in the document
    Other,
}

impl LinkKind {
    /// Classify `link` using the entities of `document`
    pub fn classify(document: &Document, link: &TemporalLink) -> Self {
        let dct = document.creation_time.as_deref();
        let kind_of = |id: &str| {
            if Some(id) == dct {
                Some(EntityKind::Time)
            } else {
                document.entity(id).map(|e| e.kind)
            }
        };
        let touches_dct =
            Some(link.endpoint1()) == dct || Some(link.endpoint2()) == dct;

        match (kind_of(link.endpoint1()), kind_of(link.endpoint2())) {
            (Some(EntityKind::Event), Some(EntityKind::Event)) => LinkKind::EventEvent,
            (Some(EntityKind::Time), Some(EntityKind::Time)) => LinkKind::TimeTime,
            (Some(_), Some(_)) if touches_dct => LinkKind::EventDct,
            (Some(_), Some(_)) => LinkKind::EventTime,
            _ => LinkKind::Other,
        }
    }

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::EventEvent => "EventEvent",
            LinkKind::EventDct => "EventDCT",
            LinkKind::EventTime => "EventTime",
            LinkKind::TimeTime => "TimeTime",
            LinkKind::Other => "Other",
        }
    }
}

/// Correct and total counts for one slice of a sieve's guesses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Guesses that matched gold
    pub correct: usize,
    /// Guesses scored against a gold link
    pub total: usize,
}

impl Tally {
    /// `correct / total`, or 0.0 when nothing was scored
    pub fn precision(&self) -> f64 {
        ratio(self.correct, self.total)
    }
}

pub(crate) fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Statistics for the links one sieve contributed
///
/// Only guesses with a gold link on the same pair are scored. Guesses on
/// pairs the gold annotation never labels are counted as `no_gold` and do
/// not affect precision.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SieveStats {
    /// Sieve name
    pub sieve: String,

    /// Links the sieve proposed
    pub proposed: usize,

    /// Proposals that were not kept (rejected, invalid or duplicate)
    pub removed: usize,

    /// Links closure derived after this sieve
    pub closure: usize,

    /// Guesses equivalent to gold
    pub correct: usize,

    /// Guesses that disagree with gold
    pub incorrect: usize,

    /// Incorrect guesses where the gold label is not VAGUE
    pub incorrect_non_vague: usize,

    /// Guesses on pairs without a gold link
    pub no_gold: usize,

    /// Closure-derived guesses scored against gold
    pub closure_scored: usize,

    /// Closure-derived guesses that were correct
    pub closure_correct: usize,

    /// Scored guesses by link kind
    pub by_kind: BTreeMap<LinkKind, Tally>,

    /// Gold label against guessed label, both relative to endpoint order
    pub confusion: ConfusionMatrix<String>,
}

impl SieveStats {
    /// Empty statistics for a sieve
    pub fn new(sieve: impl Into<String>) -> Self {
        Self {
            sieve: sieve.into(),
            ..Self::default()
        }
    }

    /// Take proposal counts from a pipeline stage report
    pub fn record_stage(&mut self, stage: &StageReport) {
        self.proposed += stage.proposed;
        self.removed += stage.proposed.saturating_sub(stage.accepted);
        self.closure += stage.closure_derived;
    }

    /// Record a guess equivalent to gold
    pub fn record_correct(&mut self, guess: &TemporalLink, kind: LinkKind) {
        self.correct += 1;
        self.score(guess, kind, true);
        let label = guess.ordered_relation().as_str().to_string();
        self.confusion.record(label.clone(), label);
    }

    /// Record a guess that disagrees with `gold`
    pub fn record_incorrect(&mut self, guess: &TemporalLink, gold: &TemporalLink, kind: LinkKind) {
        self.incorrect += 1;
        if gold.relation() != chronosieve_domain::RelationType::Vague {
            self.incorrect_non_vague += 1;
        }
        self.score(guess, kind, false);
        self.confusion.record(
            gold.ordered_relation().as_str().to_string(),
            guess.ordered_relation().as_str().to_string(),
        );
    }

    /// Record a guess on a pair gold does not label
    pub fn record_no_gold(&mut self) {
        self.no_gold += 1;
    }

    fn score(&mut self, guess: &TemporalLink, kind: LinkKind, correct: bool) {
        let tally = self.by_kind.entry(kind).or_default();
        tally.total += 1;
        if guess.is_closure() {
            self.closure_scored += 1;
        }
        if correct {
            tally.correct += 1;
            if guess.is_closure() {
                self.closure_correct += 1;
            }
        }
    }

    /// Guesses scored against gold
    pub fn scored(&self) -> usize {
        self.correct + self.incorrect
    }

    /// `correct / (correct + incorrect)`, 0.0 when nothing was scored
    pub fn precision(&self) -> f64 {
        ratio(self.correct, self.scored())
    }

    /// Precision ignoring mistakes against VAGUE gold links
    pub fn precision_non_vague(&self) -> f64 {
        ratio(self.correct, self.correct + self.incorrect_non_vague)
    }

    /// Precision of closure-derived guesses
    pub fn closure_precision(&self) -> f64 {
        ratio(self.closure_correct, self.closure_scored)
    }

    /// Precision of guesses the sieve proposed itself
    pub fn direct_precision(&self) -> f64 {
        ratio(
            self.correct - self.closure_correct,
            self.scored() - self.closure_scored,
        )
    }

    /// Add another sieve's counts to this one
    pub fn merge(&mut self, other: &SieveStats) {
        self.proposed += other.proposed;
        self.removed += other.removed;
        self.closure += other.closure;
        self.correct += other.correct;
        self.incorrect += other.incorrect;
        self.incorrect_non_vague += other.incorrect_non_vague;
        self.no_gold += other.no_gold;
        self.closure_scored += other.closure_scored;
        self.closure_correct += other.closure_correct;
        for (kind, tally) in &other.by_kind {
            let mine = self.by_kind.entry(*kind).or_default();
            mine.correct += tally.correct;
            mine.total += tally.total;
        }
        self.confusion.merge(&other.confusion);
    }

    /// One line: name, precision and counts
    pub fn one_line(&self) -> String {
        format!(
            "{:<24} p = {:.2} ({} of {})",
            self.sieve,
            self.precision(),
            self.correct,
            self.scored()
        )
    }

    /// Generate a summary report of the statistics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("-------- {} --------", self.sieve),
            format!("Links proposed: {}", self.proposed),
            format!("Links removed: {}", self.removed),
            format!("Links from closure: {}", self.closure),
            format!("Links not in gold: {}", self.no_gold),
            format!(
                "Precision (overall): {:.2} ({} of {})",
                self.precision(),
                self.correct,
                self.scored()
            ),
            format!(
                "  non-closed: {:.2} ({} of {})",
                self.direct_precision(),
                self.correct - self.closure_correct,
                self.scored() - self.closure_scored
            ),
            format!(
                "  closed: {:.2} ({} of {})",
                self.closure_precision(),
                self.closure_correct,
                self.closure_scored
            ),
        ];

        for (kind, tally) in &self.by_kind {
            lines.push(format!(
                "Precision {}: {:.2} ({} of {})",
                kind.as_str(),
                tally.precision(),
                tally.correct,
                tally.total
            ));
        }

        if !self.confusion.is_empty() {
            lines.push(String::new());
            lines.push(self.confusion.render(7));
        }

        lines.join("\n")
    }
}

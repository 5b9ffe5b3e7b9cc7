//! Chronosieve Eval
//!
//! Scores pipeline output against gold annotations.
//!
//! # Overview
//!
//! - **Correctness**: a guess is correct when some gold link states the same
//!   fact, in either endpoint order ([`is_correct`])
//! - **Per-sieve statistics**: precision, non-VAGUE precision, closure split
//!   and confusion matrix for the links each sieve contributed
//!   ([`SieveStats`])
//! - **Corpus scores**: precision, recall, F1 and the majority-label
//!   baseline ([`evaluate_corpus`])
//! - **Precision gauntlet**: every sieve scored on its own ([`run_gauntlet`])
//!
//! Guesses on pairs that gold never labels are not counted against
//! precision; gold links nobody guessed count against recall.
//!
//! # Usage
//!
//! ```
//! use chronosieve_domain::{Document, RelationType, TemporalLink};
//! use chronosieve_eval::evaluate_corpus;
//!
//! let mut gold = Document::new("doc1");
//! gold.add_links([TemporalLink::new("e1", "e2", RelationType::Before).unwrap()]);
//!
//! let mut guessed = Document::new("doc1");
//! guessed.add_links([TemporalLink::new("e2", "e1", RelationType::After)
//!     .unwrap()
//!     .with_origin("TextOrderBefore")]);
//!
//! let report = evaluate_corpus(&[gold], &[guessed]).unwrap();
//! assert_eq!(report.precision(), 1.0);
//! assert_eq!(report.recall(), 1.0);
//! ```

#![warn(missing_docs)]

mod confusion;
mod error;
mod evaluator;
mod gauntlet;
mod stats;

pub use confusion::ConfusionMatrix;
pub use error::EvalError;
pub use evaluator::{
    evaluate_corpus, evaluate_corpus_in, is_correct, EvaluationReport, GoldIndex, Score,
    UNKNOWN_ORIGIN,
};
pub use gauntlet::{run_gauntlet, GauntletEntry, GauntletReport};
pub use stats::{LinkKind, SieveStats, Tally};

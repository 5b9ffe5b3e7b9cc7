//! Chronosieve Pipeline
//!
//! Runs an ordered list of sieves over documents and folds their proposals
//! into a per-document link store.
//!
//! # Architecture
//!
//! ```text
//! Document → Sieve₁ → Gatekeeper → canonicalize → LinkStore → (closure) → Sieve₂ → …
//! ```
//!
//! # Key Features
//!
//! - **First-accepted-wins**: earlier stages take precedence, later
//!   disagreement is reported as a conflict and never replaces a link
//! - **Document-scoped failure**: an unavailable or failing sieve halts only
//!   the document it happened on
//! - **Static registry**: sieve names resolve through [`SieveRegistry`]
//! - **Concurrent corpus runs**: documents run in parallel on the blocking
//!   pool, reports come back in input order
//!
//! # Example Usage
//!
//! ```
//! use chronosieve_domain::{Document, Entity, Sentence};
//! use chronosieve_pipeline::{run_corpus, Pipeline, PipelineConfig, SieveRegistry};
//!
//! let registry = SieveRegistry::with_builtins();
//! let pipeline = Pipeline::from_config(&PipelineConfig::default(), &registry).unwrap();
//!
//! let doc = Document::new("doc1").with_sentence(Sentence::new(vec![
//!     Entity::event("e1", 0),
//!     Entity::event("e2", 4),
//! ]));
//! let report = run_corpus(&pipeline, &[doc]);
//! assert_eq!(report.total_links(), 1);
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod registry;
mod runner;
mod sieves;
mod types;


pub use config::{parse_sieve_list, PipelineConfig, DEFAULT_SIEVES};
pub use engine::Pipeline;
pub use error::PipelineError;
pub use registry::{SieveFactory, SieveRegistry, Stage};
pub use runner::{run_corpus, run_corpus_concurrent, PANIC_STAGE};
pub use sieves::{AllVague, CreationTimeVague, TextOrderBefore};
pub use types::{CorpusReport, DocumentReport, DocumentStatus, StageReport};

//! Integration tests for corpus runs

use chronosieve_domain::{Document, Entity, RelationMode, Sentence, Sieve, SieveError, TemporalLink};
use chronosieve_pipeline::{
    run_corpus, run_corpus_concurrent, DocumentStatus, Pipeline, PipelineConfig, SieveRegistry,
    TextOrderBefore, PANIC_STAGE,
};
use std::sync::Arc;

fn corpus(n: usize) -> Vec<Document> {
    (0..n)
        .map(|i| {
            let mut sentence = Vec::new();
            for j in 0..(i % 4 + 2) {
                sentence.push(Entity::event(format!("e{}", j), j));
            }
            Document::new(format!("doc{}", i))
                .with_creation_time("t0")
                .with_sentence(Sentence::new(sentence))
        })
        .collect()
}

fn pipeline(config: &PipelineConfig) -> Pipeline {
    Pipeline::from_config(config, &SieveRegistry::with_builtins()).unwrap()
}

#[test]
fn test_sequential_corpus_run() {
    let docs = corpus(3);
    let report = run_corpus(&pipeline(&PipelineConfig::default()), &docs);

    assert_eq!(report.documents.len(), 3);
    assert!(report.halted().next().is_none());

    let totals = report.sieve_totals();
    let names: Vec<&str> = totals.iter().map(|t| t.sieve.as_str()).collect();
    assert_eq!(names, vec!["TextOrderBefore", "CreationTimeVague", "AllVague"]);
    // 2, 3 and 4 events: 1 + 3 + 6 ordered pairs
    assert_eq!(totals[0].accepted, 10);
    assert_eq!(totals[1].accepted, 9);
    assert_eq!(totals[2].rejected, 10);
}

#[tokio::test]
async fn test_concurrent_run_matches_sequential() {
    let docs = corpus(12);
    let config = PipelineConfig::with_closure();
    let sequential = run_corpus(&pipeline(&config), &docs);
    let concurrent = run_corpus_concurrent(Arc::new(pipeline(&config)), docs, 3)
        .await
        .unwrap();

    assert_eq!(concurrent, sequential);
    let ids: Vec<&str> = concurrent
        .documents
        .iter()
        .map(|d| d.document_id.as_str())
        .collect();
    assert_eq!(ids[0], "doc0");
    assert_eq!(ids[11], "doc11");
}

#[tokio::test]
async fn test_halted_document_does_not_stop_corpus() {
    let config = PipelineConfig {
        sieves: vec!["CreationTimeVague".to_string(), "Nope".to_string()],
        ..PipelineConfig::default()
    };
    let report = run_corpus_concurrent(Arc::new(pipeline(&config)), corpus(4), 2)
        .await
        .unwrap();

    assert_eq!(report.documents.len(), 4);
    for doc in &report.documents {
        assert!(matches!(doc.status, DocumentStatus::Halted { ref stage, .. } if stage == "Nope"));
        assert!(!doc.links.is_empty());
    }
}

/// Panics on the document named "bad"
struct Brittle;

impl Sieve for Brittle {
    fn name(&self) -> &str {
        "Brittle"
    }

    fn annotate(
        &self,
        document: &Document,
        _accepted: &[TemporalLink],
    ) -> Result<Vec<TemporalLink>, SieveError> {
        if document.id == "bad" {
            panic!("model blew up");
        }
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_panicking_document_does_not_stop_corpus() {
    let mut docs = corpus(3);
    docs[1].id = "bad".to_string();
    let sieves: Vec<Arc<dyn Sieve>> = vec![Arc::new(TextOrderBefore), Arc::new(Brittle)];
    let pipeline = Pipeline::from_sieves(sieves, RelationMode::Full);

    let report = run_corpus_concurrent(Arc::new(pipeline), docs, 2)
        .await
        .unwrap();

    assert_eq!(report.documents.len(), 3);
    assert!(report.documents[0].is_completed());
    assert!(report.documents[2].is_completed());
    assert!(!report.documents[2].links.is_empty());

    let bad = &report.documents[1];
    assert_eq!(bad.document_id, "bad");
    assert!(matches!(bad.status, DocumentStatus::Halted { ref stage, .. } if stage == PANIC_STAGE));
    assert!(bad.links.is_empty());
}

#[test]
fn test_before_only_mode() {
    let config = PipelineConfig {
        mode: RelationMode::BeforeOnly,
        sieves: vec!["AllVague".to_string()],
        ..PipelineConfig::default()
    };
    let report = run_corpus(&pipeline(&config), &corpus(1));
    assert!(report.documents[0]
        .links
        .iter()
        .all(|l| l.relation() == chronosieve_domain::RelationType::None));
}

//! Corpus runners
//!
//! Documents are independent, so a corpus can be processed one document at
//! a time or many at once. Either way the reports come back in input order.

use crate::engine::Pipeline;
use crate::error::PipelineError;
use crate::types::{CorpusReport, DocumentReport, DocumentStatus};
use chronosieve_domain::Document;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Stage name reported for a document whose run panicked
pub const PANIC_STAGE: &str = "<panic>";

/// Run the pipeline over every document, one after another
pub fn run_corpus(pipeline: &Pipeline, documents: &[Document]) -> CorpusReport {
    let documents: Vec<_> = documents
        .iter()
        .map(|document| pipeline.run_document(document))
        .collect();
    let report = CorpusReport { documents };
    info!(
        "Corpus run complete: {} documents, {} halted, {} links",
        report.documents.len(),
        report.halted().count(),
        report.total_links()
    );
    report
}

/// Run the pipeline over every document with at most `concurrency`
/// documents in flight
///
/// Sieves are synchronous, so each document runs on the blocking pool. A
/// document whose run panics is reported as halted at [`PANIC_STAGE`] with
/// no links; the other documents are unaffected.
pub async fn run_corpus_concurrent(
    pipeline: Arc<Pipeline>,
    documents: Vec<Document>,
    concurrency: usize,
) -> Result<CorpusReport, PipelineError> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut handles: Vec<tokio::task::JoinHandle<Result<DocumentReport, PipelineError>>> =
        Vec::with_capacity(documents.len());

    for document in documents {
        let pipeline = Arc::clone(&pipeline);
        let semaphore = Arc::clone(&semaphore);
        handles.push(tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| PipelineError::Join(e.to_string()))?;
            let document_id = document.id.clone();
            match tokio::task::spawn_blocking(move || pipeline.run_document(&document)).await {
                Ok(report) => Ok(report),
                Err(e) => {
                    warn!("Halting {}: run panicked: {}", document_id, e);
                    Ok(DocumentReport {
                        document_id,
                        status: DocumentStatus::Halted {
                            stage: PANIC_STAGE.to_string(),
                            reason: e.to_string(),
                        },
                        stages: Vec::new(),
                        conflicts: Vec::new(),
                        links: Vec::new(),
                    })
                }
            }
        }));
    }

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        let report = handle
            .await
            .map_err(|e| PipelineError::Join(e.to_string()))??;
        reports.push(report);
    }

    let report = CorpusReport { documents: reports };
    info!(
        "Concurrent corpus run complete: {} documents, {} halted, {} links",
        report.documents.len(),
        report.halted().count(),
        report.total_links()
    );
    Ok(report)
}

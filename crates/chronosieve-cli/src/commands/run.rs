//! Run command implementation.

use crate::cli::RunArgs;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::output::Formatter;
use chronosieve_eval::{evaluate_corpus_in, EvaluationReport};
use chronosieve_pipeline::{run_corpus_concurrent, CorpusReport, Pipeline, PipelineConfig, SieveRegistry};
use std::sync::Arc;
use tracing::info;

/// What a run produced.
#[derive(Debug)]
pub struct RunOutcome {
    /// Annotated documents
    pub corpus: Corpus,
    /// Pipeline report
    pub report: CorpusReport,
    /// Scores, when the input carried gold links and evaluation was not skipped
    pub evaluation: Option<EvaluationReport>,
}

/// Execute the run command.
///
/// The input links are set aside as gold, the pipeline annotates the bare
/// documents, and the result is written to `--output` when given.
pub async fn execute_run(
    args: RunArgs,
    config: &PipelineConfig,
    registry: &SieveRegistry,
    formatter: &Formatter,
) -> Result<RunOutcome> {
    let gold = Corpus::load(&args.input)?;
    let pipeline = Arc::new(Pipeline::from_config(config, registry)?);
    info!(
        "Running {} sieve(s) over {} document(s)",
        pipeline.stages().len(),
        gold.documents.len()
    );

    let report = run_corpus_concurrent(Arc::clone(&pipeline), gold.stripped(), config.concurrency).await?;

    let mut annotated = Corpus {
        documents: gold.stripped(),
    };
    for (document, result) in annotated.documents.iter_mut().zip(&report.documents) {
        document.add_links(result.links.iter().cloned());
    }

    if let Some(output) = &args.output {
        annotated.save(output)?;
        info!("Wrote annotated corpus to {}", output.display());
    }
    println!("{}", formatter.format_corpus_report(&report)?);

    let evaluation = if !args.no_eval && gold.has_links() {
        let mut evaluation = evaluate_corpus_in(&gold.documents, &annotated.documents, config.mode)?;
        evaluation.absorb_stage_totals(&report.sieve_totals());
        println!("{}", formatter.format_evaluation(&evaluation)?);
        Some(evaluation)
    } else {
        None
    };

    Ok(RunOutcome {
        corpus: annotated,
        report,
        evaluation,
    })
}

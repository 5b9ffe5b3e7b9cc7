//! Gauntlet command implementation.

use crate::cli::GauntletArgs;
use crate::corpus::Corpus;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chronosieve_eval::{run_gauntlet, GauntletReport};
use chronosieve_pipeline::{PipelineConfig, SieveRegistry};

/// Execute the gauntlet command.
pub fn execute_gauntlet(
    args: GauntletArgs,
    config: &PipelineConfig,
    registry: &SieveRegistry,
    formatter: &Formatter,
) -> Result<GauntletReport> {
    let corpus = Corpus::load(&args.input)?;
    if !corpus.has_links() {
        return Err(CliError::InvalidInput(format!(
            "{} has no gold links to score against",
            args.input.display()
        )));
    }

    let stages = registry.stages(&config.sieves);
    let report = run_gauntlet(&stages, &corpus.documents, config.mode);
    println!("{}", formatter.format_gauntlet(&report)?);
    Ok(report)
}

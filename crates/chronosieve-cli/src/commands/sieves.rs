//! Sieves command implementation.

use crate::error::Result;
use crate::output::Formatter;
use chronosieve_pipeline::{PipelineConfig, SieveRegistry};

/// Execute the sieves command.
pub fn execute_sieves(
    config: &PipelineConfig,
    registry: &SieveRegistry,
    formatter: &Formatter,
) -> Result<()> {
    println!("{}", formatter.format_sieves(&registry.names(), &config.sieves)?);
    Ok(())
}

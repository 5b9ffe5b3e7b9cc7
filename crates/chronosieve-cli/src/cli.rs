//! CLI command definitions and argument parsing.

use crate::error::{CliError, Result};
use chronosieve_domain::RelationMode;
use chronosieve_pipeline::{parse_sieve_list, PipelineConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chronosieve - Order events and times with a sieve pipeline.
#[derive(Debug, Parser)]
#[command(name = "chronosieve")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CHRONOSIEVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Sieve list file, one name per line
    #[arg(short, long, global = true)]
    pub sieves: Option<PathBuf>,

    /// Relation mode (full, reduced, basic, symmetry, full_symmetry, before_only, tempeval)
    #[arg(short, long, global = true)]
    pub mode: Option<RelationMode>,

    /// Expand transitive closure
    #[arg(long, global = true)]
    pub closure: bool,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Annotate a corpus and score it against its existing links
    Run(RunArgs),

    /// Score every sieve on its own
    Gauntlet(GauntletArgs),

    /// Report contradicting links in a corpus
    Check(CheckArgs),

    /// List available sieves
    Sieves,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Input corpus (JSON); its links are used as gold
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where to write the annotated corpus
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip evaluation against the input links
    #[arg(long)]
    pub no_eval: bool,
}

/// Arguments for the gauntlet command.
#[derive(Debug, Parser)]
pub struct GauntletArgs {
    /// Gold corpus (JSON)
    #[arg(short, long)]
    pub input: PathBuf,
}

/// Arguments for the check command.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Corpus to check (JSON)
    #[arg(short, long)]
    pub input: PathBuf,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl Cli {
    /// Apply command-line overrides to a pipeline configuration.
    pub fn apply_overrides(&self, config: &mut PipelineConfig) -> Result<()> {
        if let Some(path) = &self.sieves {
            let text = std::fs::read_to_string(path)?;
            let sieves = parse_sieve_list(&text);
            if sieves.is_empty() {
                return Err(CliError::InvalidInput(format!(
                    "Sieve list {} names no sieves",
                    path.display()
                )));
            }
            config.sieves = sieves;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if self.closure {
            config.closure = true;
        }
        config.validate().map_err(CliError::Config)
    }
}

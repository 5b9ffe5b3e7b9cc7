//! Chronosieve CLI - Command-line driver for the sieve pipeline.

use chronosieve_cli::commands;
use chronosieve_cli::{Cli, Command, Config, Formatter};
use chronosieve_pipeline::SieveRegistry;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        let formatter = Formatter::new(chronosieve_cli::config::OutputFormat::Table, true);
        eprintln!("{}", formatter.error(&format!("Error: {}", e)));
        std::process::exit(e.exit_code());
    }
}

/// Log to stderr; `RUST_LOG` wins over the default level.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> chronosieve_cli::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let mut pipeline_config = config.pipeline.clone();
    cli.apply_overrides(&mut pipeline_config)?;

    // Determine output format
    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);
    let registry = SieveRegistry::with_builtins();

    match cli.command {
        Command::Run(args) => {
            commands::execute_run(args, &pipeline_config, &registry, &formatter).await?;
        }
        Command::Gauntlet(args) => {
            commands::execute_gauntlet(args, &pipeline_config, &registry, &formatter)?;
        }
        Command::Check(args) => {
            commands::execute_check(args, &pipeline_config, &formatter)?;
        }
        Command::Sieves => {
            commands::execute_sieves(&pipeline_config, &registry, &formatter)?;
        }
    }

    Ok(())
}

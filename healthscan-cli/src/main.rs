//! healthscan CLI
//!
//! Barcode lookup, ingredient analysis and frame scanning from the command line.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod report;

use clap::Parser;
use colored::Colorize;
use tracing::debug;

use healthscan_core::config::GeneralConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config_path();
    let explicit = cli.config_is_explicit();
    let writer = OutputWriter::new(cli.output);

    // `config validate` must still run (and report) when the file is broken.
    let loaded = commands::load_config(&config_path, explicit).await;

    let mut general = match &loaded {
        Ok(config) => config.general.clone(),
        Err(_) => GeneralConfig::default(),
    };
    if let Some(level) = cli.log_level {
        general.log_level = level;
    }
    logging::init_tracing(&general).map_err(|e| CliError::Config(e.to_string()))?;

    debug!(path = %config_path.display(), explicit, "configuration resolved");

    match cli.command {
        Commands::Config(args) => {
            commands::config::execute(args, &config_path, explicit, &writer).await
        }
        Commands::Lookup(args) => commands::lookup::execute(args, &loaded?, &writer).await,
        Commands::Analyze(args) => commands::analyze::execute(args, &loaded?, &writer).await,
        Commands::Scan(args) => commands::scan::execute(args, &loaded?, &writer).await,
        Commands::Catalog(args) => commands::catalog::execute(args, &loaded?, &writer).await,
    }
}

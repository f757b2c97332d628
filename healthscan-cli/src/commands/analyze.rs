//! `healthscan analyze` command handler

use std::path::Path;

use tokio::io::AsyncReadExt;
use tracing::info;

use healthscan_core::config::HealthscanConfig;

use crate::cli::AnalyzeArgs;
use crate::commands::build_analyzer;
use crate::error::CliError;
use crate::output::OutputWriter;
use crate::report::ResultsReport;

/// Execute the `analyze` command (manual ingredient path).
pub async fn execute(
    args: AnalyzeArgs,
    config: &HealthscanConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let text = read_ingredients(args.text, args.file.as_deref()).await?;

    let analyzer = build_analyzer(config).await?;
    let mut session = analyzer.session(args.conditions.merge_into(config.conditions));

    info!(session = %session.id(), len = text.len(), "analyzing ingredient list");

    session.set_manual_ingredients(text);
    session.analyze_manual();

    let view = session
        .results()
        .ok_or_else(|| CliError::Command("ingredient analysis produced no result".to_owned()))?;
    writer.render(&ResultsReport::new(view))
}

/// Ingredient text from the argument, a file, or stdin (`-` or nothing given).
async fn read_ingredients(text: Option<String>, file: Option<&Path>) -> Result<String, CliError> {
    if let Some(path) = file {
        return Ok(tokio::fs::read_to_string(path).await?);
    }

    match text {
        Some(text) if text != "-" => Ok(text),
        _ => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            Ok(buf)
        }
    }
}

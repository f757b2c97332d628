//! `healthscan lookup` command handler

use tracing::info;

use healthscan_core::config::HealthscanConfig;

use crate::cli::LookupArgs;
use crate::commands::build_analyzer;
use crate::error::CliError;
use crate::output::OutputWriter;
use crate::report::ResultsReport;

/// Execute the `lookup` command (barcode path).
pub async fn execute(
    args: LookupArgs,
    config: &HealthscanConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let analyzer = build_analyzer(config).await?;
    let mut session = analyzer.session(args.conditions.merge_into(config.conditions));

    info!(code = %args.code, session = %session.id(), "looking up barcode");

    session.set_barcode_input(args.code);
    session.submit_barcode();

    let view = session
        .results()
        .ok_or_else(|| CliError::Command("barcode lookup produced no result".to_owned()))?;
    writer.render(&ResultsReport::new(view))
}

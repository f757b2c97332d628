//! `healthscan scan` command handler
//!
//! Reads frames from a file or stdin until one decodes to a barcode,
//! then follows the barcode path. Ctrl-C cancels the scan.

use std::io::Write;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use healthscan_analyzer::{BarcodeScanner, DigitFrameDecoder, FrameInput, LineFrameSource, Tab};
use healthscan_core::config::HealthscanConfig;

use crate::cli::ScanArgs;
use crate::commands::build_analyzer;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};
use crate::report::ResultsReport;

/// Execute the `scan` command.
pub async fn execute(
    args: ScanArgs,
    config: &HealthscanConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let analyzer = build_analyzer(config).await?;
    let mut session = analyzer.session(args.conditions.merge_into(config.conditions));
    session.select_tab(Tab::Scan);

    let max_frames = args.max_frames.unwrap_or(config.scanner.max_frames);
    let mut scanner = BarcodeScanner::new(
        LineFrameSource::new(FrameInput::parse(&args.frames)),
        DigitFrameDecoder::from_config(&config.scanner),
    )
    .with_max_frames(max_frames);

    info!(frames = %args.frames, max_frames, session = %session.id(), "starting scan");

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };
    let result = scanner.run(&cancel).await;
    ctrl_c.abort();

    match result {
        Ok(outcome) => {
            session.accept_scan(outcome.code.clone());
            let view = session
                .results()
                .ok_or_else(|| CliError::Command("scan produced no result".to_owned()))?;
            writer.render(&ScanReport {
                code: outcome.code,
                frames_read: outcome.frames_read,
                results: ResultsReport::new(view),
            })
        }
        Err(err) => {
            session.report_scan_failure(&err);
            writer.render(&ScanFailureReport {
                notice: session.notice().unwrap_or_default().to_owned(),
                error: err.to_string(),
                tab: session.tab(),
            })?;
            Err(err.into())
        }
    }
}

/// Successful scan: the decoded barcode followed by its results.
#[derive(Serialize)]
pub struct ScanReport {
    pub code: String,
    pub frames_read: usize,
    pub results: ResultsReport,
}

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Scanned: {} ({} frames)",
            self.code.bold(),
            self.frames_read
        )?;
        writeln!(w)?;
        self.results.render_text(w)
    }
}

/// Failed scan: the single user-facing notice; the session stays on the scan tab.
#[derive(Serialize)]
pub struct ScanFailureReport {
    pub notice: String,
    pub error: String,
    pub tab: Tab,
}

impl Render for ScanFailureReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "{}", self.notice.yellow().bold())
    }
}

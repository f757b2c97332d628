//! Results tab rendering shared by `lookup`, `analyze` and `scan`

use std::io::Write;

use colored::{ColoredString, Colorize};
use serde::Serialize;

use healthscan_analyzer::ResultsView;
use healthscan_core::types::{Warning, WarningKind, WarningTier};

use crate::output::Render;

/// Results view as printed by the CLI.
#[derive(Serialize)]
#[serde(transparent)]
pub struct ResultsReport {
    pub view: ResultsView,
}

impl ResultsReport {
    pub fn new(view: ResultsView) -> Self {
        Self { view }
    }
}

impl Render for ResultsReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let product = &self.view.product;

        writeln!(w, "{}", product.name.bold())?;
        writeln!(w, "Ingredients: {}", product.ingredients)?;

        if !self.view.store_comparison.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "Store Price Comparison".bold())?;
            for entry in &self.view.store_comparison {
                writeln!(w, "  {:<10} {}", entry.store, entry.price.green())?;
            }
        }

        if !product.warnings.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "Health Warnings".bold())?;
            for warning in &product.warnings {
                writeln!(w, "  {}", colored_warning(warning))?;
            }
        }

        if !product.alternatives.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "Healthier Alternatives".bold())?;
            for alternative in &product.alternatives {
                writeln!(w, "  * {}", alternative)?;
            }
        }

        if !self.view.condition_alerts.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "Condition Alerts".bold())?;
            for condition in &self.view.condition_alerts {
                let line = format!("! Not recommended with {}", condition.label());
                writeln!(w, "  {}", line.red())?;
            }
        }

        Ok(())
    }
}

/// Alert-tier warnings get a `!` marker, info-tier warnings an `i`.
fn colored_warning(warning: &Warning) -> ColoredString {
    let marker = match warning.kind.tier() {
        WarningTier::Alert => "!",
        WarningTier::Info => "i",
    };
    let line = format!("{} {}", marker, warning.message);
    match warning.kind {
        WarningKind::HighSugar => line.red(),
        WarningKind::Caffeine => line.yellow(),
        WarningKind::Gluten => line.truecolor(255, 165, 0),
        WarningKind::Unknown => line.blue(),
    }
}

//! `healthscan catalog` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use healthscan_analyzer::CatalogEntry;
use healthscan_core::config::HealthscanConfig;

use crate::cli::{CatalogAction, CatalogArgs};
use crate::commands::build_analyzer;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `catalog` command.
pub async fn execute(
    args: CatalogArgs,
    config: &HealthscanConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        CatalogAction::List => {
            let analyzer = build_analyzer(config).await?;
            let entries = analyzer.catalog().entries();
            info!(count = entries.len(), "listing catalog");

            let source = if config.catalog.path.is_empty() {
                "built-in".to_owned()
            } else {
                config.catalog.path.clone()
            };
            writer.render(&CatalogListReport { source, entries })
        }
    }
}

/// Every product in the effective catalog, sorted by barcode.
#[derive(Serialize)]
pub struct CatalogListReport {
    pub source: String,
    pub entries: Vec<CatalogEntry>,
}

impl Render for CatalogListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Catalog: {} ({} products)",
            self.source.bold(),
            self.entries.len()
        )?;

        if self.entries.is_empty() {
            writeln!(w, "{}", "No products.".dimmed())?;
            return Ok(());
        }

        writeln!(w, "{:<16} {:<30} {:<9} Alternatives", "Barcode", "Name", "Warnings")?;
        writeln!(w, "{}", "-".repeat(72))?;
        for entry in &self.entries {
            let product = &entry.product;
            let warnings = product.warnings.len().to_string();
            let warnings = if product.warnings.is_empty() {
                warnings.green()
            } else {
                warnings.red()
            };
            writeln!(
                w,
                "{:<16} {:<30} {:<9} {}",
                entry.code,
                product.name,
                warnings,
                product.alternatives.len()
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthscan_analyzer::ProductCatalog;

    fn report() -> CatalogListReport {
        CatalogListReport {
            source: "built-in".to_owned(),
            entries: ProductCatalog::builtin().entries(),
        }
    }

    #[test]
    fn test_catalog_list_render_text() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        report()
            .render_text(&mut buffer)
            .expect("text rendering should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");

        assert!(output.contains("Catalog: built-in (2 products)"));
        let coke = output.find("123456789").expect("coca-cola row");
        let bread = output.find("987654321").expect("bread row");
        assert!(coke < bread, "rows are sorted by barcode");
        assert!(output.contains("Whole Wheat Bread"));
    }

    #[test]
    fn test_catalog_list_empty() {
        colored::control::set_override(false);
        let empty = CatalogListReport {
            source: "products.json".to_owned(),
            entries: Vec::new(),
        };
        let mut buffer = Vec::new();
        empty.render_text(&mut buffer).expect("render");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("No products."));
    }

    #[test]
    fn test_catalog_list_json_uses_catalog_file_shape() {
        let json = serde_json::to_value(report()).expect("serialize");
        let entries = json["entries"].as_array().expect("entries array");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["code"], "123456789");
        assert_eq!(entries[0]["name"], "Coca-Cola");
        assert_eq!(entries[1]["conditions"][0], "gluten-intolerance");
    }
}

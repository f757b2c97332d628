//! Command handlers -- one module per subcommand

pub mod analyze;
pub mod catalog;
pub mod config;
pub mod lookup;
pub mod scan;

use std::path::Path;

use tracing::debug;

use healthscan_analyzer::{Analyzer, ProductCatalog};
use healthscan_core::config::HealthscanConfig;

use crate::error::CliError;

/// Load the effective configuration.
///
/// An explicit `--config` path must exist; the default path may be missing.
pub async fn load_config(path: &Path, explicit: bool) -> Result<HealthscanConfig, CliError> {
    let config = if explicit {
        HealthscanConfig::load(path).await?
    } else {
        HealthscanConfig::load_or_default(path).await?
    };
    Ok(config)
}

/// Build the analyzer (catalog, vocabulary, price table) from configuration.
///
/// The catalog file is read on the blocking pool.
pub async fn build_analyzer(config: &HealthscanConfig) -> Result<Analyzer, CliError> {
    let catalog_config = config.catalog.clone();
    let catalog = tokio::task::spawn_blocking(move || ProductCatalog::from_config(&catalog_config))
        .await
        .map_err(|e| CliError::Command(format!("catalog loading task failed: {e}")))??;
    debug!(products = catalog.len(), "catalog ready");
    Ok(Analyzer::from_config(config, catalog))
}

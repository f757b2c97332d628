//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand, ValueEnum};

use healthscan_core::config::LOG_LEVELS;
use healthscan_core::types::{HealthCondition, HealthConditions};

/// healthscan -- scan or enter a product barcode or ingredient list
/// and see health warnings, healthier alternatives and store prices.
///
/// Use `healthscan <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "healthscan", version, about, long_about = None)]
pub struct Cli {
    /// Path to the healthscan.toml configuration file.
    ///
    /// Defaults to `healthscan.toml`; a missing file at the default path
    /// falls back to built-in defaults, an explicit path must exist.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true, value_parser = PossibleValuesParser::new(LOG_LEVELS))]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "healthscan.toml";

impl Cli {
    /// Effective configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Whether `--config` was given on the command line.
    pub fn config_is_explicit(&self) -> bool {
        self.config.is_some()
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up a product by barcode.
    Lookup(LookupArgs),

    /// Analyze a free-text ingredient list.
    Analyze(AnalyzeArgs),

    /// Decode a barcode from a frame stream and look it up.
    Scan(ScanArgs),

    /// Inspect the product catalog.
    Catalog(CatalogArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

/// Health conditions selected for this run (merged with `[conditions]` from config).
#[derive(Args, Debug, Default)]
pub struct ConditionArgs {
    /// Health condition to check against (diabetes, hypertension, gluten-intolerance).
    /// May be repeated.
    #[arg(long = "condition", value_parser = parse_condition)]
    pub conditions: Vec<HealthCondition>,
}

impl ConditionArgs {
    /// Add the CLI selections on top of the configured ones.
    pub fn merge_into(&self, mut base: HealthConditions) -> HealthConditions {
        for condition in &self.conditions {
            base.set(*condition, true);
        }
        base
    }
}

fn parse_condition(value: &str) -> Result<HealthCondition, String> {
    HealthCondition::from_str_loose(value).ok_or_else(|| {
        format!("unknown health condition '{value}' (expected: diabetes, hypertension, gluten-intolerance)")
    })
}

// ---- lookup ----

/// Look up a product by barcode.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Barcode number.
    pub code: String,

    #[command(flatten)]
    pub conditions: ConditionArgs,
}

// ---- analyze ----

/// Analyze an ingredient list.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Ingredient text. Use `-` (or omit with --file) to read from stdin.
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the ingredient list from a file.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub conditions: ConditionArgs,
}

// ---- scan ----

/// Decode a barcode from a frame stream.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Frame source: a file with one frame payload per line, or `-` for stdin.
    #[arg(long, default_value = "-")]
    pub frames: String,

    /// Stop after this many frames (0 = until the stream ends). Overrides config.
    #[arg(long)]
    pub max_frames: Option<usize>,

    #[command(flatten)]
    pub conditions: ConditionArgs,
}

// ---- catalog ----

/// Inspect the product catalog.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub action: CatalogAction,
}

#[derive(Subcommand, Debug)]
pub enum CatalogAction {
    /// List every product in the effective catalog.
    List,
}

// ---- config ----

/// Manage healthscan configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, catalog, scanner, pricing, conditions).
        #[arg(long)]
        section: Option<String>,
    },
}

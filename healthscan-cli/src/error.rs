//! CLI-specific error types and exit code mapping

use healthscan_analyzer::AnalyzerError;
use healthscan_core::error::{HealthscanError, ScanError};

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The frame source could not be acquired or the scan produced no barcode.
    #[error("{0}")]
    ScanUnavailable(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from healthscan-core.
    #[error("{0}")]
    Core(#[from] HealthscanError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                  |
    /// |------|------------------------------------------|
    /// | 0    | Success                                  |
    /// | 1    | General / command error                  |
    /// | 2    | Configuration error                      |
    /// | 3    | Camera unavailable or no barcode scanned |
    /// | 10   | IO error                                 |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(HealthscanError::Config(_)) => 2,
            Self::ScanUnavailable(_) | Self::Core(HealthscanError::Scan(_)) => 3,
            Self::Io(_) | Self::Core(HealthscanError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<AnalyzerError> for CliError {
    fn from(e: AnalyzerError) -> Self {
        Self::Core(e.into())
    }
}

impl From<ScanError> for CliError {
    fn from(e: ScanError) -> Self {
        Self::ScanUnavailable(e.to_string())
    }
}

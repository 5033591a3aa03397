//! Error types for the cloudhop CLI
//!
//! Messages are user-facing and end with a hint on how to fix the problem.

use cloudhop_common::MigrateError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Migration pipeline failed
    #[error(transparent)]
    Migrate(#[from] MigrateError),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your CLOUDHOP_* environment variables or .env file.")]
    Config(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// JSON output could not be produced
    #[error("Failed to serialize JSON output: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Process exit code: 2 for configuration problems, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Migrate(e) if e.is_configuration() => 2,
            _ => 1,
        }
    }
}

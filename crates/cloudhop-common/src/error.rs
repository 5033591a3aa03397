//! Error types for cloudhop

use crate::types::ContainerRole;
use thiserror::Error;

/// Result type alias for migration operations
pub type Result<T> = std::result::Result<T, MigrateError>;

/// Main error type for migration operations
#[derive(Error, Debug)]
pub enum MigrateError {
    /// A destination container was required but never resolved
    #[error("No {role} container resolved. {hint}")]
    ContainerUnresolved { role: ContainerRole, hint: String },

    /// The transfer tool is missing and could not be installed
    #[error("Transfer tool '{program}' is unavailable: {reason}")]
    ToolUnavailable { program: String, reason: String },

    /// The transfer tool ran but exited unsuccessfully
    #[error("'{program}' exited with {status} while fetching {source_uri}")]
    ToolFailed {
        program: String,
        source_uri: String,
        status: String,
    },

    /// A single object upload failed
    #[error("Upload of '{key}' to bucket '{container}' failed: {source}")]
    Upload {
        container: String,
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Listing containers or objects failed
    #[error("Listing failed: {0}")]
    Listing(#[source] anyhow::Error),

    #[error("IO error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Staging walk failed: {0}")]
    Walk(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MigrateError {
    /// Unresolved-container error with the manual configuration hint
    pub fn unresolved(role: ContainerRole) -> Self {
        Self::ContainerUnresolved {
            role,
            hint: format!(
                "Please specify it manually, e.g. `--{}-bucket your-bucket-name` or {}=your-bucket-name",
                role,
                role.env_var()
            ),
        }
    }

    /// Wrap an IO error together with the path it happened on
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// True for errors caused by missing configuration rather than a failed call
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ContainerUnresolved { .. } | Self::Config(_))
    }
}

//! Source-side transfer through an external command-line tool
//!
//! The tool owns its own parallelism and retry behavior. This crate only
//! checks that the tool is present, builds the invocation, and inspects the
//! exit status.

use async_trait::async_trait;
use cloudhop_common::Result;
use std::path::Path;

pub mod gsutil;

/// Outcome of the one-shot tool bootstrap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    /// The version check passed on the first try
    AlreadyInstalled { version: String },
    /// The tool was missing, got installed, and the second check passed
    Installed { version: String },
}

impl ToolStatus {
    pub fn version(&self) -> &str {
        match self {
            ToolStatus::AlreadyInstalled { version } | ToolStatus::Installed { version } => version,
        }
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Program name, used in messages
    fn program(&self) -> &str;

    /// Check for the tool, install it once if missing, and confirm
    async fn ensure_installed(&self) -> Result<ToolStatus>;

    /// Recursively copy `source_uri` into the existing directory `dest`
    async fn fetch(&self, source_uri: &str, dest: &Path) -> Result<()>;
}

//! Configuration management for the cloudhop CLI
//!
//! Values come from constants, overridden by `CLOUDHOP_*` environment
//! variables (a `.env` file is loaded first), overridden by command-line
//! flags.

use crate::error::{CliError, Result};
use cloudhop_core::{StorageConfig, DEFAULT_PREFIX, DEFAULT_STAGING_DIR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// Migration Configuration Constants
// ============================================================================

/// Default transfer tool program.
pub const DEFAULT_TOOL_PROGRAM: &str = "gsutil";

/// Default pip package installed when the tool is missing.
pub const DEFAULT_TOOL_PACKAGE: &str = "gsutil";

/// Default Python interpreter used to install the transfer tool.
pub const DEFAULT_PYTHON_PROGRAM: &str = "python3";

/// Staging directory is removed after each migration unless disabled.
pub const DEFAULT_CLEANUP: bool = true;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    pub dataset_bucket: Option<String>,
    pub model_bucket: Option<String>,
    pub staging_dir: PathBuf,
    pub prefix: String,
    pub cleanup: bool,
    pub tool_program: String,
    pub tool_package: String,
    pub python_program: String,
    pub storage: StorageConfig,
}

impl MigrationConfig {
    /// Load `.env` and read the environment.
    ///
    /// Not validated: call [`validate`](Self::validate) once command-line
    /// overrides are applied.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Read `CLOUDHOP_*` and `S3_*` variables over the defaults
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            dataset_bucket: var("CLOUDHOP_DATASET_BUCKET"),
            model_bucket: var("CLOUDHOP_MODEL_BUCKET"),
            staging_dir: var("CLOUDHOP_STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STAGING_DIR)),
            prefix: std::env::var("CLOUDHOP_PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string()),
            cleanup: var("CLOUDHOP_CLEANUP")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CLEANUP),
            tool_program: var("CLOUDHOP_TOOL").unwrap_or_else(|| DEFAULT_TOOL_PROGRAM.to_string()),
            tool_package: var("CLOUDHOP_TOOL_PACKAGE")
                .unwrap_or_else(|| DEFAULT_TOOL_PACKAGE.to_string()),
            python_program: var("CLOUDHOP_PYTHON")
                .unwrap_or_else(|| DEFAULT_PYTHON_PROGRAM.to_string()),
            storage: StorageConfig::from_env(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.staging_dir.as_os_str().is_empty() {
            return Err(CliError::config("Staging directory cannot be empty"));
        }

        // Cleanup removes the whole tree, so refuse filesystem roots
        if self.cleanup && self.staging_dir.parent().is_none() {
            return Err(CliError::config(format!(
                "Refusing to use {} as a staging directory with cleanup enabled",
                self.staging_dir.display()
            )));
        }

        if self.tool_program.trim().is_empty() {
            return Err(CliError::config("Transfer tool program cannot be empty"));
        }

        if self.tool_package.trim().is_empty() {
            return Err(CliError::config("Transfer tool package cannot be empty"));
        }

        if self.python_program.trim().is_empty() {
            return Err(CliError::config("Python program cannot be empty"));
        }

        if self.prefix.starts_with('/') {
            tracing::warn!(prefix = %self.prefix, "Key prefix starts with '/'; keys will too");
        }

        Ok(())
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Set the dataset bucket. `None` keeps the current value.
    pub fn set_dataset_bucket(&mut self, bucket: Option<String>) {
        if let Some(bucket) = bucket {
            self.dataset_bucket = Some(bucket);
        }
    }

    /// Set the model bucket. `None` keeps the current value.
    pub fn set_model_bucket(&mut self, bucket: Option<String>) {
        if let Some(bucket) = bucket {
            self.model_bucket = Some(bucket);
        }
    }

    pub fn set_prefix(&mut self, prefix: String) {
        self.prefix = prefix;
    }

    pub fn set_staging_dir(&mut self, dir: PathBuf) {
        self.staging_dir = dir;
    }

    pub fn set_cleanup(&mut self, cleanup: bool) {
        self.cleanup = cleanup;
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            dataset_bucket: None,
            model_bucket: None,
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            prefix: DEFAULT_PREFIX.to_string(),
            cleanup: DEFAULT_CLEANUP,
            tool_program: DEFAULT_TOOL_PROGRAM.to_string(),
            tool_package: DEFAULT_TOOL_PACKAGE.to_string(),
            python_program: DEFAULT_PYTHON_PROGRAM.to_string(),
            storage: StorageConfig::default(),
        }
    }
}

use super::{Fetcher, ToolStatus};
use async_trait::async_trait;
use cloudhop_common::{MigrateError, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_PROGRAM: &str = "gsutil";
pub const DEFAULT_PYTHON: &str = "python3";
pub const DEFAULT_PACKAGE: &str = "gsutil";

/// Fetches from Google Cloud Storage with `gsutil -m cp -r`
#[derive(Debug, Clone)]
pub struct GsutilFetcher {
    program: String,
    python: String,
    package: String,
}

impl Default for GsutilFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl GsutilFetcher {
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            python: DEFAULT_PYTHON.to_string(),
            package: DEFAULT_PACKAGE.to_string(),
        }
    }

    /// Use a different executable for the transfer tool
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Interpreter used for `-m pip install gsutil`
    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    /// pip package that provides the program
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Arguments passed to the interpreter to install the tool
    pub fn install_args(&self) -> Vec<String> {
        vec![
            "-m".to_string(),
            "pip".to_string(),
            "install".to_string(),
            self.package.clone(),
            "--quiet".to_string(),
        ]
    }

    /// Arguments passed to the tool for a recursive, parallel copy
    pub fn copy_args(source_uri: &str, dest: &Path) -> Vec<String> {
        vec![
            "-m".to_string(),
            "cp".to_string(),
            "-r".to_string(),
            source_uri.to_string(),
            dest.display().to_string(),
        ]
    }

    /// `Some(version text)` when `<program> version` runs and exits zero
    async fn version(&self) -> Option<String> {
        match Command::new(&self.program).arg("version").output().await {
            Ok(output) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            }
            Ok(output) => {
                debug!(status = %output.status, "Version check exited unsuccessfully");
                None
            }
            Err(e) => {
                debug!(error = %e, "Version check could not start");
                None
            }
        }
    }

    async fn install(&self) -> Result<()> {
        info!(python = %self.python, package = %self.package, "Installing {} via pip", self.program);

        let status = Command::new(&self.python)
            .args(self.install_args())
            .status()
            .await
            .map_err(|e| MigrateError::ToolUnavailable {
                program: self.program.clone(),
                reason: format!("could not run '{}': {}", self.python, e),
            })?;

        if !status.success() {
            return Err(MigrateError::ToolUnavailable {
                program: self.program.clone(),
                reason: format!("pip install exited with {}", status),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Fetcher for GsutilFetcher {
    fn program(&self) -> &str {
        &self.program
    }

    #[instrument(skip(self), fields(program = %self.program))]
    async fn ensure_installed(&self) -> Result<ToolStatus> {
        if let Some(version) = self.version().await {
            info!(%version, "✅ {} is already installed", self.program);
            return Ok(ToolStatus::AlreadyInstalled { version });
        }

        warn!("{} not found, attempting install", self.program);
        self.install().await?;

        match self.version().await {
            Some(version) => {
                info!(%version, "✅ {} installed successfully", self.program);
                Ok(ToolStatus::Installed { version })
            }
            None => Err(MigrateError::ToolUnavailable {
                program: self.program.clone(),
                reason: "install finished but the version check still fails".to_string(),
            }),
        }
    }

    /// Tool output is inherited so its diagnostics reach the operator as-is.
    #[instrument(skip(self, dest), fields(program = %self.program, dest = %dest.display()))]
    async fn fetch(&self, source_uri: &str, dest: &Path) -> Result<()> {
        let status = Command::new(&self.program)
            .args(Self::copy_args(source_uri, dest))
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| MigrateError::ToolUnavailable {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(MigrateError::ToolFailed {
                program: self.program.clone(),
                source_uri: source_uri.to_string(),
                status: status.to_string(),
            });
        }

        Ok(())
    }
}

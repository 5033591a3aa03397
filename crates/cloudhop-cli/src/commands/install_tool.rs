//! `cloudhop install-tool` command implementation

use crate::config::MigrationConfig;
use crate::error::Result;
use cloudhop_core::{Fetcher, GsutilFetcher, ToolStatus};
use colored::Colorize;

/// Check for the transfer tool, installing it once if missing
pub async fn run(config: &MigrationConfig) -> Result<()> {
    let fetcher = GsutilFetcher::new()
        .with_program(&config.tool_program)
        .with_python(&config.python_program)
        .with_package(&config.tool_package);

    let status = fetcher.ensure_installed().await?;
    print_status(fetcher.program(), &status);

    Ok(())
}

pub(crate) fn print_status(program: &str, status: &ToolStatus) {
    let verb = match status {
        ToolStatus::AlreadyInstalled { .. } => "already installed",
        ToolStatus::Installed { .. } => "installed",
    };
    println!("{} {} {}", "✓".green(), program, verb);
    for line in status.version().lines() {
        println!("  {}", line);
    }
}

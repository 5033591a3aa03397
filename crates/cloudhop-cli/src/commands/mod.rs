//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod discover;
pub mod install_tool;
pub mod migrate;
pub mod verify;

use crate::config::MigrationConfig;
use crate::error::Result;
use cloudhop_common::ContainerRole;
use cloudhop_core::{GsutilFetcher, Migrator, S3Store};
use colored::Colorize;

/// Migrator wired to the real S3 destination and gsutil
pub type CliMigrator = Migrator<S3Store, GsutilFetcher>;

/// Build the production migrator from `config`, with explicit buckets applied
pub async fn build_migrator(config: &MigrationConfig) -> Result<CliMigrator> {
    let store = S3Store::new(config.storage.clone()).await?;
    let fetcher = GsutilFetcher::new()
        .with_program(&config.tool_program)
        .with_python(&config.python_program)
        .with_package(&config.tool_package);

    let mut migrator = Migrator::new(store, fetcher);
    if let Some(bucket) = &config.dataset_bucket {
        migrator = migrator.with_dataset_container(bucket);
    }
    if let Some(bucket) = &config.model_bucket {
        migrator = migrator.with_model_container(bucket);
    }
    Ok(migrator)
}

/// Explain how to set a bucket that discovery could not find
pub fn print_usage_hint(role: ContainerRole) {
    eprintln!();
    eprintln!("{}", "Usage:".yellow().bold());
    eprintln!("  Set the {} bucket manually if it was not found automatically:", role);
    eprintln!("    cloudhop --{}-bucket <BUCKET> migrate gs://your-bucket/path", role);
    eprintln!("  or export {}=<BUCKET>", role.env_var());
}

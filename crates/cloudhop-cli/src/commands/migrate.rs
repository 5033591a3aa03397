//! `cloudhop migrate` command implementation
//!
//! Runs the full pipeline: tool bootstrap, discovery of unset buckets,
//! fetch into staging, upload, verify, and cleanup.

use super::{build_migrator, install_tool::print_status, print_usage_hint};
use crate::config::MigrationConfig;
use crate::error::Result;
use cloudhop_common::{ContainerRole, MigrateError};
use colored::Colorize;
use serde::Serialize;

/// JSON output of a finished migration
#[derive(Debug, Serialize)]
struct MigrateSummary<'a> {
    source: &'a str,
    container: &'a str,
    prefix: &'a str,
    uploaded: &'a [String],
}

pub async fn run(
    config: &MigrationConfig,
    source: &str,
    target: ContainerRole,
    json: bool,
) -> Result<()> {
    let mut migrator = build_migrator(config).await?;

    let status = migrator.install_tool().await?;
    if !json {
        print_status(&config.tool_program, &status);
    }

    migrator.discover_missing().await?;
    let Some(container) = migrator.container_for(target).map(str::to_string) else {
        print_usage_hint(target);
        return Err(MigrateError::unresolved(target).into());
    };

    let uploaded = migrator
        .migrate_to(
            target,
            source,
            &config.prefix,
            &config.staging_dir,
            config.cleanup,
        )
        .await?;

    if json {
        let summary = MigrateSummary {
            source,
            container: &container,
            prefix: &config.prefix,
            uploaded: &uploaded,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!(
        "{} Migrated {} to s3://{}/{}",
        "✓".green(),
        source,
        container,
        config.prefix
    );
    for key in &uploaded {
        println!("  {}", key);
    }
    println!("  {} object(s) uploaded", uploaded.len());
    if !config.cleanup {
        println!(
            "  Staging directory kept at {}",
            config.staging_dir.display()
        );
    }

    Ok(())
}

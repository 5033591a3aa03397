//! `cloudhop verify` command implementation

use super::{build_migrator, print_usage_hint};
use crate::config::MigrationConfig;
use crate::error::Result;
use cloudhop_common::format::{format_bytes, format_megabytes};
use cloudhop_common::{ContainerRole, MigrateError};
use colored::Colorize;

/// List objects under the configured prefix and print count and size
pub async fn run(config: &MigrationConfig, target: ContainerRole, json: bool) -> Result<()> {
    let mut migrator = build_migrator(config).await?;

    migrator.discover_missing().await?;
    let Some(container) = migrator.container_for(target).map(str::to_string) else {
        print_usage_hint(target);
        return Err(MigrateError::unresolved(target).into());
    };

    let report = migrator.verify(&container, &config.prefix).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("s3://{}/{}", report.container, report.prefix).cyan().bold()
    );
    if report.objects.is_empty() {
        println!("  No objects found under this prefix.");
        return Ok(());
    }

    for object in &report.objects {
        println!("  {} ({})", object.key, format_bytes(object.size));
    }
    println!();
    println!("{}", "Summary:".cyan().bold());
    println!("  Objects: {}", report.object_count());
    println!(
        "  Size:    {} ({})",
        format_megabytes(report.total_bytes),
        format_bytes(report.total_bytes)
    );

    Ok(())
}

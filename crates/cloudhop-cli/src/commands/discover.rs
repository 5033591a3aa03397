//! `cloudhop discover` command implementation
//!
//! Lists destination buckets and shows which ones were bound to each role.

use super::build_migrator;
use crate::config::MigrationConfig;
use crate::error::Result;
use cloudhop_common::ContainerRole;
use cloudhop_core::ObjectStore;
use colored::Colorize;

pub async fn run(config: &MigrationConfig) -> Result<()> {
    let mut migrator = build_migrator(config).await?;

    let buckets = migrator.store().list_containers().await?;
    println!("{}", "Buckets:".cyan().bold());
    if buckets.is_empty() {
        println!("  (none visible to these credentials)");
    }
    for bucket in &buckets {
        println!("  {}", bucket);
    }
    println!();

    migrator.discover().await?;

    println!("{}", "Roles:".cyan().bold());
    for role in ContainerRole::ALL {
        match migrator.container_for(role) {
            Some(bucket) => println!("  {} {:<8} {}", "✓".green(), role, bucket.green()),
            None => println!("  {} {:<8} {}", "⚠".yellow(), role, "not found".yellow()),
        }
    }

    if migrator.dataset_container().is_none() {
        super::print_usage_hint(ContainerRole::Dataset);
    }

    Ok(())
}

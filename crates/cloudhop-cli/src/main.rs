//! cloudhop CLI - Main entry point

use clap::Parser;
use cloudhop_cli::{Cli, Commands, MigrationConfig};
use cloudhop_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Load .env before parsing so `env = ...` flags see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    if cli.command.is_none() {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    }

    // Verbose: debug to console. Otherwise pipeline progress at info.
    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Info })
        .output(LogOutput::Console)
        .log_file_prefix("cloudhop")
        .build();

    // Environment variables take precedence
    let log_config = match log_config.clone().merge_env() {
        Ok(merged) => merged,
        Err(e) => {
            eprintln!("Warning: ignoring invalid logging environment: {}", e);
            log_config
        },
    };

    // Keep the guard alive so file logs are flushed on exit
    let _log_guard = init_logging(&log_config).ok().flatten();

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> cloudhop_cli::Result<()> {
    let Some(ref command) = cli.command else {
        return Ok(());
    };

    let mut config = MigrationConfig::load();
    config.set_dataset_bucket(cli.dataset_bucket.clone());
    config.set_model_bucket(cli.model_bucket.clone());

    match command {
        Commands::Migrate {
            prefix,
            staging_dir,
            no_cleanup,
            ..
        } => {
            if let Some(prefix) = prefix {
                config.set_prefix(prefix.clone());
            }
            if let Some(dir) = staging_dir {
                config.set_staging_dir(dir.clone());
            }
            if *no_cleanup {
                config.set_cleanup(false);
            }
        },
        Commands::Verify {
            prefix: Some(prefix),
            ..
        } => config.set_prefix(prefix.clone()),
        _ => {},
    }

    config.validate()?;

    match command {
        Commands::Discover => cloudhop_cli::commands::discover::run(&config).await,

        Commands::InstallTool => cloudhop_cli::commands::install_tool::run(&config).await,

        Commands::Migrate {
            source,
            target,
            json,
            ..
        } => cloudhop_cli::commands::migrate::run(&config, source, *target, *json).await,

        Commands::Verify { target, json, .. } => {
            cloudhop_cli::commands::verify::run(&config, *target, *json).await
        },
    }
}

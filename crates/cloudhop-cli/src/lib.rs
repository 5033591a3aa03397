//! cloudhop CLI Library
//!
//! Command-line interface for migrating objects from Google Cloud Storage to
//! S3 through a local staging directory.
//!
//! # Overview
//!
//! - **Discovery**: find the dataset and model buckets (`cloudhop discover`)
//! - **Tool bootstrap**: check for and install gsutil (`cloudhop install-tool`)
//! - **Migration**: fetch, upload, verify, clean up (`cloudhop migrate`)
//! - **Verification**: list what landed under a prefix (`cloudhop verify`)

pub mod commands;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::MigrationConfig;
pub use error::{CliError, Result};

use clap::{Parser, Subcommand};
use cloudhop_common::ContainerRole;
use std::path::PathBuf;

/// cloudhop - GCS to S3 migration tool
#[derive(Parser, Debug)]
#[command(name = "cloudhop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Destination bucket for datasets (skips discovery for this role)
    #[arg(long, env = "CLOUDHOP_DATASET_BUCKET", global = true)]
    pub dataset_bucket: Option<String>,

    /// Destination bucket for models (skips discovery for this role)
    #[arg(long, env = "CLOUDHOP_MODEL_BUCKET", global = true)]
    pub model_bucket: Option<String>,

    /// Print the full CLI reference as markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List destination buckets and show which ones were bound
    Discover,

    /// Make sure the transfer tool (gsutil) is installed
    InstallTool,

    /// Copy a source path into the destination bucket
    Migrate {
        /// Source URI, e.g. gs://my-bucket/path/to/data
        source: String,

        /// Key prefix for uploaded objects
        #[arg(short, long)]
        prefix: Option<String>,

        /// Local staging directory
        #[arg(short, long)]
        staging_dir: Option<PathBuf>,

        /// Keep the staging directory afterwards
        #[arg(long)]
        no_cleanup: bool,

        /// Which bucket to upload into (dataset or model)
        #[arg(short, long, default_value = "dataset")]
        target: ContainerRole,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List objects under a prefix and report count and total size
    Verify {
        /// Key prefix to list
        #[arg(short, long)]
        prefix: Option<String>,

        /// Which bucket to list (dataset or model)
        #[arg(short, long, default_value = "dataset")]
        target: ContainerRole,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

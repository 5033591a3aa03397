//! Build automation tasks for cloudhop
//!
//! - Generating the CLI reference from the clap definitions

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for cloudhop", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<cloudhop_cli::Cli>();

    let content = format!(
        r#"# cloudhop CLI Reference

This documentation is generated from the CLI source code. Last updated: {}.

## Overview

cloudhop copies objects from Google Cloud Storage into an S3 bucket. It
downloads the source with `gsutil` into a local staging directory, uploads
every staged file under a key prefix, lists the prefix to confirm the copy,
and removes the staging directory unless told to keep it.

## Quick Start

```bash
# Make sure gsutil is available (installs it with pip if missing)
cloudhop install-tool

# See which buckets are picked for datasets and models
cloudhop discover

# Copy a file or directory into the dataset bucket under raw/
cloudhop migrate gs://my-source-bucket/data.csv

# Copy into the model bucket, keep the staging directory
cloudhop --model-bucket acme-models migrate gs://my-source-bucket/weights \
  --target model --prefix checkpoints/ --no-cleanup

# Check what landed
cloudhop verify --prefix raw/ --json
```

## Commands

{}

## Environment Variables

| Variable | Default | Description |
|----------|---------|-------------|
| `CLOUDHOP_DATASET_BUCKET` | discovered | Dataset bucket, skips discovery for this role |
| `CLOUDHOP_MODEL_BUCKET` | discovered | Model bucket, skips discovery for this role |
| `CLOUDHOP_STAGING_DIR` | `/tmp/gcs_migration` | Local staging directory |
| `CLOUDHOP_PREFIX` | `raw/` | Key prefix for uploads |
| `CLOUDHOP_CLEANUP` | `true` | Remove the staging directory afterwards |
| `CLOUDHOP_TOOL` | `gsutil` | Transfer tool executable |
| `CLOUDHOP_TOOL_PACKAGE` | `gsutil` | pip package installed when the tool is missing |
| `CLOUDHOP_PYTHON` | `python3` | Interpreter used to pip-install the tool |
| `S3_ENDPOINT` | AWS | Custom S3 endpoint (MinIO etc.) |
| `S3_REGION` / `AWS_REGION` | `us-east-1` | Destination region |
| `S3_ACCESS_KEY` / `S3_SECRET_KEY` | credential chain | Static destination keys |
| `S3_PATH_STYLE` | `false` | Path-style addressing |
| `CLOUDHOP_LOG_LEVEL` | `info` | `trace`, `debug`, `info`, `warn`, `error` |
| `CLOUDHOP_LOG_OUTPUT` | `console` | `console`, `file`, `both` |
| `CLOUDHOP_LOG_FORMAT` | `text` | `text` or `json` |
| `CLOUDHOP_LOG_DIR` | `logs` | Directory for rolling log files |

A `.env` file in the working directory is loaded first.

---

*Generated from the CLI source code. To update, run `cargo xtask generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("✅ Generated CLI documentation at: {}", file_path.display());

    Ok(())
}

//! cloudhop core
//!
//! Copies objects from a source object store to an S3 destination through a
//! local staging directory, then lists the destination to confirm the copy.
//!
//! The pipeline is strictly sequential:
//!
//! 1. **Discovery** binds the "dataset" and "model" buckets by name
//! 2. **Fetch** runs the external transfer tool into the staging directory
//! 3. **Publish** uploads every staged file under a key prefix
//! 4. **Verify** lists the prefix and reports count and total size
//! 5. **Cleanup** removes the staging directory when requested
//!
//! # Example
//!
//! ```no_run
//! use cloudhop_core::{GsutilFetcher, Migrator, S3Store, StorageConfig};
//!
//! # async fn run() -> cloudhop_common::Result<()> {
//! let store = S3Store::new(StorageConfig::from_env()).await?;
//! let mut migrator = Migrator::new(store, GsutilFetcher::new());
//! migrator.discover().await?;
//!
//! let keys = migrator
//!     .migrate("gs://my-bucket/data.csv", "raw/", "/tmp/gcs_migration", true)
//!     .await?;
//! println!("uploaded {} object(s)", keys.len());
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod fetch;
pub mod migrator;
pub mod staging;
pub mod store;

pub use fetch::{gsutil::GsutilFetcher, Fetcher, ToolStatus};
pub use migrator::{Migrator, VerifyReport, DEFAULT_PREFIX, DEFAULT_STAGING_DIR};
pub use store::{config::StorageConfig, s3::S3Store, ObjectStore};

//! Destination object store abstraction
//!
//! The migrator only needs three calls from the destination: list buckets,
//! list objects under a prefix, and upload a local file. [`S3Store`] is the
//! production implementation; tests substitute an in-memory store.
//!
//! [`S3Store`]: s3::S3Store

use async_trait::async_trait;
use cloudhop_common::{ObjectSummary, Result};
use std::path::Path;

pub mod config;
pub mod multipart;
pub mod s3;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Names of every container visible to the configured credentials, in
    /// the order the store returns them
    async fn list_containers(&self) -> Result<Vec<String>>;

    /// Objects in `container` whose key starts with `prefix`
    async fn list_objects(&self, container: &str, prefix: &str) -> Result<Vec<ObjectSummary>>;

    /// Upload the full contents of `local` under `key`, replacing any
    /// existing object
    async fn upload_file(&self, local: &Path, container: &str, key: &str) -> Result<()>;
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for std::sync::Arc<T> {
    async fn list_containers(&self) -> Result<Vec<String>> {
        (**self).list_containers().await
    }

    async fn list_objects(&self, container: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        (**self).list_objects(container, prefix).await
    }

    async fn upload_file(&self, local: &Path, container: &str, key: &str) -> Result<()> {
        (**self).upload_file(local, container, key).await
    }
}

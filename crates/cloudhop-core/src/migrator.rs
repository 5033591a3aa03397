//! Migration pipeline: discover → fetch → publish → verify (→ cleanup)

use crate::fetch::{Fetcher, ToolStatus};
use crate::staging::{self, StagingDir};
use crate::store::ObjectStore;
use cloudhop_common::format::{format_bytes, format_count, format_megabytes};
use cloudhop_common::{ContainerRole, MigrateError, ObjectSummary, Result, StagedEntry};
use serde::Serialize;
use std::path::Path;
use tracing::{error, info, instrument, warn};

/// Key prefix used when the caller does not pick one.
pub const DEFAULT_PREFIX: &str = "raw/";

/// Staging directory used when the caller does not pick one.
pub const DEFAULT_STAGING_DIR: &str = "/tmp/gcs_migration";

/// Destination listing summary produced by [`Migrator::verify`]
#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub container: String,
    pub prefix: String,
    pub objects: Vec<ObjectSummary>,
    pub total_bytes: u64,
}

impl VerifyReport {
    fn new(container: &str, prefix: &str, objects: Vec<ObjectSummary>) -> Self {
        let total_bytes = objects.iter().map(|o| o.size).sum();
        Self {
            container: container.to_string(),
            prefix: prefix.to_string(),
            objects,
            total_bytes,
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

/// Binds roles from a container listing into `slots`, never replacing a
/// name that is already set. Returns the roles bound by this call.
pub fn bind_roles<'a>(
    names: impl IntoIterator<Item = &'a str>,
    dataset: &mut Option<String>,
    model: &mut Option<String>,
) -> Vec<(ContainerRole, String)> {
    let mut bound = Vec::new();

    for name in names {
        for role in ContainerRole::ALL {
            let slot = match role {
                ContainerRole::Dataset => &mut *dataset,
                ContainerRole::Model => &mut *model,
            };
            if slot.is_none() && role.matches(name) {
                *slot = Some(name.to_string());
                bound.push((role, name.to_string()));
            }
        }
    }

    bound
}

/// Orchestrates one source → staging → destination migration.
///
/// The store and fetcher are injected so tests can run the whole pipeline
/// against fakes.
pub struct Migrator<S, F> {
    store: S,
    fetcher: F,
    dataset_container: Option<String>,
    model_container: Option<String>,
}

impl<S: ObjectStore, F: Fetcher> Migrator<S, F> {
    pub fn new(store: S, fetcher: F) -> Self {
        Self {
            store,
            fetcher,
            dataset_container: None,
            model_container: None,
        }
    }

    /// Explicit dataset bucket. Empty names are ignored.
    pub fn with_dataset_container(mut self, name: impl Into<String>) -> Self {
        self.dataset_container = non_empty(name.into());
        self
    }

    /// Explicit model bucket. Empty names are ignored.
    pub fn with_model_container(mut self, name: impl Into<String>) -> Self {
        self.model_container = non_empty(name.into());
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn container_for(&self, role: ContainerRole) -> Option<&str> {
        match role {
            ContainerRole::Dataset => self.dataset_container.as_deref(),
            ContainerRole::Model => self.model_container.as_deref(),
        }
    }

    pub fn dataset_container(&self) -> Option<&str> {
        self.container_for(ContainerRole::Dataset)
    }

    pub fn model_container(&self) -> Option<&str> {
        self.container_for(ContainerRole::Model)
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.dataset_container.is_some() && self.model_container.is_some()
    }

    /// Bind unset roles from the destination's bucket listing.
    ///
    /// Unmatched roles stay unset with a warning; the error only surfaces
    /// when something needs that role.
    #[instrument(skip(self))]
    pub async fn discover(&mut self) -> Result<()> {
        info!("Discovering S3 buckets...");
        let names = self.store.list_containers().await?;

        let bound = bind_roles(
            names.iter().map(String::as_str),
            &mut self.dataset_container,
            &mut self.model_container,
        );
        for (role, name) in &bound {
            info!(%role, bucket = %name, "Found {} bucket: {}", role, name);
        }

        for role in ContainerRole::ALL {
            if self.container_for(role).is_none() {
                warn!(%role, "⚠️  No {} bucket found. Please specify manually.", role);
            }
        }

        Ok(())
    }

    /// Run discovery only if a role is still unset
    pub async fn discover_missing(&mut self) -> Result<()> {
        if self.is_fully_resolved() {
            return Ok(());
        }
        self.discover().await
    }

    /// One-shot check-then-install of the transfer tool
    pub async fn install_tool(&self) -> Result<ToolStatus> {
        self.fetcher
            .ensure_installed()
            .await
            .inspect_err(|e| error!(error = %e, "❌ Transfer tool unavailable"))
    }

    /// Copy `source_uri` into `staging_dir` and summarize what landed there
    #[instrument(skip(self, staging_dir), fields(staging_dir = %staging_dir.display()))]
    pub async fn fetch(&self, source_uri: &str, staging_dir: &Path) -> Result<Vec<StagedEntry>> {
        staging::ensure_dir(staging_dir)?;

        info!("📥 Downloading from {}...", source_uri);
        self.fetcher
            .fetch(source_uri, staging_dir)
            .await
            .inspect_err(|e| error!(error = %e, "❌ Error downloading from source"))?;
        info!("✅ Download complete");

        let entries = staging::list_entries(staging_dir)?;
        info!("Downloaded files in {}:", staging_dir.display());
        for entry in &entries {
            info!("  - {} ({} bytes)", entry.name, format_count(entry.size));
        }

        Ok(entries)
    }

    /// Upload every file under `root` to `container` as `prefix + relative path`.
    ///
    /// Stops at the first failed upload. Objects uploaded before it stay in
    /// place; re-running overwrites them.
    #[instrument(skip(self, root), fields(root = %root.display()))]
    pub async fn publish(&self, root: &Path, container: &str, prefix: &str) -> Result<Vec<String>> {
        if container.trim().is_empty() {
            return Err(MigrateError::Config("S3 bucket not specified".to_string()));
        }
        if !root.is_dir() {
            return Err(MigrateError::Walk(format!(
                "staging directory {} does not exist",
                root.display()
            )));
        }

        info!("📤 Uploading to s3://{}/{}...", container, prefix);

        let mut uploaded = Vec::new();
        for item in staging::walk_files(root) {
            let (path, relative) = item?;
            let key = staging::object_key(prefix, &relative)?;

            info!("  Uploading {}...", relative.display());
            self.store
                .upload_file(&path, container, &key)
                .await
                .inspect_err(|e| error!(error = %e, key = %key, "❌ Upload failed"))?;
            uploaded.push(key);
        }

        info!("✅ Upload complete! {} files uploaded", uploaded.len());
        Ok(uploaded)
    }

    /// List `prefix` in `container` and report count and total size
    #[instrument(skip(self))]
    pub async fn verify(&self, container: &str, prefix: &str) -> Result<VerifyReport> {
        info!("📋 Verifying files in s3://{}/{}:", container, prefix);

        let objects = self
            .store
            .list_objects(container, prefix)
            .await
            .inspect_err(|e| error!(error = %e, "❌ Verification listing failed"))?;
        for object in &objects {
            info!("  - {} ({} bytes)", object.key, format_count(object.size));
        }

        let report = VerifyReport::new(container, prefix, objects);
        info!(
            objects = report.object_count(),
            total_bytes = report.total_bytes,
            "Total: {} files, {} bytes ({}, {})",
            report.object_count(),
            format_count(report.total_bytes),
            format_megabytes(report.total_bytes),
            format_bytes(report.total_bytes)
        );

        Ok(report)
    }

    /// Full pipeline into the dataset bucket
    pub async fn migrate(
        &self,
        source_uri: &str,
        prefix: &str,
        staging_dir: impl AsRef<Path>,
        cleanup: bool,
    ) -> Result<Vec<String>> {
        self.migrate_to(ContainerRole::Dataset, source_uri, prefix, staging_dir, cleanup)
            .await
    }

    /// Full pipeline into the bucket bound to `role`.
    ///
    /// Fetch, publish and verify run in that order. With `cleanup` the
    /// staging directory is removed on return, whether or not a step failed.
    #[instrument(skip(self, staging_dir))]
    pub async fn migrate_to(
        &self,
        role: ContainerRole,
        source_uri: &str,
        prefix: &str,
        staging_dir: impl AsRef<Path>,
        cleanup: bool,
    ) -> Result<Vec<String>> {
        let container = self
            .container_for(role)
            .ok_or_else(|| MigrateError::unresolved(role))
            .inspect_err(|e| error!(error = %e, "❌ Cannot migrate"))?;

        let guard = StagingDir::acquire(staging_dir.as_ref(), cleanup);

        self.fetch(source_uri, guard.path()).await?;
        let uploaded = self.publish(guard.path(), container, prefix).await?;
        self.verify(container, prefix).await?;

        Ok(uploaded)
    }
}

fn non_empty(name: String) -> Option<String> {
    if name.trim().is_empty() {
        None
    } else {
        Some(name)
    }
}

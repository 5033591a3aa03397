use super::multipart::{needs_multipart, plan_parts, DEFAULT_PART_SIZE};
use super::{config::StorageConfig, ObjectStore};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use aws_config::{meta::region::RegionProviderChain, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::Region,
    primitives::{ByteStream, Length},
    types::{CompletedMultipartUpload, CompletedPart},
    Client,
};
use cloudhop_common::{MigrateError, ObjectSummary, Result};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// S3 (or S3-compatible) destination store
#[derive(Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub async fn new(config: StorageConfig) -> Result<Self> {
        debug!(
            endpoint = ?config.endpoint,
            region = ?config.region,
            path_style = config.path_style,
            "Initializing S3 client"
        );

        let region = RegionProviderChain::first_try(config.region.clone().map(Region::new))
            .or_default_provider()
            .or_else(Region::new(super::config::DEFAULT_REGION));

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared).force_path_style(config.path_style);

        if let Some((access_key, secret_key)) = config.static_credentials() {
            builder = builder.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "cloudhop-static",
            ));
        }

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        info!(region = config.region_or_default(), "S3 client initialized");

        Ok(Self {
            client: Client::from_conf(builder.build()),
        })
    }

    /// Wrap an already configured SDK client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    #[instrument(skip(self))]
    async fn list_containers(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .list_buckets()
            .send()
            .await
            .context("Failed to list S3 buckets")
            .map_err(MigrateError::Listing)?;

        let names: Vec<String> = response
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(str::to_string))
            .collect();

        debug!(count = names.len(), "Listed buckets");
        Ok(names)
    }

    /// Follows continuation tokens until the listing is exhausted.
    #[instrument(skip(self))]
    async fn list_objects(&self, container: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(container)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut objects = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page
                .with_context(|| format!("Failed to list s3://{}/{}", container, prefix))
                .map_err(MigrateError::Listing)?;

            for object in page.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                objects.push(ObjectSummary {
                    key: key.to_string(),
                    size: object.size().unwrap_or(0).max(0) as u64,
                    last_modified: object
                        .last_modified()
                        .and_then(|dt| chrono::DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())),
                });
            }
        }

        debug!(count = objects.len(), "Listed objects");
        Ok(objects)
    }

    /// Files above [`MULTIPART_THRESHOLD`](super::multipart::MULTIPART_THRESHOLD)
    /// are sent as a multipart upload.
    #[instrument(skip(self, local), fields(local = %local.display()))]
    async fn upload_file(&self, local: &Path, container: &str, key: &str) -> Result<()> {
        let upload_error = |source: anyhow::Error| MigrateError::Upload {
            container: container.to_string(),
            key: key.to_string(),
            source,
        };

        let size = tokio::fs::metadata(local)
            .await
            .map_err(|e| MigrateError::io(local, e))?
            .len();

        if needs_multipart(size) {
            return self
                .upload_multipart(local, container, key, size)
                .await
                .map_err(upload_error);
        }

        let body = ByteStream::from_path(local)
            .await
            .map_err(|e| upload_error(anyhow!(e).context(format!("Failed to read {}", local.display()))))?;

        self.client
            .put_object()
            .bucket(container)
            .key(key)
            .body(body)
            .send()
            .await
            .context("Failed to upload to S3")
            .map_err(upload_error)?;

        debug!("Uploaded to s3://{}/{}", container, key);
        Ok(())
    }
}

impl S3Store {
    /// Create, upload every part, complete. Aborts the upload if any step
    /// after creation fails.
    async fn upload_multipart(
        &self,
        local: &Path,
        container: &str,
        key: &str,
        size: u64,
    ) -> anyhow::Result<()> {
        let created = self
            .client
            .create_multipart_upload()
            .bucket(container)
            .key(key)
            .send()
            .await
            .context("Failed to start multipart upload")?;
        let upload_id = created
            .upload_id()
            .context("Missing upload ID")?
            .to_string();

        let result = self.upload_parts(local, container, key, &upload_id, size).await;

        if let Err(e) = &result {
            warn!(error = %e, upload_id = %upload_id, "Aborting multipart upload");
            if let Err(abort_err) = self
                .client
                .abort_multipart_upload()
                .bucket(container)
                .key(key)
                .upload_id(&upload_id)
                .send()
                .await
            {
                warn!(error = %abort_err, upload_id = %upload_id, "Failed to abort multipart upload");
            }
        }

        result
    }

    async fn upload_parts(
        &self,
        local: &Path,
        container: &str,
        key: &str,
        upload_id: &str,
        size: u64,
    ) -> anyhow::Result<()> {
        let plan = plan_parts(size, DEFAULT_PART_SIZE);
        debug!(parts = plan.len(), size, "Uploading in parts");

        let mut completed = Vec::with_capacity(plan.len());
        for part in plan {
            let body = ByteStream::read_from()
                .path(local)
                .offset(part.offset)
                .length(Length::Exact(part.length))
                .build()
                .await
                .with_context(|| format!("Failed to read part {} of {}", part.number, local.display()))?;

            let uploaded = self
                .client
                .upload_part()
                .bucket(container)
                .key(key)
                .upload_id(upload_id)
                .part_number(part.number)
                .body(body)
                .send()
                .await
                .with_context(|| format!("Failed to upload part {}", part.number))?;

            completed.push(
                CompletedPart::builder()
                    .set_e_tag(uploaded.e_tag().map(str::to_string))
                    .part_number(part.number)
                    .build(),
            );
        }

        self.client
            .complete_multipart_upload()
            .bucket(container)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(completed))
                    .build(),
            )
            .send()
            .await
            .context("Failed to complete multipart upload")?;

        debug!("Uploaded to s3://{}/{} in parts", container, key);
        Ok(())
    }
}

//! Shared fakes for migrator integration tests
//!
//! - [`MemoryStore`]: in-memory destination with scripted upload failures
//! - [`FakeFetcher`]: writes a fixed file set into the staging directory
//!   instead of spawning the transfer tool

#![allow(dead_code)]

use async_trait::async_trait;
use cloudhop_common::{MigrateError, ObjectSummary, Result};
use cloudhop_core::{Fetcher, ToolStatus};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const DATASET_BUCKET: &str = "acme-dev-datasets";
pub const MODEL_BUCKET: &str = "acme-dev-models";

#[derive(Default)]
pub struct MemoryStore {
    containers: Vec<String>,
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    attempts: Mutex<Vec<String>>,
    list_calls: AtomicUsize,
    fail_on_attempt: Option<usize>,
}

impl MemoryStore {
    pub fn with_containers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            containers: names.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Make the `n`th upload attempt (1-based) fail
    pub fn failing_on(mut self, n: usize) -> Self {
        self.fail_on_attempt = Some(n);
        self
    }

    pub fn seed(&self, container: &str, key: &str, bytes: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert((container.to_string(), key.to_string()), bytes.to_vec());
    }

    pub fn keys(&self, container: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(c, _)| c == container)
            .map(|(_, k)| k.clone())
            .collect()
    }

    pub fn snapshot(&self) -> BTreeMap<(String, String), Vec<u8>> {
        self.objects.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl cloudhop_core::ObjectStore for MemoryStore {
    async fn list_containers(&self) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.containers.clone())
    }

    async fn list_objects(&self, container: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|((c, k), _)| c == container && k.starts_with(prefix))
            .map(|((_, k), bytes)| ObjectSummary::new(k.clone(), bytes.len() as u64))
            .collect())
    }

    async fn upload_file(&self, local: &Path, container: &str, key: &str) -> Result<()> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(key.to_string());
            attempts.len()
        };

        if self.fail_on_attempt == Some(attempt) {
            return Err(MigrateError::Upload {
                container: container.to_string(),
                key: key.to_string(),
                source: anyhow::anyhow!("simulated network failure"),
            });
        }

        let bytes = tokio::fs::read(local)
            .await
            .map_err(|e| MigrateError::io(local, e))?;
        self.objects
            .lock()
            .unwrap()
            .insert((container.to_string(), key.to_string()), bytes);
        Ok(())
    }
}

/// Stand-in for the transfer tool
#[derive(Default)]
pub struct FakeFetcher {
    files: Vec<(PathBuf, Vec<u8>)>,
    fail: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn with_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, Vec<u8>)>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(|(p, b)| (p.into(), b)).collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    fn program(&self) -> &str {
        "fake-gsutil"
    }

    async fn ensure_installed(&self) -> Result<ToolStatus> {
        Ok(ToolStatus::AlreadyInstalled {
            version: "fake-gsutil 5.0".to_string(),
        })
    }

    async fn fetch(&self, source_uri: &str, dest: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(source_uri.to_string());

        if self.fail {
            return Err(MigrateError::ToolFailed {
                program: "fake-gsutil".to_string(),
                source_uri: source_uri.to_string(),
                status: "exit status: 1".to_string(),
            });
        }

        for (relative, bytes) in &self.files {
            let target = dest.join(relative);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| MigrateError::io(parent, e))?;
            }
            std::fs::write(&target, bytes).map_err(|e| MigrateError::io(&target, e))?;
        }
        Ok(())
    }
}

/// Write `files` (relative path, contents) under `root`
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, contents) in files {
        let target = root.join(relative);
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(target, contents.as_bytes()).unwrap();
    }
}

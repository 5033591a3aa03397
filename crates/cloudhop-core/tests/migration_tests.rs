//! Migrator pipeline tests against in-memory fakes
//!
//! Covers discovery binding, publish key layout, partial-failure behavior,
//! verification totals and the staging cleanup guarantee.

mod common;

use cloudhop_common::{ContainerRole, MigrateError};
use cloudhop_core::Migrator;
use common::{write_tree, FakeFetcher, MemoryStore, DATASET_BUCKET, MODEL_BUCKET};
use std::collections::BTreeSet;

fn migrator(store: MemoryStore, fetcher: FakeFetcher) -> Migrator<MemoryStore, FakeFetcher> {
    Migrator::new(store, fetcher).with_dataset_container(DATASET_BUCKET)
}

// ============================================================================
// Discovery
// ============================================================================

#[tokio::test]
async fn test_discover_binds_first_match_per_role() {
    let store = MemoryStore::with_containers([
        "terraform-state",
        "acme-dev-DATASETS",
        "acme-dev-models",
        "acme-prod-datasets",
    ]);
    let mut migrator = Migrator::new(store, FakeFetcher::default());

    migrator.discover().await.unwrap();

    assert_eq!(migrator.dataset_container(), Some("acme-dev-DATASETS"));
    assert_eq!(migrator.model_container(), Some("acme-dev-models"));
}

#[tokio::test]
async fn test_discover_leaves_unmatched_role_unset() {
    let store = MemoryStore::with_containers(["acme-dev-models", "logs"]);
    let mut migrator = Migrator::new(store, FakeFetcher::default());

    migrator.discover().await.unwrap();

    assert_eq!(migrator.dataset_container(), None);
    assert_eq!(migrator.model_container(), Some("acme-dev-models"));
}

#[tokio::test]
async fn test_discover_keeps_explicit_names() {
    let store = MemoryStore::with_containers(["other-datasets", "other-models"]);
    let mut migrator = Migrator::new(store, FakeFetcher::default())
        .with_dataset_container("my-explicit-bucket");

    migrator.discover().await.unwrap();

    assert_eq!(migrator.dataset_container(), Some("my-explicit-bucket"));
    assert_eq!(migrator.model_container(), Some("other-models"));
}

#[tokio::test]
async fn test_discover_missing_skips_listing_when_resolved() {
    let store = MemoryStore::with_containers(["x-datasets"]);
    let mut migrator = Migrator::new(store, FakeFetcher::default())
        .with_dataset_container(DATASET_BUCKET)
        .with_model_container(MODEL_BUCKET);

    migrator.discover_missing().await.unwrap();

    assert_eq!(migrator.store().list_calls(), 0);
    assert_eq!(migrator.dataset_container(), Some(DATASET_BUCKET));
}

#[tokio::test]
async fn test_empty_explicit_name_counts_as_unset() {
    let store = MemoryStore::with_containers(["found-datasets"]);
    let mut migrator = Migrator::new(store, FakeFetcher::default()).with_dataset_container("  ");

    migrator.discover_missing().await.unwrap();

    assert_eq!(migrator.dataset_container(), Some("found-datasets"));
}

// ============================================================================
// Publish
// ============================================================================

#[tokio::test]
async fn test_publish_key_layout() {
    let tmp = tempfile::tempdir().unwrap();
    write_tree(
        tmp.path(),
        &[
            ("data.csv", "a,b\n1,2\n"),
            ("images/cat.png", "png"),
            ("images/2024/dog.png", "png2"),
        ],
    );
    let migrator = migrator(MemoryStore::default(), FakeFetcher::default());

    let keys = migrator.publish(tmp.path(), DATASET_BUCKET, "raw/datasets/").await.unwrap();

    let got: BTreeSet<_> = keys.iter().cloned().collect();
    let expected: BTreeSet<_> = [
        "raw/datasets/data.csv",
        "raw/datasets/images/cat.png",
        "raw/datasets/images/2024/dog.png",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(keys.len(), 3);
    assert_eq!(got, expected);
    assert_eq!(
        migrator.store().keys(DATASET_BUCKET).into_iter().collect::<BTreeSet<_>>(),
        expected
    );
}

#[tokio::test]
async fn test_publish_requires_container() {
    let tmp = tempfile::tempdir().unwrap();
    write_tree(tmp.path(), &[("a.txt", "a")]);
    let migrator = migrator(MemoryStore::default(), FakeFetcher::default());

    let err = migrator.publish(tmp.path(), "", "raw/").await.unwrap_err();

    assert!(err.is_configuration());
    assert!(migrator.store().attempts().is_empty());
}

#[tokio::test]
async fn test_publish_overwrites_and_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    write_tree(tmp.path(), &[("a.txt", "first"), ("dir/b.txt", "second")]);
    let store = MemoryStore::default();
    store.seed(DATASET_BUCKET, "raw/a.txt", b"stale contents");
    let migrator = migrator(store, FakeFetcher::default());

    migrator.publish(tmp.path(), DATASET_BUCKET, "raw/").await.unwrap();
    let after_first = migrator.store().snapshot();
    migrator.publish(tmp.path(), DATASET_BUCKET, "raw/").await.unwrap();
    let after_second = migrator.store().snapshot();

    assert_eq!(after_first, after_second);
    assert_eq!(after_second.len(), 2);
    assert_eq!(
        after_second[&(DATASET_BUCKET.to_string(), "raw/a.txt".to_string())],
        b"first".to_vec()
    );
}

#[tokio::test]
async fn test_publish_stops_at_first_failure() {
    let tmp = tempfile::tempdir().unwrap();
    write_tree(
        tmp.path(),
        &[("1.bin", "1"), ("2.bin", "2"), ("3.bin", "3"), ("4.bin", "4"), ("5.bin", "5")],
    );
    let migrator = migrator(MemoryStore::default().failing_on(3), FakeFetcher::default());

    let err = migrator.publish(tmp.path(), DATASET_BUCKET, "raw/").await.unwrap_err();

    let attempts = migrator.store().attempts();
    assert!(matches!(err, MigrateError::Upload { ref key, .. } if *key == attempts[2]));
    assert_eq!(attempts.len(), 3, "no uploads after the failing one");

    let stored: BTreeSet<_> = migrator.store().keys(DATASET_BUCKET).into_iter().collect();
    let first_two: BTreeSet<_> = attempts[..2].iter().cloned().collect();
    assert_eq!(stored, first_two, "earlier uploads are not rolled back");
}

#[tokio::test]
async fn test_publish_missing_root_fails_before_upload() {
    let tmp = tempfile::tempdir().unwrap();
    let migrator = migrator(MemoryStore::default(), FakeFetcher::default());

    let err = migrator
        .publish(&tmp.path().join("missing"), DATASET_BUCKET, "raw/")
        .await
        .unwrap_err();

    assert!(matches!(err, MigrateError::Walk(_)));
    assert!(migrator.store().attempts().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_publish_skips_symlinked_directories() {
    let tmp = tempfile::tempdir().unwrap();
    let outside = tmp.path().join("outside");
    write_tree(&outside, &[("secret.txt", "not staged")]);
    let stage = tmp.path().join("stage");
    write_tree(&stage, &[("data.csv", "a,b")]);
    std::os::unix::fs::symlink(&outside, stage.join("link")).unwrap();
    std::os::unix::fs::symlink(&stage, stage.join("loop")).unwrap();
    let migrator = migrator(MemoryStore::default(), FakeFetcher::default());

    let keys = migrator.publish(&stage, DATASET_BUCKET, "raw/").await.unwrap();

    assert_eq!(keys, vec!["raw/data.csv".to_string()]);
    assert_eq!(migrator.store().keys(DATASET_BUCKET), keys);
}

// ============================================================================
// Verify
// ============================================================================

#[tokio::test]
async fn test_verify_counts_only_prefix() {
    let store = MemoryStore::default();
    store.seed(DATASET_BUCKET, "raw/a.csv", &[0u8; 100]);
    store.seed(DATASET_BUCKET, "raw/sub/b.csv", &[0u8; 23]);
    store.seed(DATASET_BUCKET, "processed/c.csv", &[0u8; 999]);
    store.seed(MODEL_BUCKET, "raw/m.bin", &[0u8; 5]);
    let migrator = migrator(store, FakeFetcher::default());

    let report = migrator.verify(DATASET_BUCKET, "raw/").await.unwrap();

    assert_eq!(report.object_count(), 2);
    assert_eq!(report.total_bytes, 123);
    assert_eq!(report.prefix, "raw/");
}

#[tokio::test]
async fn test_verify_matches_publish_for_fresh_prefix() {
    let tmp = tempfile::tempdir().unwrap();
    write_tree(tmp.path(), &[("x", "12345"), ("y/z", "678")]);
    let migrator = migrator(MemoryStore::default(), FakeFetcher::default());

    let keys = migrator.publish(tmp.path(), DATASET_BUCKET, "fresh/").await.unwrap();
    let report = migrator.verify(DATASET_BUCKET, "fresh/").await.unwrap();

    assert_eq!(report.object_count(), keys.len());
    assert_eq!(report.total_bytes, 8);
}

// ============================================================================
// Migrate
// ============================================================================

#[tokio::test]
async fn test_end_to_end_single_file() {
    let tmp = tempfile::tempdir().unwrap();
    let staging = tmp.path().join("stage");
    let fetcher = FakeFetcher::with_files([("data.csv", vec![b'x'; 100])]);
    let migrator = migrator(MemoryStore::default(), fetcher);

    let keys = migrator
        .migrate("src://bucket/data.csv", "raw/", &staging, true)
        .await
        .unwrap();

    assert_eq!(keys, vec!["raw/data.csv".to_string()]);
    assert_eq!(migrator.fetcher().calls(), vec!["src://bucket/data.csv".to_string()]);

    let report = migrator.verify(DATASET_BUCKET, "raw/").await.unwrap();
    assert_eq!(report.object_count(), 1);
    assert_eq!(report.total_bytes, 100);

    assert!(!staging.exists(), "staging directory removed after success");
}

#[tokio::test]
async fn test_migrate_without_dataset_bucket_fails_fast() {
    let tmp = tempfile::tempdir().unwrap();
    let staging = tmp.path().join("stage");
    let migrator = Migrator::new(MemoryStore::default(), FakeFetcher::default())
        .with_model_container(MODEL_BUCKET);

    let err = migrator
        .migrate("gs://bucket/data.csv", "raw/", &staging, true)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MigrateError::ContainerUnresolved { role: ContainerRole::Dataset, .. }
    ));
    assert!(migrator.fetcher().calls().is_empty());
    assert!(!staging.exists());
}

#[tokio::test]
async fn test_migrate_to_model_bucket() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::with_files([("weights/model.safetensors", vec![1u8; 64])]);
    let migrator = Migrator::new(MemoryStore::default(), fetcher).with_model_container(MODEL_BUCKET);

    let keys = migrator
        .migrate_to(ContainerRole::Model, "gs://m/*", "models/", tmp.path().join("s"), true)
        .await
        .unwrap();

    assert_eq!(keys, vec!["models/weights/model.safetensors".to_string()]);
    assert_eq!(migrator.store().keys(MODEL_BUCKET), keys);
}

#[tokio::test]
async fn test_cleanup_runs_when_publish_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let staging = tmp.path().join("stage");
    let fetcher = FakeFetcher::with_files([("a", vec![1]), ("b", vec![2])]);
    let migrator = migrator(MemoryStore::default().failing_on(1), fetcher);

    let err = migrator.migrate("gs://b/*", "raw/", &staging, true).await.unwrap_err();

    assert!(matches!(err, MigrateError::Upload { .. }));
    assert!(!staging.exists());
}

#[tokio::test]
async fn test_cleanup_runs_when_fetch_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let staging = tmp.path().join("stage");
    let migrator = migrator(MemoryStore::default(), FakeFetcher::failing());

    let err = migrator.migrate("gs://b/*", "raw/", &staging, true).await.unwrap_err();

    assert!(matches!(err, MigrateError::ToolFailed { .. }));
    assert!(!staging.exists());
    assert!(migrator.store().attempts().is_empty());
}

#[tokio::test]
async fn test_no_cleanup_keeps_staging_on_success_and_failure() {
    let tmp = tempfile::tempdir().unwrap();

    let ok_staging = tmp.path().join("ok");
    let ok = migrator(MemoryStore::default(), FakeFetcher::with_files([("f.txt", b"hi".to_vec())]));
    ok.migrate("gs://b/f.txt", "raw/", &ok_staging, false).await.unwrap();
    assert!(ok_staging.join("f.txt").exists());

    let bad_staging = tmp.path().join("bad");
    let bad = migrator(
        MemoryStore::default().failing_on(1),
        FakeFetcher::with_files([("f.txt", b"hi".to_vec())]),
    );
    bad.migrate("gs://b/f.txt", "raw/", &bad_staging, false).await.unwrap_err();
    assert!(bad_staging.join("f.txt").exists());
}

#[tokio::test]
async fn test_fetch_summary_lists_top_level_entries() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::with_files([
        ("data.csv", vec![0u8; 10]),
        ("nested/deep.csv", vec![0u8; 20]),
    ]);
    let migrator = migrator(MemoryStore::default(), fetcher);

    let entries = migrator.fetch("gs://b/*", tmp.path()).await.unwrap();

    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["data.csv", "nested"]);
    assert_eq!(entries[0].size, 10);
}

//! Version store behaviour against an in-memory SQLite database.

mod support;

use migration::{MigrationError, VersionStore};
use support::{connect, count, id, names};

#[tokio::test]
async fn ensure_exists_is_idempotent() {
    let db = connect().await;
    let store = VersionStore::new("schema_versions");

    store.ensure_exists(&db).await.unwrap();
    store.ensure_exists(&db).await.unwrap();

    assert!(store.list_applied(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn lists_in_ascending_identity_order() {
    let db = connect().await;
    let store = VersionStore::new("schema_versions");
    store.ensure_exists(&db).await.unwrap();

    for name in ["m20240317_000001_c", "m20240101_000001_a", "m20240315_000001_b"] {
        store.record_applied(&db, &id(name)).await.unwrap();
    }

    let ids: Vec<_> = store
        .list_applied(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.identity)
        .collect();
    assert_eq!(
        names(&ids),
        vec!["m20240101_000001_a", "m20240315_000001_b", "m20240317_000001_c"]
    );
    assert!(store.is_applied(&db, &id("m20240315_000001_b")).await.unwrap());
}

#[tokio::test]
async fn second_record_of_an_identity_is_a_duplicate() {
    let db = connect().await;
    let store = VersionStore::new("schema_versions");
    store.ensure_exists(&db).await.unwrap();
    let unit = id("m20240101_000001_a");

    store.record_applied(&db, &unit).await.unwrap();
    let err = store.record_applied(&db, &unit).await.unwrap_err();

    assert!(matches!(err, MigrationError::DuplicateApplication { .. }));
    assert!(err.is_resolved_by_other_writer());
    assert_eq!(count(&db, "SELECT COUNT(*) FROM schema_versions").await, 1);
}

#[tokio::test]
async fn reverting_an_unrecorded_identity_is_reported() {
    let db = connect().await;
    let store = VersionStore::new("schema_versions");
    store.ensure_exists(&db).await.unwrap();
    let unit = id("m20240101_000001_a");

    assert!(matches!(
        store.record_reverted(&db, &unit).await,
        Err(MigrationError::NotApplied { .. })
    ));

    store.record_applied(&db, &unit).await.unwrap();
    store.record_reverted(&db, &unit).await.unwrap();
    assert!(!store.is_applied(&db, &unit).await.unwrap());
}

#[tokio::test]
async fn separate_tables_keep_separate_histories() {
    let db = connect().await;
    let schema = VersionStore::new("schema_versions");
    let seeds = VersionStore::new("seed_versions");
    schema.ensure_exists(&db).await.unwrap();
    seeds.ensure_exists(&db).await.unwrap();

    seeds
        .record_applied(&db, &id("s20240315_000001_seed_departments"))
        .await
        .unwrap();

    assert!(schema.list_applied(&db).await.unwrap().is_empty());
    assert_eq!(seeds.list_applied(&db).await.unwrap().len(), 1);
}

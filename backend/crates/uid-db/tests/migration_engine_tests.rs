mod common;

use common::{canonical_user, create_test_store, day, legacy_user};

use uid_core::{
    MigrationEngine, MigrationPass, PassOutcome, RecordStore, SerialStrategy, UserRecord,
};
use uid_db::{MigrationStateRepository, SqliteRecordStore};

use googletest::prelude::*;

async fn seeded_store() -> SqliteRecordStore {
    let store = create_test_store().await;
    for user in [
        legacy_user("jane@x.com", "client", day(2024, 1, 10)),
        legacy_user("bob@x.com", "client", day(2024, 1, 12)),
        legacy_user("root@x.com", "admin", day(2023, 5, 1)),
        canonical_user("cl2090124", "client", None),
    ] {
        store.put_user(&user).await.unwrap();
    }
    store
}

#[tokio::test]
async fn given_legacy_users_when_engine_runs_then_store_is_fully_migrated() {
    // Given
    let store = seeded_store().await;
    let engine = MigrationEngine::default();

    // When
    let report = engine.run(&store).await.unwrap();

    // Then
    let users = store.list_users().await.unwrap();
    let keys: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(keys, vec!["ad1010523", "cl2090124", "cl3120124", "cl4100124"]);
    assert!(users.iter().all(UserRecord::is_fully_migrated));
    assert_that!(report.writes(), eq(7));

    let jane = store.get_user("cl4100124").await.unwrap().unwrap();
    assert_that!(jane.email().as_deref(), some(eq("jane@x.com")));
    assert_that!(jane.created_at, some(eq(day(2024, 1, 10))));
}

#[tokio::test]
async fn given_completed_migration_when_engine_runs_again_then_nothing_is_written() {
    // Given
    let store = seeded_store().await;
    let engine = MigrationEngine::default();
    engine.run(&store).await.unwrap();
    let before = store.list_users().await.unwrap();

    // When
    let report = engine.run(&store).await.unwrap();

    // Then
    assert_that!(report.writes(), eq(0));
    assert!(matches!(
        report.key_migration,
        PassOutcome::AlreadyCompleted { completed_at: Some(_) }
    ));
    assert_eq!(store.list_users().await.unwrap(), before);
}

#[tokio::test]
async fn given_completion_markers_when_read_then_they_persist_in_store() {
    // Given
    let store = seeded_store().await;
    MigrationEngine::default().run(&store).await.unwrap();

    // When
    let state = MigrationStateRepository::find(store.pool(), MigrationPass::FieldBackfill)
        .await
        .unwrap();

    // Then
    assert_that!(state.completed, eq(true));
    assert_that!(state.completed_at, some(anything()));
}

#[tokio::test]
async fn given_reset_pass_when_engine_runs_then_pass_runs_again() {
    // Given
    let store = seeded_store().await;
    let engine = MigrationEngine::default();
    engine.run(&store).await.unwrap();
    store
        .put_user(&canonical_user("ad7050324", "admin", None))
        .await
        .unwrap();

    // When
    store
        .reset_migration_state(MigrationPass::FieldBackfill)
        .await
        .unwrap();
    let report = engine.run(&store).await.unwrap();

    // Then
    assert!(matches!(report.field_backfill, PassOutcome::Completed(_)));
    let user = store.get_user("ad7050324").await.unwrap().unwrap();
    assert_that!(user.uid.as_deref(), some(eq("ad7050324")));
}

#[tokio::test]
async fn given_counter_strategy_when_engine_runs_then_counters_track_assigned_serials() {
    // Given
    let store = seeded_store().await;
    let engine = MigrationEngine::new(SerialStrategy::Counter);

    // When
    engine.run(&store).await.unwrap();

    // Then
    let users = store.list_users().await.unwrap();
    assert!(users.iter().all(UserRecord::is_fully_migrated));
    let counters = store.serial_counters().await.unwrap();
    assert_eq!(
        counters,
        vec![("ad".to_string(), 1), ("cl".to_string(), 4)]
    );
}

#[tokio::test]
async fn given_file_database_when_reopened_then_migrated_data_persists() {
    // Given
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("uid.db");
    {
        let store = SqliteRecordStore::open(&path).await.unwrap();
        store
            .put_user(&legacy_user("jane@x.com", "client", day(2024, 1, 10)))
            .await
            .unwrap();
        MigrationEngine::default().run(&store).await.unwrap();
        store.pool().close().await;
    }

    // When
    let store = SqliteRecordStore::open(&path).await.unwrap();

    // Then
    assert_that!(store.get_user("cl1100124").await.unwrap(), some(anything()));
    let state = store
        .migration_state(MigrationPass::KeyMigration)
        .await
        .unwrap();
    assert_that!(state.completed, eq(true));
}

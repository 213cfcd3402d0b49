//! `RecordStore` backed by a SQLite pool.
//!
//! User documents are stored as JSON keyed by their identifier. Batches run
//! inside one transaction, so a failed operation rolls back the whole batch.

use crate::{
    MigrationStateRepository, Result as DbErrorResult, SerialCounterRepository, UserRepository,
    connect, connect_in_memory,
};

use uid_core::store::change_notification::CHANGE_CHANNEL_CAPACITY;
use uid_core::{
    ChangeNotification, MigrationPass, MigrationState, MonotonicClock, RecordStore,
    Result as CoreErrorResult, UserRecord, WriteBatch, WriteOp,
};

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sqlx::{SqliteConnection, SqlitePool};
use tokio::sync::broadcast;

pub struct SqliteRecordStore {
    pool: SqlitePool,
    events: broadcast::Sender<ChangeNotification>,
    revision: AtomicU64,
    clock: MonotonicClock,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        let (events, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            pool,
            events,
            revision: AtomicU64::new(0),
            clock: MonotonicClock::new(),
        }
    }

    pub async fn open(path: &Path) -> DbErrorResult<Self> {
        Ok(Self::new(connect(path).await?))
    }

    pub async fn in_memory() -> DbErrorResult<Self> {
        Ok(Self::new(connect_in_memory().await?))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Last value handed out by each serial counter, ordered by prefix.
    pub async fn serial_counters(&self) -> DbErrorResult<Vec<(String, u64)>> {
        SerialCounterRepository::list(&self.pool).await
    }

    fn notify(&self) {
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        // No subscribers is fine
        let _ = self.events.send(ChangeNotification { revision });
    }
}

async fn apply_op(conn: &mut SqliteConnection, op: WriteOp) -> DbErrorResult<()> {
    match op {
        WriteOp::Create(record) => UserRepository::insert(conn, &record).await,
        WriteOp::Set(record) => UserRepository::upsert(conn, &record).await,
        WriteOp::UpdateUid {
            key,
            uid,
            updated_at,
        } => UserRepository::update_uid(conn, &key, &uid, updated_at).await,
        WriteOp::Delete { key } => UserRepository::delete(conn, &key).await.map(|_| ()),
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn list_users(&self) -> CoreErrorResult<Vec<UserRecord>> {
        Ok(UserRepository::list(&self.pool).await?)
    }

    async fn get_user(&self, key: &str) -> CoreErrorResult<Option<UserRecord>> {
        Ok(UserRepository::find_by_id(&self.pool, key).await?)
    }

    async fn create_user(&self, record: &UserRecord) -> CoreErrorResult<()> {
        UserRepository::insert(&self.pool, record).await?;
        self.notify();
        Ok(())
    }

    async fn put_user(&self, record: &UserRecord) -> CoreErrorResult<()> {
        UserRepository::upsert(&self.pool, record).await?;
        self.notify();
        Ok(())
    }

    async fn delete_user(&self, key: &str) -> CoreErrorResult<bool> {
        let removed = UserRepository::delete(&self.pool, key).await?;
        if removed {
            self.notify();
        }
        Ok(removed)
    }

    async fn commit(&self, batch: WriteBatch) -> CoreErrorResult<usize> {
        let applied = batch.len();
        let mut tx = self.pool.begin().await.map_err(crate::DbError::from)?;

        for op in batch.into_ops() {
            // Dropping the transaction on error rolls it back
            apply_op(&mut tx, op).await?;
        }

        tx.commit().await.map_err(crate::DbError::from)?;
        debug!("Committed batch of {} operations", applied);

        self.notify();
        Ok(applied)
    }

    async fn server_timestamp(&self) -> CoreErrorResult<DateTime<Utc>> {
        Ok(self.clock.now())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeNotification> {
        self.events.subscribe()
    }

    async fn migration_state(&self, pass: MigrationPass) -> CoreErrorResult<MigrationState> {
        Ok(MigrationStateRepository::find(&self.pool, pass).await?)
    }

    async fn mark_migration_completed(
        &self,
        pass: MigrationPass,
        at: DateTime<Utc>,
    ) -> CoreErrorResult<()> {
        MigrationStateRepository::mark_completed(&self.pool, pass, at).await?;
        Ok(())
    }

    async fn reset_migration_state(&self, pass: MigrationPass) -> CoreErrorResult<()> {
        MigrationStateRepository::reset(&self.pool, pass).await?;
        Ok(())
    }

    async fn reserve_serials(&self, prefix: &str, floor: u64, count: u64) -> CoreErrorResult<u64> {
        Ok(SerialCounterRepository::reserve(&self.pool, prefix, floor, count).await?)
    }
}

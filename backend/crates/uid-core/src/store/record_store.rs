//! Contract for the document store holding user records and migration state.

use crate::{
    ChangeNotification, MigrationPass, MigrationState, Result as CoreErrorResult, UserRecord,
    WriteBatch,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Full current contents of the `users` collection, ordered by key.
    async fn list_users(&self) -> CoreErrorResult<Vec<UserRecord>>;

    async fn get_user(&self, key: &str) -> CoreErrorResult<Option<UserRecord>>;

    /// Insert under `record.id`. Fails with `KeyExists` if the key is taken.
    async fn create_user(&self, record: &UserRecord) -> CoreErrorResult<()>;

    /// Insert or overwrite under `record.id`.
    async fn put_user(&self, record: &UserRecord) -> CoreErrorResult<()>;

    /// Returns `false` if nothing was stored under `key`.
    async fn delete_user(&self, key: &str) -> CoreErrorResult<bool>;

    /// Apply every operation or none. Returns the number of operations applied.
    async fn commit(&self, batch: WriteBatch) -> CoreErrorResult<usize>;

    /// Store-assigned timestamp, strictly increasing across calls.
    async fn server_timestamp(&self) -> CoreErrorResult<DateTime<Utc>>;

    /// Live change notifications, one per committed write.
    fn subscribe(&self) -> broadcast::Receiver<ChangeNotification>;

    async fn migration_state(&self, pass: MigrationPass) -> CoreErrorResult<MigrationState>;

    async fn mark_migration_completed(
        &self,
        pass: MigrationPass,
        at: DateTime<Utc>,
    ) -> CoreErrorResult<()>;

    async fn reset_migration_state(&self, pass: MigrationPass) -> CoreErrorResult<()>;

    /// Atomically reserve `count` consecutive serials for `prefix`.
    ///
    /// The counter is first raised to at least `floor` (the highest serial
    /// already visible in the data). Returns the first reserved serial, or
    /// `SerialExhausted` when the block would run past the counter's range.
    async fn reserve_serials(&self, prefix: &str, floor: u64, count: u64) -> CoreErrorResult<u64>;
}

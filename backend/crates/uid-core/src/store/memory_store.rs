//! In-process record store.
//!
//! Backs unit tests and dry runs: a snapshot from a real store can be loaded
//! here and migrated without touching the original.

use crate::store::change_notification::CHANGE_CHANNEL_CAPACITY;
use crate::{
    ChangeNotification, CoreError, MigrationPass, MigrationState, MonotonicClock, RecordStore,
    Result as CoreErrorResult, UserRecord, WriteBatch, WriteOp,
};

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, broadcast};

pub struct MemoryRecordStore {
    inner: Mutex<MemoryInner>,
    events: broadcast::Sender<ChangeNotification>,
    revision: AtomicU64,
    writes: AtomicUsize,
    clock: MonotonicClock,
}

#[derive(Default)]
struct MemoryInner {
    users: BTreeMap<String, UserRecord>,
    states: HashMap<MigrationPass, MigrationState>,
    counters: HashMap<String, u64>,
    fail_commit: Option<(usize, String)>,
    fail_reads: Option<String>,
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Mutex::new(MemoryInner::default()),
            events,
            revision: AtomicU64::new(0),
            writes: AtomicUsize::new(0),
            clock: MonotonicClock::new(),
        }
    }

    /// Seed with existing documents. Seeding is not counted as writes.
    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let mut store = Self::new();
        store.inner.get_mut().users = users.into_iter().map(|u| (u.id.clone(), u)).collect();
        store
    }

    /// Total operations applied since creation (batch ops and point writes).
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make the next `commit` fail without applying anything.
    pub async fn fail_next_commit(&self, message: impl Into<String>) {
        self.fail_commit_after(0, message).await;
    }

    /// Let `succeeding` commits through, then fail the one after.
    pub async fn fail_commit_after(&self, succeeding: usize, message: impl Into<String>) {
        self.inner.lock().await.fail_commit = Some((succeeding, message.into()));
    }

    /// Make every `list_users` call fail until cleared with `None`.
    pub async fn fail_reads(&self, message: Option<String>) {
        self.inner.lock().await.fail_reads = message;
    }

    fn notify(&self, applied: usize) {
        self.writes.fetch_add(applied, Ordering::SeqCst);
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        // No subscribers is fine
        let _ = self.events.send(ChangeNotification { revision });
    }
}

fn apply_op(users: &mut BTreeMap<String, UserRecord>, op: WriteOp) -> CoreErrorResult<()> {
    match op {
        WriteOp::Create(record) => {
            if users.contains_key(&record.id) {
                return Err(CoreError::key_exists(record.id));
            }
            users.insert(record.id.clone(), record);
        }
        WriteOp::Set(record) => {
            users.insert(record.id.clone(), record);
        }
        WriteOp::UpdateUid {
            key,
            uid,
            updated_at,
        } => {
            let record = users
                .get_mut(&key)
                .ok_or_else(|| CoreError::not_found(key.clone()))?;
            record.uid = Some(uid);
            record.updated_at = Some(updated_at);
        }
        WriteOp::Delete { key } => {
            users.remove(&key);
        }
    }
    Ok(())
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list_users(&self) -> CoreErrorResult<Vec<UserRecord>> {
        let inner = self.inner.lock().await;
        if let Some(message) = &inner.fail_reads {
            return Err(CoreError::store(message.clone()));
        }
        Ok(inner.users.values().cloned().collect())
    }

    async fn get_user(&self, key: &str) -> CoreErrorResult<Option<UserRecord>> {
        Ok(self.inner.lock().await.users.get(key).cloned())
    }

    async fn create_user(&self, record: &UserRecord) -> CoreErrorResult<()> {
        {
            let mut inner = self.inner.lock().await;
            apply_op(&mut inner.users, WriteOp::Create(record.clone()))?;
        }
        self.notify(1);
        Ok(())
    }

    async fn put_user(&self, record: &UserRecord) -> CoreErrorResult<()> {
        {
            let mut inner = self.inner.lock().await;
            apply_op(&mut inner.users, WriteOp::Set(record.clone()))?;
        }
        self.notify(1);
        Ok(())
    }

    async fn delete_user(&self, key: &str) -> CoreErrorResult<bool> {
        let removed = self.inner.lock().await.users.remove(key).is_some();
        if removed {
            self.notify(1);
        }
        Ok(removed)
    }

    async fn commit(&self, batch: WriteBatch) -> CoreErrorResult<usize> {
        let applied = batch.len();
        {
            let mut inner = self.inner.lock().await;
            match inner.fail_commit.take() {
                Some((0, message)) => return Err(CoreError::store(message)),
                Some((remaining, message)) => inner.fail_commit = Some((remaining - 1, message)),
                None => {}
            }

            let mut staged = inner.users.clone();
            for op in batch.into_ops() {
                apply_op(&mut staged, op)?;
            }
            inner.users = staged;
        }
        self.notify(applied);
        Ok(applied)
    }

    async fn server_timestamp(&self) -> CoreErrorResult<DateTime<Utc>> {
        Ok(self.clock.now())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeNotification> {
        self.events.subscribe()
    }

    async fn migration_state(&self, pass: MigrationPass) -> CoreErrorResult<MigrationState> {
        let inner = self.inner.lock().await;
        Ok(inner
            .states
            .get(&pass)
            .cloned()
            .unwrap_or_else(|| MigrationState::pending(pass)))
    }

    async fn mark_migration_completed(
        &self,
        pass: MigrationPass,
        at: DateTime<Utc>,
    ) -> CoreErrorResult<()> {
        self.inner
            .lock()
            .await
            .states
            .insert(pass, MigrationState::completed(pass, at));
        Ok(())
    }

    async fn reset_migration_state(&self, pass: MigrationPass) -> CoreErrorResult<()> {
        self.inner.lock().await.states.remove(&pass);
        Ok(())
    }

    async fn reserve_serials(&self, prefix: &str, floor: u64, count: u64) -> CoreErrorResult<u64> {
        let mut inner = self.inner.lock().await;
        let counter = inner.counters.entry(prefix.to_string()).or_insert(0);
        let base = (*counter).max(floor);
        let last = base
            .checked_add(count)
            .ok_or_else(|| CoreError::serial_exhausted(prefix))?;
        *counter = last;
        Ok(base + 1)
    }
}

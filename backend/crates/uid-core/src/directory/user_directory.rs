//! Caller-facing user directory.
//!
//! Every change notification from the store triggers one cycle: read the
//! collection, run any pending migration pass, publish the result. Errors are
//! published in the state and never end the subscription.

use crate::identifier::{build_identifier, role_prefix};
use crate::{
    CoreError, DirectoryState, MigrationEngine, NewUser, RecordStore, Result as CoreErrorResult,
    UserRecord, UserUpdate,
};

use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;

pub struct UserDirectory<S: RecordStore> {
    store: Arc<S>,
    engine: MigrationEngine,
    auto_migrate: bool,
    state: watch::Sender<DirectoryState>,
}

impl<S: RecordStore> UserDirectory<S> {
    pub fn new(store: Arc<S>, engine: MigrationEngine, auto_migrate: bool) -> Self {
        let (state, _) = watch::channel(DirectoryState::loading());
        Self {
            store,
            engine,
            auto_migrate,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DirectoryState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DirectoryState {
        self.state.borrow().clone()
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Process change notifications until the store drops its sender.
    pub async fn run(&self) {
        let mut events = self.store.subscribe();
        self.refresh().await;

        loop {
            match events.recv().await {
                Ok(notification) => {
                    debug!("Store changed (revision {})", notification.revision);
                    self.refresh().await;
                }
                Err(RecvError::Lagged(missed)) => {
                    debug!("Missed {} change notifications, refreshing", missed);
                    self.refresh().await;
                }
                Err(RecvError::Closed) => {
                    info!("Record store closed, directory stopped");
                    break;
                }
            }
        }
    }

    /// One notification cycle.
    pub async fn refresh(&self) {
        self.state.send_modify(|state| state.loading = true);

        let users = match self.store.list_users().await {
            Ok(users) => users,
            Err(e) => {
                error!("Failed to read users: {}", e);
                self.state.send_replace(DirectoryState::failed(e.to_string()));
                return;
            }
        };

        if !self.auto_migrate {
            self.publish(users, None);
            return;
        }

        let failure = match self.engine.run(self.store.as_ref()).await {
            Ok(report) if report.writes() == 0 => {
                self.publish(users, None);
                return;
            }
            Ok(_) => None,
            Err(e) => {
                warn!("User identifier migration failed, will retry: {}", e);
                Some(e.to_string())
            }
        };

        // An earlier pass may have committed before a later one failed.
        match self.store.list_users().await {
            Ok(current) => self.publish(current, failure),
            Err(e) => {
                error!("Failed to re-read users after migration: {}", e);
                self.publish(users, Some(failure.unwrap_or_else(|| e.to_string())));
            }
        }
    }

    pub async fn get_user(&self, key: &str) -> CoreErrorResult<UserRecord> {
        self.store
            .get_user(key)
            .await?
            .ok_or_else(|| CoreError::not_found(key))
    }

    /// Validate and store a new account under a fresh canonical identifier.
    pub async fn create_user(&self, new_user: NewUser) -> CoreErrorResult<UserRecord> {
        new_user.validate()?;

        let snapshot = self.store.list_users().await?;
        let email = new_user.email.trim().to_lowercase();
        if snapshot
            .iter()
            .filter_map(UserRecord::email)
            .any(|existing| existing.eq_ignore_ascii_case(&email))
        {
            return Err(CoreError::validation(format!(
                "email already registered: {}",
                email
            )));
        }

        let now = self.store.server_timestamp().await?;
        let prefix = role_prefix(Some(&new_user.role_id));
        let serial = self
            .engine
            .allocate_serial(self.store.as_ref(), &snapshot, &prefix)
            .await?;
        let identifier = build_identifier(Some(&new_user.role_id), serial, Some(now));

        if self.store.get_user(&identifier).await?.is_some() {
            return Err(CoreError::key_exists(identifier));
        }

        let record = new_user.into_record(identifier, now);
        self.store.create_user(&record).await?;
        info!("Created user {} ({})", record.id, email);

        Ok(record)
    }

    pub async fn update_user(&self, key: &str, update: UserUpdate) -> CoreErrorResult<UserRecord> {
        update.validate()?;

        let mut record = self.get_user(key).await?;
        let now = self.store.server_timestamp().await?;
        update.apply(&mut record, now);
        self.store.put_user(&record).await?;
        info!("Updated user {}", key);

        Ok(record)
    }

    pub async fn delete_user(&self, key: &str) -> CoreErrorResult<()> {
        if !self.store.delete_user(key).await? {
            return Err(CoreError::not_found(key));
        }
        info!("Deleted user {}", key);
        Ok(())
    }

    fn publish(&self, users: Vec<UserRecord>, error: Option<String>) {
        self.state.send_replace(DirectoryState {
            users,
            loading: false,
            error,
        });
    }
}

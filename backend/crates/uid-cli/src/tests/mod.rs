mod cli;

use crate::App;

use uid_config::Config;
use uid_core::{RecordStore, UserRecord};
use uid_db::SqliteRecordStore;

use serde_json::Value;

/// App over a fresh in-memory database with default config
pub(crate) async fn test_app(users: Vec<UserRecord>) -> App {
    test_app_with(Config::default(), users).await
}

pub(crate) async fn test_app_with(config: Config, users: Vec<UserRecord>) -> App {
    let store = SqliteRecordStore::in_memory().await.unwrap();
    for user in &users {
        store.put_user(user).await.unwrap();
    }
    App::with_store(config, store, false).unwrap()
}

pub(crate) fn legacy_user(email: &str, role: &str, created_at: &str) -> UserRecord {
    let mut record = UserRecord::new(email, Some(role));
    record.created_at = Some(created_at.parse().unwrap());
    record
        .fields
        .insert("email".to_string(), Value::String(email.to_string()));
    record
}

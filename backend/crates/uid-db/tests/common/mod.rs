#![allow(dead_code)]

use uid_core::UserRecord;
use uid_db::SqliteRecordStore;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

/// In-memory store with migrations applied
pub async fn create_test_store() -> SqliteRecordStore {
    SqliteRecordStore::in_memory()
        .await
        .expect("Failed to create test store")
}

/// Midnight UTC on the given day
pub fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
}

pub fn legacy_user(email: &str, role: &str, created_at: DateTime<Utc>) -> UserRecord {
    let mut record = UserRecord::new(email, Some(role));
    record.created_at = Some(created_at);
    record
        .fields
        .insert("email".to_string(), Value::String(email.to_string()));
    record
        .fields
        .insert("displayName".to_string(), Value::String("Test User".to_string()));
    record
}

pub fn canonical_user(key: &str, role: &str, uid: Option<&str>) -> UserRecord {
    let mut record = UserRecord::new(key, Some(role));
    record.uid = uid.map(str::to_string);
    record
}

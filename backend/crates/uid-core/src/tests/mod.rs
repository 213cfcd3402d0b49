mod property_tests;

use crate::UserRecord;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

/// Midnight UTC on the given day
pub(crate) fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
}

/// Email-keyed record as written by the account creation flow
pub(crate) fn legacy_user(email: &str, role: &str, created_at: DateTime<Utc>) -> UserRecord {
    let mut record = UserRecord::new(email, Some(role));
    record.created_at = Some(created_at);
    record
        .fields
        .insert("email".to_string(), Value::String(email.to_string()));
    record
}

/// Record already stored under a canonical key
pub(crate) fn canonical_user(key: &str, role: &str, uid: Option<&str>) -> UserRecord {
    let mut record = UserRecord::new(key, Some(role));
    record.uid = uid.map(str::to_string);
    record
}

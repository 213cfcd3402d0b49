use crate::models::new_user::{validate_email, validate_fields};
use crate::{CoreError, Result as CoreErrorResult, UserRecord};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Partial update of a user document. `Value::Null` removes a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub role_id: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.role_id.is_none() && self.fields.is_empty()
    }

    #[track_caller]
    pub fn validate(&self) -> CoreErrorResult<()> {
        if self.is_empty() {
            return Err(CoreError::validation("update contains no changes"));
        }
        if let Some(role_id) = &self.role_id
            && role_id.trim().is_empty()
        {
            return Err(CoreError::validation("roleId cannot be blank"));
        }
        if let Some(Value::String(email)) = self.fields.get("email") {
            validate_email(email)?;
        }
        validate_fields(&self.fields)
    }

    /// Merge into `record`. The storage key and `uid` are never touched.
    pub fn apply(self, record: &mut UserRecord, now: DateTime<Utc>) {
        if let Some(role_id) = self.role_id {
            record.role_id = Some(role_id.trim().to_string());
        }
        for (name, value) in self.fields {
            if value.is_null() {
                record.fields.remove(&name);
            } else {
                record.fields.insert(name, value);
            }
        }
        record.updated_at = Some(now);
    }
}

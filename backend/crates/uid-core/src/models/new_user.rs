use crate::models::RESERVED_FIELDS;
use crate::{CoreError, Result as CoreErrorResult, UserRecord};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const MAX_EMAIL_LENGTH: usize = 254;

/// Input for creating a user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub role_id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl NewUser {
    pub fn new(email: impl Into<String>, role_id: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role_id: role_id.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    #[track_caller]
    pub fn validate(&self) -> CoreErrorResult<()> {
        validate_email(&self.email)?;

        if self.role_id.trim().is_empty() {
            return Err(CoreError::validation("roleId is required"));
        }

        validate_fields(&self.fields)
    }

    /// Build the stored document under its assigned identifier.
    pub fn into_record(self, identifier: String, now: DateTime<Utc>) -> UserRecord {
        let mut fields = self.fields;
        fields.insert(
            "email".to_string(),
            Value::String(self.email.trim().to_lowercase()),
        );

        UserRecord {
            id: identifier.clone(),
            role_id: Some(self.role_id.trim().to_string()),
            uid: Some(identifier),
            created_at: Some(now),
            updated_at: Some(now),
            fields,
        }
    }
}

#[track_caller]
pub(crate) fn validate_email(email: &str) -> CoreErrorResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(CoreError::validation("email is required"));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(CoreError::validation(format!(
            "email must be at most {} characters",
            MAX_EMAIL_LENGTH
        )));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(CoreError::validation(format!("invalid email: {}", email)));
    }

    Ok(())
}

#[track_caller]
pub(crate) fn validate_fields(fields: &Map<String, Value>) -> CoreErrorResult<()> {
    if let Some(reserved) = fields.keys().find(|k| RESERVED_FIELDS.contains(&k.as_str())) {
        return Err(CoreError::validation(format!(
            "field '{}' is managed by the store and cannot be set",
            reserved
        )));
    }
    Ok(())
}

//! User record - one account document in the `users` collection.

use crate::identifier::{is_canonical, is_legacy_key, role_prefix};
use crate::models::timestamp::{lenient_instant, lenient_string};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user document as stored in the record store.
///
/// `id` is the storage key: an email address for legacy records, a canonical
/// identifier once migrated. Fields the engine does not own are kept in
/// `fields` and copied verbatim when a record is re-keyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub role_id: Option<String>,
    /// Denormalized copy of the canonical identifier
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub uid: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl UserRecord {
    pub fn new(id: impl Into<String>, role_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            role_id: role_id.map(str::to_string),
            uid: None,
            created_at: None,
            updated_at: None,
            fields: Map::new(),
        }
    }

    /// Role id, if present and not blank.
    pub fn role(&self) -> Option<&str> {
        self.role_id
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    pub fn prefix(&self) -> String {
        role_prefix(self.role())
    }

    pub fn is_legacy(&self) -> bool {
        is_legacy_key(&self.id)
    }

    /// Storage key parses as a canonical identifier for this record's role.
    pub fn has_canonical_key(&self) -> bool {
        is_canonical(Some(&self.id), self.role())
    }

    pub fn has_canonical_uid(&self) -> bool {
        is_canonical(self.uid.as_deref(), self.role())
    }

    /// Key and `uid` agree and are both canonical.
    pub fn is_fully_migrated(&self) -> bool {
        self.has_canonical_key() && self.uid.as_deref() == Some(self.id.as_str())
    }

    /// Contact email: the `email` field, or the legacy key itself.
    pub fn email(&self) -> Option<&str> {
        match self.fields.get("email") {
            Some(Value::String(email)) => Some(email.as_str()),
            _ if self.is_legacy() => Some(self.id.as_str()),
            _ => None,
        }
    }
}

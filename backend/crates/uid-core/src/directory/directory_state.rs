use crate::UserRecord;

use serde::Serialize;

/// What callers of the user directory observe.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DirectoryState {
    pub users: Vec<UserRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DirectoryState {
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Safe default after a failed read: no records, not loading.
    pub fn failed(error: String) -> Self {
        Self {
            users: Vec::new(),
            loading: false,
            error: Some(error),
        }
    }
}

use crate::UserRecord;

use chrono::{DateTime, Utc};

/// One staged write against the `users` collection.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Insert a new document; fails the batch if the key is taken
    Create(UserRecord),
    /// Insert or overwrite
    Set(UserRecord),
    /// Set `uid` (and `updatedAt`) on an existing document
    UpdateUid {
        key: String,
        uid: String,
        updated_at: DateTime<Utc>,
    },
    Delete { key: String },
}

impl WriteOp {
    pub fn key(&self) -> &str {
        match self {
            Self::Create(record) | Self::Set(record) => &record.id,
            Self::UpdateUid { key, .. } | Self::Delete { key } => key,
        }
    }
}

/// Ordered group of writes committed all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, record: UserRecord) -> &mut Self {
        self.ops.push(WriteOp::Create(record));
        self
    }

    pub fn set(&mut self, record: UserRecord) -> &mut Self {
        self.ops.push(WriteOp::Set(record));
        self
    }

    pub fn update_uid(
        &mut self,
        key: impl Into<String>,
        uid: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> &mut Self {
        self.ops.push(WriteOp::UpdateUid {
            key: key.into(),
            uid: uid.into(),
            updated_at,
        });
        self
    }

    pub fn delete(&mut self, key: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Delete { key: key.into() });
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

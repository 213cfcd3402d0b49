use crate::{DbError, Result as DbErrorResult};

use uid_core::UserRecord;

use error_location::ErrorLocation;

use std::panic::Location;

use chrono::{DateTime, Utc};

pub struct UserRepository;

impl UserRepository {
    pub async fn list<'e, E>(executor: E) -> DbErrorResult<Vec<UserRecord>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query_as::<_, (String, String)>(
            r#"
                SELECT id, document
                FROM users
                ORDER BY id ASC
            "#,
        )
        .fetch_all(executor)
        .await?;

        rows.into_iter()
            .map(|(id, document)| decode(id, &document))
            .collect()
    }

    pub async fn find_by_id<'e, E>(executor: E, key: &str) -> DbErrorResult<Option<UserRecord>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let row = sqlx::query_as::<_, (String, String)>(
            r#"
                SELECT id, document
                FROM users
                WHERE id = ?
            "#,
        )
        .bind(key)
        .fetch_optional(executor)
        .await?;

        row.map(|(id, document)| decode(id, &document)).transpose()
    }

    /// Insert a new document. Fails with `KeyExists` if the key is taken.
    pub async fn insert<'e, E>(executor: E, record: &UserRecord) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let document = encode(record)?;
        let updated_at = updated_at_column(record);

        sqlx::query(
            r#"
                INSERT INTO users (id, document, updated_at)
                VALUES (?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(document)
        .bind(updated_at)
        .execute(executor)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => DbError::KeyExists {
                key: record.id.clone(),
                location: ErrorLocation::from(Location::caller()),
            },
            other => DbError::from(other),
        })?;

        Ok(())
    }

    pub async fn upsert<'e, E>(executor: E, record: &UserRecord) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let document = encode(record)?;
        let updated_at = updated_at_column(record);

        sqlx::query(
            r#"
                INSERT INTO users (id, document, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    document = excluded.document,
                    updated_at = excluded.updated_at
            "#,
        )
        .bind(&record.id)
        .bind(document)
        .bind(updated_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Set `uid` and `updatedAt` inside the stored document.
    pub async fn update_uid<'e, E>(
        executor: E,
        key: &str,
        uid: &str,
        updated_at: DateTime<Utc>,
    ) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let updated_at = updated_at.to_rfc3339();

        let result = sqlx::query(
            r#"
                UPDATE users
                SET document = json_set(document, '$.uid', ?1, '$.updatedAt', ?2),
                    updated_at = ?2
                WHERE id = ?3
            "#,
        )
        .bind(uid)
        .bind(&updated_at)
        .bind(key)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                key: key.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Returns `false` if no document was stored under `key`.
    pub async fn delete<'e, E>(executor: E, key: &str) -> DbErrorResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(key)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[track_caller]
fn decode(id: String, document: &str) -> DbErrorResult<UserRecord> {
    let mut record: UserRecord =
        serde_json::from_str(document).map_err(|source| DbError::Document {
            key: id.clone(),
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;
    // The row key is authoritative
    record.id = id;
    Ok(record)
}

#[track_caller]
fn encode(record: &UserRecord) -> DbErrorResult<String> {
    serde_json::to_string(record).map_err(|source| DbError::Document {
        key: record.id.clone(),
        source,
        location: ErrorLocation::from(Location::caller()),
    })
}

fn updated_at_column(record: &UserRecord) -> String {
    record.updated_at.unwrap_or_else(Utc::now).to_rfc3339()
}

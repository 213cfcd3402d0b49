use crate::Result as DbErrorResult;

use uid_core::{MigrationPass, MigrationState};

use chrono::{DateTime, Utc};

pub struct MigrationStateRepository;

impl MigrationStateRepository {
    /// Missing rows read as pending.
    pub async fn find<'e, E>(executor: E, pass: MigrationPass) -> DbErrorResult<MigrationState>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let row = sqlx::query_as::<_, (i64, Option<String>)>(
            r#"
                SELECT completed, completed_at
                FROM migration_state
                WHERE pass = ?
            "#,
        )
        .bind(pass.as_str())
        .fetch_optional(executor)
        .await?;

        Ok(match row {
            Some((completed, completed_at)) => MigrationState {
                pass,
                completed: completed != 0,
                completed_at: completed_at
                    .as_deref()
                    .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
                    .map(|ts| ts.with_timezone(&Utc)),
            },
            None => MigrationState::pending(pass),
        })
    }

    pub async fn mark_completed<'e, E>(
        executor: E,
        pass: MigrationPass,
        at: DateTime<Utc>,
    ) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                INSERT INTO migration_state (pass, completed, completed_at)
                VALUES (?, 1, ?)
                ON CONFLICT(pass) DO UPDATE SET
                    completed = 1,
                    completed_at = excluded.completed_at
            "#,
        )
        .bind(pass.as_str())
        .bind(at.to_rfc3339())
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn reset<'e, E>(executor: E, pass: MigrationPass) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query("DELETE FROM migration_state WHERE pass = ?")
            .bind(pass.as_str())
            .execute(executor)
            .await?;

        Ok(())
    }
}

use crate::{DbError, Result as DbErrorResult};

use error_location::ErrorLocation;

use std::panic::Location;

pub struct SerialCounterRepository;

impl SerialCounterRepository {
    /// Raise the counter for `prefix` to at least `floor`, then advance it by
    /// `count` in a single statement. Returns the first serial of the block.
    ///
    /// The column is a signed 64-bit integer; a block that would end past
    /// `i64::MAX` is refused with `SerialExhausted` and leaves the row as is.
    pub async fn reserve<'e, E>(
        executor: E,
        prefix: &str,
        floor: u64,
        count: u64,
    ) -> DbErrorResult<u64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let (Ok(floor), Ok(count)) = (i64::try_from(floor), i64::try_from(count)) else {
            return Err(DbError::serial_exhausted(prefix));
        };
        if floor.checked_add(count).is_none() {
            return Err(DbError::serial_exhausted(prefix));
        }

        let last: Option<i64> = sqlx::query_scalar(
            r#"
                INSERT INTO serial_counters (prefix, last_serial)
                VALUES (?1, ?2 + ?3)
                ON CONFLICT(prefix) DO UPDATE SET
                    last_serial = MAX(last_serial, ?2) + ?3
                WHERE MAX(last_serial, ?2) <= ?4 - ?3
                RETURNING last_serial
            "#,
        )
        .bind(prefix)
        .bind(floor)
        .bind(count)
        .bind(i64::MAX)
        .fetch_optional(executor)
        .await?;

        let last = last.ok_or_else(|| DbError::serial_exhausted(prefix))?;
        from_column("serial_counters.last_serial", last - count + 1)
    }

    pub async fn list<'e, E>(executor: E) -> DbErrorResult<Vec<(String, u64)>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT prefix, last_serial FROM serial_counters ORDER BY prefix ASC",
        )
        .fetch_all(executor)
        .await?;

        rows.into_iter()
            .map(|(prefix, last)| Ok((prefix, from_column("serial_counters.last_serial", last)?)))
            .collect()
    }
}

#[track_caller]
fn from_column(column: &'static str, value: i64) -> DbErrorResult<u64> {
    u64::try_from(value).map_err(|_| DbError::OutOfRange {
        column,
        value: value.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}

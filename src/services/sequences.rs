//! Year-scoped document numbers (`MOV-2025-000042` and friends).
//!
//! Numbers come from the `sequence_counters` table, bumped inside the same
//! transaction as the insert that consumes the number. On Postgres the
//! counter row is read `FOR UPDATE`; sqlite serializes writers on its own.

use chrono::{Datelike, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectionTrait, DbBackend, EntityTrait, QuerySelect};

use crate::entities::sequence_counter;
use crate::errors::ServiceError;

pub const MOVEMENT_PREFIX: &str = "MOV";
pub const PUTAWAY_PREFIX: &str = "PUT";
pub const ISSUE_PREFIX: &str = "ISS";
pub const CYCLE_COUNT_PREFIX: &str = "CC";

/// Allocates the next number for `prefix` in the current year.
///
/// Must be called from inside the transaction that inserts the numbered row,
/// otherwise a rollback would leave a gap and a crash could duplicate.
pub async fn next_number<C: ConnectionTrait>(conn: &C, prefix: &str) -> Result<String, ServiceError> {
    let year = Utc::now().year();
    let value = next_value(conn, prefix, year).await?;
    Ok(format_number(prefix, year, value))
}

pub fn format_number(prefix: &str, year: i32, value: i64) -> String {
    format!("{}-{}-{:06}", prefix, year, value)
}

async fn next_value<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    year: i32,
) -> Result<i64, ServiceError> {
    let mut query = sequence_counter::Entity::find_by_id((name.to_string(), year));
    if conn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }

    match query.one(conn).await.map_err(ServiceError::db_error)? {
        Some(counter) => {
            let next = counter.value + 1;
            let mut active: sequence_counter::ActiveModel = counter.into();
            active.value = Set(next);
            active.update(conn).await.map_err(ServiceError::db_error)?;
            Ok(next)
        }
        None => {
            sequence_counter::ActiveModel {
                name: Set(name.to_string()),
                year: Set(year),
                value: Set(1),
            }
            .insert(conn)
            .await
            .map_err(ServiceError::db_error)?;
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_six_digit_sequence() {
        assert_eq!(format_number(MOVEMENT_PREFIX, 2025, 42), "MOV-2025-000042");
        assert_eq!(format_number(ISSUE_PREFIX, 2024, 1), "ISS-2024-000001");
    }

    #[test]
    fn wide_values_are_not_truncated() {
        assert_eq!(format_number(CYCLE_COUNT_PREFIX, 2025, 1_234_567), "CC-2025-1234567");
    }
}

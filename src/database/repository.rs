use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Audience, NewWaitlistEntry};

/// Storage failures, classified from Postgres error codes so callers can
/// match on them instead of probing message strings. Duplicate entries are
/// terminal; availability problems are the only thing worth retrying.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate entry")]
    Duplicate,

    #[error("check constraint violated")]
    CheckViolation,

    #[error("permission denied")]
    PermissionDenied,

    #[error("database unavailable")]
    Unavailable(#[source] sqlx::Error),

    #[error("query failed")]
    Query(#[source] sqlx::Error),
}

const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_CHECK_VIOLATION: &str = "23514";
const PG_NOT_NULL_VIOLATION: &str = "23502";
const PG_INSUFFICIENT_PRIVILEGE: &str = "42501";

fn classify(err: sqlx::Error) -> StoreError {
    let code = match &err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    };

    match code.as_deref() {
        Some(PG_UNIQUE_VIOLATION) => StoreError::Duplicate,
        Some(PG_CHECK_VIOLATION) | Some(PG_NOT_NULL_VIOLATION) => StoreError::CheckViolation,
        Some(PG_INSUFFICIENT_PRIVILEGE) => StoreError::PermissionDenied,
        _ => match err {
            e @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)) => {
                StoreError::Unavailable(e)
            }
            e => StoreError::Query(e),
        },
    }
}

/// A persisted waitlist entry as stored and returned by the API.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub audience: String,
    pub industry: String,
    pub company_size: String,
    pub early_career_hires_per_year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Data access for waitlist entries. Owns nothing but the pool handle;
/// duplicate protection lives in the `(audience, email)` unique index, not
/// in process memory.
pub struct WaitlistRepository {
    pool: PgPool,
}

impl WaitlistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, entry: &NewWaitlistEntry) -> Result<WaitlistEntry, StoreError> {
        sqlx::query_as::<_, WaitlistEntry>(
            "INSERT INTO waitlist_entries \
               (name, email, audience, industry, company_size, early_career_hires_per_year) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, name, email, audience, industry, company_size, \
                       early_career_hires_per_year, created_at",
        )
        .bind(entry.name.as_str())
        .bind(entry.email.as_str())
        .bind(entry.audience.as_str())
        .bind(entry.industry.as_str())
        .bind(entry.company_size.as_str())
        .bind(entry.early_career_hires_per_year.map(|h| h.value()))
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    /// Entry count for one audience.
    pub async fn count(&self, audience: Audience) -> Result<i64, StoreError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM waitlist_entries WHERE audience = $1")
                .bind(audience.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(classify)?;
        Ok(count)
    }

    /// The most recent entries for one audience, newest first.
    pub async fn recent(
        &self,
        audience: Audience,
        limit: i64,
    ) -> Result<Vec<WaitlistEntry>, StoreError> {
        sqlx::query_as::<_, WaitlistEntry>(
            "SELECT id, name, email, audience, industry, company_size, \
                    early_career_hires_per_year, created_at \
             FROM waitlist_entries \
             WHERE audience = $1 \
             ORDER BY created_at DESC \
             LIMIT $2",
        )
        .bind(audience.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_exhaustion_classifies_as_unavailable() {
        assert!(matches!(
            classify(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            classify(sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn other_errors_classify_as_query_failures() {
        assert!(matches!(
            classify(sqlx::Error::RowNotFound),
            StoreError::Query(_)
        ));
    }
}

//! Session persistence: the `SessionStore` port and its SQLite implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::{DbPool, HourBucketRow, HourOfDayRow, SessionRow};
use crate::models::GymSession;
use crate::utils::error::ApiError;
use crate::utils::time::format_timestamp;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: &GymSession) -> Result<(), ApiError>;

    async fn find(&self, session_id: &str) -> Result<Option<GymSession>, ApiError>;

    /// Persist `ended_at`/`duration_sec` only if the row is still open.
    /// Returns `false` when nothing was updated.
    async fn mark_ended(&self, session: &GymSession) -> Result<bool, ApiError>;

    async fn count_by_hour_of_day(&self) -> Result<Vec<HourOfDayRow>, ApiError>;

    async fn count_by_hour_since(&self, since: DateTime<Utc>) -> Result<Vec<HourBucketRow>, ApiError>;
}

pub struct SessionRepository {
    pool: DbPool,
}

impl SessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn insert(&self, session: &GymSession) -> Result<(), ApiError> {
        sqlx::query("INSERT INTO gym_sessions (session_id, started_at) VALUES (?, ?)")
            .bind(&session.session_id)
            .bind(format_timestamp(&session.started_at))
            .execute(self.pool.get_pool())
            .await?;

        Ok(())
    }

    async fn find(&self, session_id: &str) -> Result<Option<GymSession>, ApiError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"SELECT session_id, started_at, ended_at, duration_sec
               FROM gym_sessions
               WHERE session_id = ?"#,
        )
        .bind(session_id)
        .fetch_optional(self.pool.get_pool())
        .await?;

        row.map(GymSession::try_from).transpose()
    }

    async fn mark_ended(&self, session: &GymSession) -> Result<bool, ApiError> {
        let (ended_at, duration_sec) = match (session.ended_at, session.duration_sec) {
            (Some(ended_at), Some(duration_sec)) => (ended_at, duration_sec),
            _ => {
                return Err(ApiError::InternalError(format!(
                    "Session {} has no end time to persist",
                    session.session_id
                )))
            }
        };

        let result = sqlx::query(
            r#"UPDATE gym_sessions
               SET ended_at = ?, duration_sec = ?
               WHERE session_id = ? AND ended_at IS NULL"#,
        )
        .bind(format_timestamp(&ended_at))
        .bind(duration_sec)
        .bind(&session.session_id)
        .execute(self.pool.get_pool())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn count_by_hour_of_day(&self) -> Result<Vec<HourOfDayRow>, ApiError> {
        let rows = sqlx::query_as::<_, HourOfDayRow>(
            r#"SELECT
                CAST(strftime('%H', started_at) AS INTEGER) AS hour,
                COUNT(*) AS starts
               FROM gym_sessions
               WHERE started_at IS NOT NULL
               GROUP BY hour
               ORDER BY hour ASC"#,
        )
        .fetch_all(self.pool.get_pool())
        .await?;

        debug!("Hour-of-day stats: {} buckets", rows.len());

        Ok(rows)
    }

    async fn count_by_hour_since(&self, since: DateTime<Utc>) -> Result<Vec<HourBucketRow>, ApiError> {
        let rows = sqlx::query_as::<_, HourBucketRow>(
            r#"SELECT
                strftime('%Y-%m-%dT%H:00Z', started_at) AS hour,
                COUNT(*) AS starts
               FROM gym_sessions
               WHERE strftime('%Y-%m-%dT%H:%M:%SZ', started_at) >= ?
               GROUP BY hour
               ORDER BY hour ASC"#,
        )
        .bind(format_timestamp(&since))
        .fetch_all(self.pool.get_pool())
        .await?;

        debug!("Recent stats since {}: {} buckets", since, rows.len());

        Ok(rows)
    }
}

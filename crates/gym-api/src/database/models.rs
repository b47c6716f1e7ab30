use serde::Serialize;
use sqlx::FromRow;

use crate::models::GymSession;
use crate::utils::error::ApiError;
use crate::utils::time::parse_timestamp;

/// Raw `gym_sessions` row, timestamps as stored text
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub session_id: String,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub duration_sec: Option<i64>,
}

impl TryFrom<SessionRow> for GymSession {
    type Error = ApiError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let ended_at = row.ended_at.as_deref().map(parse_timestamp).transpose()?;

        Ok(GymSession {
            session_id: row.session_id,
            started_at: parse_timestamp(&row.started_at)?,
            ended_at,
            duration_sec: row.duration_sec,
        })
    }
}

/// All-time starts for one hour of day (0-23)
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct HourOfDayRow {
    pub hour: i64,
    pub starts: i64,
}

/// Starts within one calendar hour, labelled `YYYY-MM-DDTHH:00Z`
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct HourBucketRow {
    pub hour: String,
    pub starts: i64,
}

// ============================================================================
// Gym API - Session Entity
// Description: One gym visit, Open until ended, then Closed for good
// ============================================================================

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::utils::error::ApiError;
use crate::utils::time::truncate_to_seconds;

/// Lifecycle state, derived from `ended_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

/// Gym session entity
///
/// `ended_at` and `duration_sec` are either both `None` or both `Some`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GymSession {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_sec: Option<i64>,
}

impl GymSession {
    /// New open session with a server generated id
    pub fn open(now: DateTime<Utc>) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            started_at: truncate_to_seconds(now),
            ended_at: None,
            duration_sec: None,
        }
    }

    pub fn state(&self) -> SessionState {
        match self.ended_at {
            Some(_) => SessionState::Closed,
            None => SessionState::Open,
        }
    }

    /// Open -> Closed. A second close is rejected, never overwritten.
    pub fn close(&mut self, now: DateTime<Utc>) -> Result<(), ApiError> {
        if self.state() == SessionState::Closed {
            return Err(ApiError::Conflict("Session already ended".to_string()));
        }

        let ended_at = truncate_to_seconds(now);
        self.duration_sec = Some(elapsed_seconds(self.started_at, ended_at));
        self.ended_at = Some(ended_at);
        Ok(())
    }
}

/// Whole seconds between two instants, never negative (clock skew guard)
pub fn elapsed_seconds(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> i64 {
    (ended_at - started_at).num_seconds().max(0)
}

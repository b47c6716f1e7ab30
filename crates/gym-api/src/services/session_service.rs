use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::database::SessionStore;
use crate::models::{GymSession, StatsMode, StatsReport};
use crate::models::stats::HOUR_OF_DAY_MODE;
use crate::utils::error::ApiError;

/// Session lifecycle and stats on top of a `SessionStore`.
///
/// The current time is passed in by the caller.
pub struct SessionService {
    store: Arc<dyn SessionStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn start(&self, now: DateTime<Utc>) -> Result<GymSession, ApiError> {
        let session = GymSession::open(now);
        self.store.insert(&session).await?;

        info!("Session {} started at {}", session.session_id, session.started_at);
        Ok(session)
    }

    pub async fn end(&self, session_id: &str, now: DateTime<Utc>) -> Result<GymSession, ApiError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(ApiError::BadRequest("session_id is required".to_string()));
        }

        let mut session = self
            .store
            .find(session_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

        session.close(now)?;

        // A concurrent end may have closed the row after our read
        if !self.store.mark_ended(&session).await? {
            return Err(ApiError::Conflict("Session already ended".to_string()));
        }

        info!(
            "Session {} ended after {}s",
            session.session_id,
            session.duration_sec.unwrap_or_default()
        );
        Ok(session)
    }

    pub async fn stats(&self, mode: StatsMode, now: DateTime<Utc>) -> Result<StatsReport, ApiError> {
        debug!("Stats query: {:?}", mode);

        match mode {
            StatsMode::HourOfDay => Ok(StatsReport::HourOfDay {
                mode: HOUR_OF_DAY_MODE,
                rows: self.store.count_by_hour_of_day().await?,
            }),
            StatsMode::Recent { hours } => {
                let since = StatsMode::window_start(hours, now);
                Ok(StatsReport::Recent {
                    hours,
                    rows: self.store.count_by_hour_since(since).await?,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::MockSessionStore;
    use crate::database::{HourBucketRow, HourOfDayRow};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 17, 0, 0).unwrap()
    }

    fn open_session(id: &str) -> GymSession {
        GymSession {
            session_id: id.to_string(),
            started_at: t0(),
            ended_at: None,
            duration_sec: None,
        }
    }

    #[tokio::test]
    async fn test_start_persists_new_session() {
        let mut store = MockSessionStore::new();
        store
            .expect_insert()
            .withf(|s: &GymSession| s.ended_at.is_none() && s.started_at == t0())
            .times(1)
            .returning(|_| Ok(()));

        let service = SessionService::new(Arc::new(store));
        let session = service.start(t0()).await.unwrap();

        assert_eq!(session.started_at, t0());
        assert!(!session.session_id.is_empty());
    }

    #[tokio::test]
    async fn test_start_propagates_storage_fault() {
        let mut store = MockSessionStore::new();
        store
            .expect_insert()
            .returning(|_| Err(ApiError::DatabaseError("database is locked".into())));

        let service = SessionService::new(Arc::new(store));
        let err = service.start(t0()).await.unwrap_err();
        assert!(matches!(err, ApiError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_end_computes_duration() {
        let mut store = MockSessionStore::new();
        store
            .expect_find()
            .withf(|id: &str| id == "abc")
            .returning(|_| Ok(Some(open_session("abc"))));
        store
            .expect_mark_ended()
            .withf(|s: &GymSession| s.duration_sec == Some(125))
            .times(1)
            .returning(|_| Ok(true));

        let service = SessionService::new(Arc::new(store));
        let session = service
            .end("  abc ", t0() + Duration::seconds(125))
            .await
            .unwrap();

        assert_eq!(session.duration_sec, Some(125));
        assert_eq!(session.ended_at, Some(t0() + Duration::seconds(125)));
    }

    #[tokio::test]
    async fn test_end_blank_id_is_bad_request() {
        let store = MockSessionStore::new();
        let service = SessionService::new(Arc::new(store));

        let err = service.end("   ", t0()).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref msg) if msg == "session_id is required"));
    }

    #[tokio::test]
    async fn test_end_unknown_id_is_not_found() {
        let mut store = MockSessionStore::new();
        store.expect_find().returning(|_| Ok(None));
        store.expect_mark_ended().times(0);

        let service = SessionService::new(Arc::new(store));
        let err = service.end("nope", t0()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg == "Session not found"));
    }

    #[tokio::test]
    async fn test_end_closed_session_is_conflict() {
        let mut store = MockSessionStore::new();
        store.expect_find().returning(|_| {
            let mut session = open_session("abc");
            session.ended_at = Some(t0() + Duration::seconds(5));
            session.duration_sec = Some(5);
            Ok(Some(session))
        });
        store.expect_mark_ended().times(0);

        let service = SessionService::new(Arc::new(store));
        let err = service.end("abc", t0() + Duration::seconds(60)).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(ref msg) if msg == "Session already ended"));
    }

    #[tokio::test]
    async fn test_end_lost_race_is_conflict() {
        let mut store = MockSessionStore::new();
        store
            .expect_find()
            .returning(|_| Ok(Some(open_session("abc"))));
        store.expect_mark_ended().returning(|_| Ok(false));

        let service = SessionService::new(Arc::new(store));
        let err = service.end("abc", t0() + Duration::seconds(60)).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_stats_hour_of_day() {
        let mut store = MockSessionStore::new();
        store
            .expect_count_by_hour_of_day()
            .returning(|| Ok(vec![HourOfDayRow { hour: 6, starts: 3 }]));
        store.expect_count_by_hour_since().times(0);

        let service = SessionService::new(Arc::new(store));
        let report = service.stats(StatsMode::HourOfDay, t0()).await.unwrap();

        assert_eq!(
            report,
            StatsReport::HourOfDay {
                mode: "hour_of_day",
                rows: vec![HourOfDayRow { hour: 6, starts: 3 }],
            }
        );
    }

    #[tokio::test]
    async fn test_stats_recent_uses_window() {
        let mut store = MockSessionStore::new();
        store
            .expect_count_by_hour_since()
            .withf(|since: &DateTime<Utc>| *since == t0() - Duration::hours(6))
            .returning(|_| {
                Ok(vec![HourBucketRow {
                    hour: "2026-04-01T15:00Z".to_string(),
                    starts: 2,
                }])
            });

        let service = SessionService::new(Arc::new(store));
        let report = service
            .stats(StatsMode::Recent { hours: 6 }, t0())
            .await
            .unwrap();

        match report {
            StatsReport::Recent { hours, rows } => {
                assert_eq!(hours, 6);
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].starts, 2);
            }
            other => panic!("unexpected report: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_lifecycle_against_sqlite() {
        use crate::database::pool::in_memory;
        use crate::database::SessionRepository;

        let service = SessionService::new(Arc::new(SessionRepository::new(in_memory().await)));

        let session = service.start(t0()).await.unwrap();
        let ended = service
            .end(&session.session_id, t0() + Duration::seconds(125))
            .await
            .unwrap();
        assert_eq!(ended.duration_sec, Some(125));

        let err = service
            .end(&session.session_id, t0() + Duration::seconds(300))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(ref msg) if msg == "Session already ended"));

        let report = service.stats(StatsMode::HourOfDay, t0()).await.unwrap();
        assert_eq!(
            report,
            StatsReport::HourOfDay {
                mode: "hour_of_day",
                rows: vec![HourOfDayRow { hour: 17, starts: 1 }],
            }
        );
    }
}

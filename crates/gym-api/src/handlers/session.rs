use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::services::SessionService;
use crate::utils::error::ApiError;
use crate::utils::response::ApiResponse;
use crate::utils::time::format_timestamp;

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub started_at: String,
}

#[derive(Debug, Serialize)]
pub struct EndSessionResponse {
    pub session_id: String,
    pub ended_at: String,
    pub duration_sec: i64,
}

/// POST /start
pub async fn start_session(
    State(service): State<Arc<SessionService>>,
) -> Result<Json<ApiResponse<StartSessionResponse>>, ApiError> {
    let session = service.start(Utc::now()).await?;

    Ok(Json(ApiResponse::success(StartSessionResponse {
        started_at: format_timestamp(&session.started_at),
        session_id: session.session_id,
    })))
}

/// POST /end, body `{ "session_id": "..." }`
///
/// The body is parsed by hand so a missing `Content-Type` is not an error.
pub async fn end_session(
    State(service): State<Arc<SessionService>>,
    body: Bytes,
) -> Result<Json<ApiResponse<EndSessionResponse>>, ApiError> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Expected JSON body".to_string()))?;

    let session_id = payload
        .get("session_id")
        .and_then(Value::as_str)
        .unwrap_or("");

    let session = service.end(session_id, Utc::now()).await?;

    let (ended_at, duration_sec) = match (session.ended_at, session.duration_sec) {
        (Some(ended_at), Some(duration_sec)) => (ended_at, duration_sec),
        _ => {
            return Err(ApiError::InternalError(format!(
                "Session {} closed without an end time",
                session.session_id
            )))
        }
    };

    Ok(Json(ApiResponse::success(EndSessionResponse {
        session_id: session.session_id,
        ended_at: format_timestamp(&ended_at),
        duration_sec,
    })))
}

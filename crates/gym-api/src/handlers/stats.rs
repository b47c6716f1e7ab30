use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{StatsMode, StatsReport};
use crate::services::SessionService;
use crate::utils::error::ApiError;
use crate::utils::response::ApiResponse;

/// Raw query string; values are validated by `StatsMode::from_params`
#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    pub mode: Option<String>,
    pub hours: Option<String>,
}

/// GET /stats?mode=hour_of_day | GET /stats?hours=N
pub async fn stats_handler(
    State(service): State<Arc<SessionService>>,
    Query(params): Query<StatsParams>,
) -> Result<Json<ApiResponse<StatsReport>>, ApiError> {
    let mode = StatsMode::from_params(params.mode.as_deref(), params.hours.as_deref());
    let report = service.stats(mode, Utc::now()).await?;

    Ok(Json(ApiResponse::success(report)))
}

use axum::Json;
use serde::Serialize;

use crate::utils::response::ApiResponse;

#[derive(Serialize)]
pub struct HealthResponse {
    service: &'static str,
}

pub async fn health_check() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse { service: "gym-api" }))
}

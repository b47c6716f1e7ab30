use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;
use crate::state::AppState;

const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    // Wrong method on a known path is a 404 too, not a 405
    Router::new()
        .route(
            "/health",
            get(handlers::health::health_check).fallback(handlers::fallback::not_found),
        )
        .route(
            "/start",
            post(handlers::session::start_session).fallback(handlers::fallback::not_found),
        )
        .route(
            "/end",
            post(handlers::session::end_session).fallback(handlers::fallback::not_found),
        )
        .route(
            "/stats",
            get(handlers::stats::stats_handler).fallback(handlers::fallback::not_found),
        )
        .fallback(handlers::fallback::not_found)
        .with_state(state)
        // CORS, also answers every OPTIONS request with an empty 200
        .layer(cors_layer())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // Tracing
        .layer(TraceLayer::new_for_http())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

use axum::extract::FromRef;
use std::sync::Arc;

use crate::database::{DbPool, SessionRepository};
use crate::services::SessionService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
}

impl AppState {
    pub fn new(db_pool: DbPool) -> Self {
        let repository = Arc::new(SessionRepository::new(db_pool));
        Self {
            session_service: Arc::new(SessionService::new(repository)),
        }
    }
}

impl FromRef<AppState> for Arc<SessionService> {
    fn from_ref(state: &AppState) -> Self {
        state.session_service.clone()
    }
}

//! Router assembly and service-level endpoints

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};

use crate::{handlers::schedules, AppState};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route(
            "/schedules",
            get(schedules::handle_list_schedules).post(schedules::handle_submit_assignment),
        )
        .route("/schedules/:id", get(schedules::handle_get_schedule))
}

async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "app": state.app_name,
        "version": state.version,
        "endpoints": {
            "health": "/health",
            "schedules": "/schedules",
            "schedule": "/schedules/{id}"
        }
    }))
}

async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "roster": state.store.stats(),
    }))
}

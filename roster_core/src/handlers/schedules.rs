//! Schedule pages and the role-assignment submission endpoint

use axum::{
    extract::{Form, Path, State},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    error::Result,
    models::SubmitResponse,
    validation::AssignmentForm,
    AppState,
};

pub async fn handle_list_schedules(State(state): State<AppState>) -> impl IntoResponse {
    let schedules = state.store.list_schedules();
    let count = schedules.len();
    Json(serde_json::json!({
        "schedules": schedules,
        "count": count,
    }))
}

pub async fn handle_get_schedule(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse> {
    let view = state.store.schedule_view(id)?;
    Ok(Json(view))
}

/// Target of the submission bridge. Accepts the URL-encoded modal form,
/// validates it, records the assignment, and answers with the
/// success/validation-error contract the bridge decodes.
pub async fn handle_submit_assignment(
    State(state): State<AppState>,
    Form(form): Form<AssignmentForm>,
) -> Result<impl IntoResponse> {
    info!(
        schedule = %form.schedule,
        role = %form.role,
        person = %form.person,
        "POST /schedules - role assignment submitted"
    );

    let request = form.parse()?;
    state.store.create_assignment(request)?;

    Ok(Json(SubmitResponse::saved("Role assigned successfully.")))
}

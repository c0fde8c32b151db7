//! Health check endpoint

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    clinics: usize,
    departments_loaded: bool,
}

/// GET /health - Report whether the clinic dataset is loaded
///
/// An empty dataset still serves requests but every search fails, so it is
/// reported as degraded with 503.
pub async fn check(State(state): State<AppState>) -> impl IntoResponse {
    let clinics = state.table.len();
    let departments_loaded = state.reference.departments.loaded().is_some();

    let (status, label) = if clinics > 0 {
        (StatusCode::OK, "healthy")
    } else {
        tracing::warn!("Health check: clinic dataset is empty");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            clinics,
            departments_loaded,
        }),
    )
}

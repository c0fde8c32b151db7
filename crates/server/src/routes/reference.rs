//! Static reference data endpoints

use axum::{Json, extract::State};
use clinic_core::ReferenceFile;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::AppError;
use crate::state::AppState;

fn serve<T: Serialize + Clone>(file: &ReferenceFile<T>, what: &str) -> Result<Json<T>, AppError> {
    match file {
        ReferenceFile::Loaded(value) => Ok(Json(value.clone())),
        ReferenceFile::Missing(path) => Err(AppError::NotFound(format!(
            "{} file not found ({})",
            what,
            path.display()
        ))),
        ReferenceFile::Invalid(message) => Err(AppError::Internal(message.clone())),
    }
}

/// GET /api/departments - Known department names
pub async fn departments(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    serve(&state.reference.departments, "Department list")
}

/// GET /api/districts - Administrative district tree
pub async fn districts(State(state): State<AppState>) -> Result<Json<JsonValue>, AppError> {
    serve(&state.reference.districts, "District list")
}

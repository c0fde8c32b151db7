pub mod clinics;
pub mod geocode;
pub mod health;
pub mod metrics;
pub mod reference;
pub mod suggest;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Clinic search routes
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(clinics::search))
        .route("/search/nearby", get(clinics::nearby))
}

/// Lookup and suggestion routes under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/departments", get(reference::departments))
        .route("/districts", get(reference::districts))
        .route("/geocode", get(geocode::geocode))
        .route("/suggest-department", post(suggest::suggest_department))
}

//! Clinic search handlers

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use clinic_core::{ClinicSummary, NearbyQuery, SearchQuery};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

/// Query parameters for area search
#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    pub city: Option<String>,
    pub district: Option<String>,
    pub department: Option<String>,
}

/// Query parameters for radius search. Numbers arrive as text so that
/// malformed values get our own error message.
#[derive(Debug, Deserialize, Default)]
pub struct NearbyParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub radius: Option<String>,
    pub department: Option<String>,
}

/// GET /search - Clinics in a city/district offering a department
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<ClinicSummary>>, AppError> {
    let Query(params) = params?;
    let query = SearchQuery::new(
        params.city.unwrap_or_default(),
        params.district.unwrap_or_default(),
        params.department.unwrap_or_default(),
    );

    let clinics = clinic_core::search(&state.table, &query)?;

    tracing::info!(
        area = %format!("{}{}", query.city, query.district),
        department = %query.department,
        found = clinics.len(),
        "Clinic search"
    );

    Ok(Json(clinics))
}

/// GET /search/nearby - Clinics within a radius offering a department
pub async fn nearby(
    State(state): State<AppState>,
    params: Result<Query<NearbyParams>, QueryRejection>,
) -> Result<Json<Vec<ClinicSummary>>, AppError> {
    let Query(params) = params?;
    let query = NearbyQuery::parse(
        params.lat.as_deref(),
        params.lon.as_deref(),
        params.radius.as_deref(),
        params.department.as_deref(),
    )?;

    let clinics = clinic_core::search_nearby(&state.table, &query)?;

    tracing::info!(
        lat = query.center.lat,
        lon = query.center.lon,
        radius_km = query.radius_km,
        department = %query.department,
        found = clinics.len(),
        "Nearby clinic search"
    );

    Ok(Json(clinics))
}

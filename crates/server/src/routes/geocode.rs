//! Address geocoding endpoint

use axum::{
    Extension, Json,
    extract::{Query, rejection::QueryRejection},
};
use serde::Deserialize;

use crate::error::AppError;
use crate::geocode::{GeocodeClient, GeocodeOutcome, LatLng};

/// Message shown for any collaborator failure; details stay in the log
const GEOCODE_UNAVAILABLE: &str =
    "Geocoding service is temporarily unavailable, please try again later.";

#[derive(Debug, Deserialize)]
pub struct GeocodeParams {
    address: Option<String>,
}

/// GET /api/geocode - Resolve an address to `{lat, lng}`
pub async fn geocode(
    Extension(client): Extension<Option<GeocodeClient>>,
    params: Result<Query<GeocodeParams>, QueryRejection>,
) -> Result<Json<LatLng>, AppError> {
    let Query(params) = params?;
    let address = params.address.unwrap_or_default();
    let address = address.trim();
    if address.is_empty() {
        return Err(AppError::BadRequest(
            "Missing required parameter: address".to_string(),
        ));
    }

    let client = client.ok_or_else(|| {
        tracing::warn!("Geocoding requested but no API key is configured");
        AppError::Internal(GEOCODE_UNAVAILABLE.to_string())
    })?;

    match client.geocode(address).await {
        Ok(GeocodeOutcome::Found(location)) => Ok(Json(location)),
        Ok(GeocodeOutcome::Unresolved(status)) => {
            tracing::info!(address = %address, status = %status, "Address could not be resolved");
            Err(AppError::NotFound(format!(
                "Could not resolve address: {}",
                status
            )))
        }
        Err(e) => {
            tracing::error!(error = %e, "Geocoding API call failed");
            Err(AppError::Internal(GEOCODE_UNAVAILABLE.to_string()))
        }
    }
}

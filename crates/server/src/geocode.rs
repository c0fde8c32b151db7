//! Google Geocoding API client (address to coordinate)

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const GEOCODE_API_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const LANGUAGE: &str = "zh-TW";

/// Coordinate as returned to the frontend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Result of a geocoding lookup that reached the API
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Found(LatLng),
    /// The API answered with a non-OK status such as `ZERO_RESULTS`
    Unresolved(String),
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Geocoding response had status OK but no results")]
    EmptyResults,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

impl GeocodeResponse {
    fn into_outcome(self) -> Result<GeocodeOutcome, GeocodeError> {
        if self.status != "OK" {
            return Ok(GeocodeOutcome::Unresolved(self.status));
        }
        self.results
            .into_iter()
            .next()
            .map(|r| GeocodeOutcome::Found(r.geometry.location))
            .ok_or(GeocodeError::EmptyResults)
    }
}

/// Client for the Google Geocoding API
#[derive(Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    api_key: String,
}

impl GeocodeClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, api_key })
    }

    /// Resolve a free-text address
    pub async fn geocode(&self, address: &str) -> Result<GeocodeOutcome, GeocodeError> {
        let response = self
            .http
            .get(GEOCODE_API_URL)
            .query(&[
                ("address", address),
                ("key", self.api_key.as_str()),
                ("language", LANGUAGE),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<GeocodeResponse>()
            .await?;

        response.into_outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> Result<GeocodeOutcome, GeocodeError> {
        serde_json::from_value::<GeocodeResponse>(json)
            .unwrap()
            .into_outcome()
    }

    #[test]
    fn ok_status_returns_first_location() {
        let outcome = parse(serde_json::json!({
            "status": "OK",
            "results": [
                {"geometry": {"location": {"lat": 25.1321, "lng": 121.501}}},
                {"geometry": {"location": {"lat": 0.0, "lng": 0.0}}}
            ]
        }))
        .unwrap();
        assert_eq!(
            outcome,
            GeocodeOutcome::Found(LatLng {
                lat: 25.1321,
                lng: 121.501
            })
        );
    }

    #[test]
    fn other_status_is_unresolved() {
        let outcome = parse(serde_json::json!({"status": "ZERO_RESULTS", "results": []})).unwrap();
        assert_eq!(outcome, GeocodeOutcome::Unresolved("ZERO_RESULTS".to_string()));
    }

    #[test]
    fn ok_without_results_is_an_error() {
        let err = parse(serde_json::json!({"status": "OK"})).unwrap_err();
        assert!(matches!(err, GeocodeError::EmptyResults));
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Placeholder used when a clinic has no address on file
pub const ADDRESS_PLACEHOLDER: &str = "address not provided";

/// Placeholder used when a clinic has no phone number on file
pub const PHONE_PLACEHOLDER: &str = "phone not provided";

/// One row of the clinic dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClinicRecord {
    /// Institution code, kept as text so leading zeros survive
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    /// Compound label such as `臺北市北投區`
    pub city_district: String,
    /// Comma-delimited department list, matched by substring
    pub departments: String,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Practitioner counts keyed by department column header
    pub practitioners: BTreeMap<String, u32>,
}

impl ClinicRecord {
    /// The record's position, if both coordinates are known
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }

    pub fn offers(&self, department: &str) -> bool {
        self.departments.contains(department)
    }

    /// Project into the public response shape.
    ///
    /// Returns `None` for records without coordinates, since every listing
    /// exposes latitude and longitude.
    pub fn summary(&self) -> Option<ClinicSummary> {
        let coordinate = self.coordinate()?;
        Some(ClinicSummary {
            name: self.name.clone(),
            address: or_placeholder(self.address.as_deref(), ADDRESS_PLACEHOLDER),
            city_district: self.city_district.clone(),
            phone: or_placeholder(self.phone.as_deref(), PHONE_PLACEHOLDER),
            latitude: coordinate.lat,
            longitude: coordinate.lon,
        })
    }
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => placeholder.to_string(),
    }
}

/// Clinic projection returned by the search endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicSummary {
    pub name: String,
    pub address: String,
    pub city_district: String,
    pub phone: String,
    pub latitude: f64,
    pub longitude: f64,
}

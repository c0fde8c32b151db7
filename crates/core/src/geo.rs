//! Great-circle distance

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_km(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Haversine distance between two points given in degrees, in kilometres
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TOLERANCE: f64 = 1e-9;

    #[rstest]
    #[case(25.0, 121.5)]
    #[case(0.0, 0.0)]
    #[case(-33.87, 151.21)]
    fn distance_to_self_is_zero(#[case] lat: f64, #[case] lon: f64) {
        assert_eq!(haversine_km(lat, lon, lat, lon), 0.0);
    }

    #[rstest]
    #[case((25.0330, 121.5654), (25.1320, 121.4990))]
    #[case((51.5074, -0.1278), (40.7128, -74.0060))]
    #[case((-33.87, 151.21), (35.68, 139.69))]
    fn distance_is_symmetric(#[case] a: (f64, f64), #[case] b: (f64, f64)) {
        let ab = haversine_km(a.0, a.1, b.0, b.1);
        let ba = haversine_km(b.0, b.1, a.0, a.1);
        assert!((ab - ba).abs() < TOLERANCE, "{ab} != {ba}");
    }

    #[test]
    fn one_degree_of_latitude() {
        // 2 * pi * R / 360
        let expected = 111.194_926_644_558_73;
        let d = haversine_km(0.0, 0.0, 1.0, 0.0);
        assert!((d - expected).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn london_to_new_york() {
        let d = Coordinate::new(51.5074, -0.1278).distance_km(&Coordinate::new(40.7128, -74.0060));
        assert!((d - 5570.2).abs() < 1.0, "got {d}");
    }
}

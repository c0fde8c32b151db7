//! Address and radius search over the clinic table

use crate::error::QueryError;
use crate::geo::Coordinate;
use crate::record::{ClinicRecord, ClinicSummary};
use crate::table::ClinicTable;

/// Maximum number of clinics returned by a single search
pub const MAX_RESULTS: usize = 100;

/// Radius used when the caller does not give one
pub const DEFAULT_RADIUS_KM: f64 = 1.0;

/// Search by administrative area and department
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub city: String,
    pub district: String,
    pub department: String,
}

impl SearchQuery {
    pub fn new(
        city: impl Into<String>,
        district: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            district: district.into(),
            department: department.into(),
        }
    }

    fn validate(&self) -> Result<(), QueryError> {
        if self.city.is_empty() {
            return Err(QueryError::MissingField("city"));
        }
        if self.department.is_empty() {
            return Err(QueryError::MissingField("department"));
        }
        Ok(())
    }
}

/// Search around a coordinate
#[derive(Debug, Clone)]
pub struct NearbyQuery {
    pub center: Coordinate,
    pub radius_km: f64,
    pub department: String,
}

impl NearbyQuery {
    /// Build a query from raw request parameters.
    ///
    /// Numeric problems are reported before a missing department.
    pub fn parse(
        lat: Option<&str>,
        lon: Option<&str>,
        radius: Option<&str>,
        department: Option<&str>,
    ) -> Result<Self, QueryError> {
        let lat = parse_number("lat", lat)?;
        let lon = parse_number("lon", lon)?;
        let radius_km = match radius {
            Some(raw) => parse_number("radius", Some(raw))?,
            None => DEFAULT_RADIUS_KM,
        };

        let department = department.unwrap_or_default();
        if department.is_empty() {
            return Err(QueryError::MissingField("department"));
        }

        Ok(Self {
            center: Coordinate::new(lat, lon),
            radius_km,
            department: department.to_string(),
        })
    }
}

fn parse_number(field: &'static str, raw: Option<&str>) -> Result<f64, QueryError> {
    let raw = raw.unwrap_or_default();
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| QueryError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Clinics whose area label starts with `city + district` and whose
/// department list contains `department`, in dataset order.
pub fn search(table: &ClinicTable, query: &SearchQuery) -> Result<Vec<ClinicSummary>, QueryError> {
    if table.is_empty() {
        return Err(QueryError::DatasetUnavailable);
    }
    query.validate()?;

    let prefix = format!("{}{}", query.city, query.district);
    let matches = table
        .records()
        .iter()
        .filter(|r| r.city_district.starts_with(&prefix))
        .filter(|r| r.offers(&query.department));

    Ok(project(matches))
}

/// Clinics within `radius_km` of the query centre that offer `department`.
///
/// Results keep dataset order rather than being sorted by distance.
pub fn search_nearby(
    table: &ClinicTable,
    query: &NearbyQuery,
) -> Result<Vec<ClinicSummary>, QueryError> {
    if table.is_empty() {
        return Err(QueryError::DatasetUnavailable);
    }

    let matches = table
        .records()
        .iter()
        .filter(|r| {
            r.coordinate()
                .is_some_and(|c| query.center.distance_km(&c) <= query.radius_km)
        })
        .filter(|r| r.offers(&query.department));

    Ok(project(matches))
}

fn project<'a>(records: impl Iterator<Item = &'a ClinicRecord>) -> Vec<ClinicSummary> {
    records
        .filter_map(ClinicRecord::summary)
        .take(MAX_RESULTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::haversine_km;
    use rstest::rstest;

    fn clinic(name: &str, area: &str, departments: &str, coord: Option<(f64, f64)>) -> ClinicRecord {
        ClinicRecord {
            name: name.to_string(),
            city_district: area.to_string(),
            departments: departments.to_string(),
            latitude: coord.map(|c| c.0),
            longitude: coord.map(|c| c.1),
            ..Default::default()
        }
    }

    fn table() -> ClinicTable {
        ClinicTable::from_records(vec![
            clinic("A", "台北市大安區", "牙醫一般科", Some((25.026, 121.543))),
            clinic("B", "台北市中正區", "內科,家醫科", Some((25.001, 121.501))),
            clinic("C", "新北市板橋區", "牙醫一般科", Some((25.011, 121.462))),
            clinic("D", "台北市大安區", "牙醫一般科", None),
            clinic("E", "台北市北投區", "齒顎矯正科,牙科", Some((25.132, 121.501))),
            clinic("F", "台北市中正區", "內科", Some((25.030, 121.520))),
        ])
    }

    fn names(results: &[ClinicSummary]) -> Vec<&str> {
        results.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn search_by_city_and_department_substring() {
        let results = search(&table(), &SearchQuery::new("台北市", "", "牙")).unwrap();
        assert_eq!(names(&results), vec!["A", "E"]);
        assert!(results.iter().all(|r| r.city_district.starts_with("台北市")));
    }

    #[test]
    fn search_uses_city_and_district_as_prefix() {
        let results = search(&table(), &SearchQuery::new("台北市", "中正區", "內科")).unwrap();
        assert_eq!(names(&results), vec!["B", "F"]);
    }

    #[test]
    fn prefix_match_is_exact_text() {
        let results = search(&table(), &SearchQuery::new("臺北市", "", "牙")).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn search_drops_rows_without_coordinates() {
        let results = search(&table(), &SearchQuery::new("台北市", "大安區", "牙")).unwrap();
        assert_eq!(names(&results), vec!["A"]);
    }

    #[rstest]
    #[case(SearchQuery::new("", "中正區", "內科"), "city")]
    #[case(SearchQuery::new("台北市", "", ""), "department")]
    fn search_requires_city_and_department(#[case] query: SearchQuery, #[case] field: &'static str) {
        let err = search(&table(), &query).unwrap_err();
        assert_eq!(err, QueryError::MissingField(field));
    }

    #[test]
    fn search_on_empty_dataset_is_an_error() {
        let err = search(&ClinicTable::default(), &SearchQuery::new("台北市", "", "牙")).unwrap_err();
        assert_eq!(err, QueryError::DatasetUnavailable);
    }

    #[test]
    fn search_caps_results_and_keeps_order() {
        let records = (0..150)
            .map(|i| clinic(&format!("C{i}"), "台北市大安區", "內科", Some((25.0, 121.5))))
            .collect();
        let results = search(&ClinicTable::from_records(records), &SearchQuery::new("台北市", "", "內科")).unwrap();
        assert_eq!(results.len(), MAX_RESULTS);
        assert_eq!(results[0].name, "C0");
        assert_eq!(results[99].name, "C99");
    }

    #[test]
    fn nearby_excludes_rows_outside_radius() {
        let query = NearbyQuery::parse(Some("25.0"), Some("121.5"), Some("1"), Some("內科")).unwrap();
        let results = search_nearby(&table(), &query).unwrap();
        assert_eq!(names(&results), vec!["B"]);
        for r in &results {
            assert!(haversine_km(25.0, 121.5, r.latitude, r.longitude) <= 1.0);
        }
    }

    #[test]
    fn nearby_with_wider_radius_keeps_dataset_order() {
        let query = NearbyQuery::parse(Some("25.0"), Some("121.5"), Some("5"), Some("內科")).unwrap();
        let results = search_nearby(&table(), &query).unwrap();
        assert_eq!(names(&results), vec!["B", "F"]);
    }

    #[test]
    fn nearby_never_returns_rows_without_coordinates() {
        let query = NearbyQuery::parse(Some("25.026"), Some("121.543"), Some("50"), Some("牙")).unwrap();
        let results = search_nearby(&table(), &query).unwrap();
        assert_eq!(names(&results), vec!["A", "C", "E"]);
    }

    #[test]
    fn radius_defaults_to_one_km() {
        let query = NearbyQuery::parse(Some("25.0"), Some("121.5"), None, Some("內科")).unwrap();
        assert_eq!(query.radius_km, DEFAULT_RADIUS_KM);
    }

    #[rstest]
    #[case(Some("abc"), Some("121.5"), None, "lat")]
    #[case(None, Some("121.5"), None, "lat")]
    #[case(Some("25.0"), Some(""), None, "lon")]
    #[case(Some("25.0"), Some("121.5"), Some("far"), "radius")]
    #[case(Some("NaN"), Some("121.5"), None, "lat")]
    #[case(Some("25.0"), Some("inf"), None, "lon")]
    fn nearby_rejects_malformed_numbers(
        #[case] lat: Option<&str>,
        #[case] lon: Option<&str>,
        #[case] radius: Option<&str>,
        #[case] field: &str,
    ) {
        match NearbyQuery::parse(lat, lon, radius, Some("內科")) {
            Err(QueryError::InvalidNumber { field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected invalid number, got {other:?}"),
        }
    }

    #[test]
    fn nearby_requires_department() {
        let err = NearbyQuery::parse(Some("25.0"), Some("121.5"), None, None).unwrap_err();
        assert_eq!(err, QueryError::MissingField("department"));
    }

    #[test]
    fn nearby_accepts_padded_numbers() {
        let query = NearbyQuery::parse(Some(" 25.0 "), Some("121.5"), Some(" 2 "), Some("內科")).unwrap();
        assert_eq!(query.center, Coordinate::new(25.0, 121.5));
        assert_eq!(query.radius_km, 2.0);
    }
}

//! In-memory clinic dataset loaded from the geocoded CSV export

use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::Path;

use csv::StringRecord;

use crate::error::LoadError;
use crate::record::ClinicRecord;

const COL_CODE: &str = "機構代碼";
const COL_NAME: &str = "機構名稱";
const COL_ADDRESS: &str = "地址";
const COL_CITY_DISTRICT: &str = "縣市區名";
const COL_PHONE: &str = "電話";
const COL_DEPARTMENTS: &str = "科別";
const COL_LATITUDE: &str = "latitude";
const COL_LONGITUDE: &str = "longitude";

const KNOWN_COLUMNS: [&str; 8] = [
    COL_CODE,
    COL_NAME,
    COL_ADDRESS,
    COL_CITY_DISTRICT,
    COL_PHONE,
    COL_DEPARTMENTS,
    COL_LATITUDE,
    COL_LONGITUDE,
];

/// Read-only clinic table, shared by every request
#[derive(Debug, Clone, Default)]
pub struct ClinicTable {
    records: Vec<ClinicRecord>,
}

impl ClinicTable {
    pub fn from_records(records: Vec<ClinicRecord>) -> Self {
        Self { records }
    }

    /// Load the dataset, failing on any I/O or format problem
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load the dataset, degrading to an empty table on failure.
    ///
    /// The service keeps running with no clinics; every search then reports
    /// the dataset as unavailable.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(table) => {
                tracing::info!(path = %path.display(), clinics = table.len(), "Loaded clinic dataset");
                table
            }
            Err(LoadError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Clinic dataset not found, serving an empty dataset");
                Self::default()
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to load clinic dataset, serving an empty dataset");
                Self::default()
            }
        }
    }

    /// Parse CSV data with a header row
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let columns = Columns::resolve(&headers)?;

        let mut records = Vec::new();
        for row in reader.records() {
            records.push(columns.record(&row?));
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[ClinicRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct department names across all rows, in first-seen order
    pub fn department_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for record in &self.records {
            for department in record.departments.split(',').map(str::trim) {
                if !department.is_empty() && seen.insert(department) {
                    names.push(department.to_string());
                }
            }
        }
        names
    }
}

/// Column positions resolved from the header row
struct Columns {
    code: Option<usize>,
    name: usize,
    address: Option<usize>,
    city_district: usize,
    phone: Option<usize>,
    departments: usize,
    latitude: usize,
    longitude: usize,
    practitioners: Vec<(usize, String)>,
}

impl Columns {
    fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &'static str| find(name).ok_or(LoadError::MissingColumn(name));

        let practitioners = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.is_empty() && !KNOWN_COLUMNS.contains(&h.as_str()))
            .map(|(i, h)| (i, h.clone()))
            .collect();

        Ok(Self {
            code: find(COL_CODE),
            name: require(COL_NAME)?,
            address: find(COL_ADDRESS),
            city_district: require(COL_CITY_DISTRICT)?,
            phone: find(COL_PHONE),
            departments: require(COL_DEPARTMENTS)?,
            latitude: require(COL_LATITUDE)?,
            longitude: require(COL_LONGITUDE)?,
            practitioners,
        })
    }

    fn record(&self, row: &StringRecord) -> ClinicRecord {
        let text = |idx: usize| row.get(idx).map(str::trim).unwrap_or_default().to_string();
        let optional = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let mut practitioners = BTreeMap::new();
        for (idx, header) in &self.practitioners {
            if let Some(count) = row.get(*idx).and_then(parse_count) {
                practitioners.insert(header.clone(), count);
            }
        }

        ClinicRecord {
            code: optional(self.code).unwrap_or_default(),
            name: text(self.name),
            address: optional(self.address),
            city_district: text(self.city_district),
            departments: text(self.departments),
            phone: optional(self.phone),
            latitude: row.get(self.latitude).and_then(parse_coordinate),
            longitude: row.get(self.longitude).and_then(parse_coordinate),
            practitioners,
        }
    }
}

fn parse_coordinate(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Non-zero practitioner count; blanks and zeros are dropped
fn parse_count(cell: &str) -> Option<u32> {
    let value = cell.trim().parse::<f64>().ok()?;
    (value.is_finite() && value >= 1.0).then(|| value.round() as u32)
}

//! Static JSON reference files (department list, district tree, keyword maps)

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// Outcome of reading one reference file at startup
#[derive(Debug, Clone)]
pub enum ReferenceFile<T> {
    Loaded(T),
    Missing(PathBuf),
    Invalid(String),
}

impl<T: DeserializeOwned> ReferenceFile<T> {
    /// Read and parse a JSON file. Never fails; the outcome is logged.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Reference file not found");
                return Self::Missing(path.to_path_buf());
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to read reference file");
                return Self::Invalid(format!("{}: {}", path.display(), e));
            }
        };

        match serde_json::from_str(contents.trim_start_matches('\u{feff}')) {
            Ok(value) => {
                tracing::info!(path = %path.display(), "Loaded reference file");
                Self::Loaded(value)
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Malformed reference file");
                Self::Invalid(format!("{}: {}", path.display(), e))
            }
        }
    }
}

impl<T> ReferenceFile<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_loaded(self) -> Option<T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// Reference data served as-is by the lookup endpoints
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub departments: ReferenceFile<Vec<String>>,
    pub districts: ReferenceFile<JsonValue>,
}

impl ReferenceData {
    pub fn load(departments_path: impl AsRef<Path>, districts_path: impl AsRef<Path>) -> Self {
        Self {
            departments: ReferenceFile::load(departments_path),
            districts: ReferenceFile::load(districts_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_valid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("[\"內科\", \"牙科\"]".as_bytes()).unwrap();
        let loaded = ReferenceFile::<Vec<String>>::load(file.path());
        assert_eq!(loaded.loaded().unwrap(), &vec!["內科".to_string(), "牙科".to_string()]);
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("departments_list.json");
        match ReferenceFile::<Vec<String>>::load(&path) {
            ReferenceFile::Missing(p) => assert_eq!(p, path),
            other => panic!("expected missing, got {other:?}"),
        }
    }

    #[test]
    fn wrong_shape_is_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"not\": \"a list\"}").unwrap();
        let loaded = ReferenceFile::<Vec<String>>::load(file.path());
        assert!(matches!(loaded, ReferenceFile::Invalid(_)));
        assert!(loaded.into_loaded().is_none());
    }
}

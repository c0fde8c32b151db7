//! clinic-core: Clinic query engine
//!
//! Loads the geocoded clinic dataset and answers the three query kinds the
//! service exposes: search by area, search by radius, and symptom to
//! department suggestion.

pub mod error;
pub mod geo;
pub mod record;
pub mod reference;
pub mod search;
pub mod suggest;
pub mod table;

pub use error::{ClassifyError, LoadError, QueryError};
pub use geo::{Coordinate, haversine_km};
pub use record::{ClinicRecord, ClinicSummary};
pub use reference::{ReferenceData, ReferenceFile};
pub use search::{MAX_RESULTS, NearbyQuery, SearchQuery, search, search_nearby};
pub use suggest::{DepartmentClassifier, LocalTier, Suggestion, SuggestionResolver, SymptomRules};
pub use table::ClinicTable;

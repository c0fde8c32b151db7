//! Shared, read-only application state

use std::sync::Arc;

use clinic_core::{ClinicTable, ReferenceData, SuggestionResolver, SymptomRules};

use crate::config::Config;

/// Data loaded once at startup and shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<ClinicTable>,
    pub reference: Arc<ReferenceData>,
    pub resolver: Arc<SuggestionResolver>,
}

impl AppState {
    pub fn new(table: ClinicTable, reference: ReferenceData, rules: SymptomRules) -> Self {
        // The classifier needs candidates even without a department list file
        let candidates = match reference.departments.loaded() {
            Some(departments) => departments.clone(),
            None => {
                let derived = table.department_names();
                tracing::warn!(
                    count = derived.len(),
                    "Department list unavailable, using departments found in the dataset"
                );
                derived
            }
        };

        Self {
            table: Arc::new(table),
            reference: Arc::new(reference),
            resolver: Arc::new(SuggestionResolver::new(rules, candidates)),
        }
    }

    /// Load the dataset and reference files named in the configuration.
    ///
    /// Missing or malformed files are logged and degrade to empty data.
    pub fn load(config: &Config) -> Self {
        let table = ClinicTable::load_or_empty(&config.clinic_data_path);
        let reference = ReferenceData::load(&config.departments_path, &config.districts_path);
        let rules = SymptomRules::load(&config.emergency_keywords_path, &config.symptom_map_path);

        tracing::info!(
            emergency_keywords = rules.emergency_keywords().len(),
            keyword_mappings = rules.keyword_map().len(),
            "Loaded symptom rules"
        );

        Self::new(table, reference, rules)
    }
}

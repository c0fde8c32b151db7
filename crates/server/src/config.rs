//! Server configuration

use std::time::Duration;

/// Server configuration loaded from environment variables
pub struct Config {
    pub bind_address: String,
    pub clinic_data_path: String,
    pub departments_path: String,
    pub districts_path: String,
    pub symptom_map_path: String,
    pub emergency_keywords_path: String,
    pub cors_origins: Vec<String>,
    pub rate_limit_rps: u32,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_timeout: Duration,
    pub geocode_api_key: Option<String>,
    pub geocode_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// `API_KEY` is used for both Google services unless a dedicated key is set.
    pub fn from_env() -> Self {
        let shared_key = non_empty_var("API_KEY");

        Self {
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5001".into()),
            clinic_data_path: std::env::var("CLINIC_DATA_PATH")
                .unwrap_or_else(|_| "medical_data_geocoded.csv".into()),
            departments_path: std::env::var("DEPARTMENTS_PATH")
                .unwrap_or_else(|_| "departments_list.json".into()),
            districts_path: std::env::var("DISTRICTS_PATH")
                .unwrap_or_else(|_| "admin_districts.json".into()),
            symptom_map_path: std::env::var("SYMPTOM_MAP_PATH")
                .unwrap_or_else(|_| "symptom_map.json".into()),
            emergency_keywords_path: std::env::var("EMERGENCY_KEYWORDS_PATH")
                .unwrap_or_else(|_| "emergency_keywords.json".into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            gemini_api_key: non_empty_var("GEMINI_API_KEY").or_else(|| shared_key.clone()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash-latest".into()),
            gemini_timeout: secs_var("GEMINI_TIMEOUT_SECS", 15),
            geocode_api_key: non_empty_var("GOOGLE_MAPS_API_KEY").or(shared_key),
            geocode_timeout: secs_var("GEOCODE_TIMEOUT_SECS", 10),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn secs_var(name: &str, default: u64) -> Duration {
    let secs = std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default);
    Duration::from_secs(secs)
}

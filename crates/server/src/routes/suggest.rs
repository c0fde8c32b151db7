//! Symptom to department suggestion endpoint

use axum::{Extension, Json, body::Bytes, extract::State};
use clinic_core::Suggestion;
use serde::{Deserialize, Serialize};

use crate::ai::GeminiClient;
use crate::state::AppState;

/// Request body for department suggestion
#[derive(Debug, Deserialize, Default)]
pub struct SuggestRequest {
    #[serde(default)]
    symptoms: String,
}

/// Response body for department suggestion
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuggestResponse {
    Emergency {
        emergency: bool,
        matched_keyword: String,
    },
    Departments {
        departments: Vec<String>,
    },
}

impl From<Suggestion> for SuggestResponse {
    fn from(suggestion: Suggestion) -> Self {
        match suggestion {
            Suggestion::Emergency { matched_keyword } => SuggestResponse::Emergency {
                emergency: true,
                matched_keyword,
            },
            Suggestion::Departments(departments) => SuggestResponse::Departments { departments },
        }
    }
}

/// POST /api/suggest-department - Suggest departments for a symptom text
///
/// A missing or unreadable body counts as an empty symptom description.
pub async fn suggest_department(
    State(state): State<AppState>,
    Extension(client): Extension<Option<GeminiClient>>,
    body: Bytes,
) -> Json<SuggestResponse> {
    let request: SuggestRequest = serde_json::from_slice(&body).unwrap_or_default();

    let suggestion = state
        .resolver
        .suggest(&request.symptoms, client.as_ref())
        .await;

    Json(suggestion.into())
}

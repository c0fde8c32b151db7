//! Symptom to department classification using Gemini

use clinic_core::{ClassifyError, DepartmentClassifier};
use serde::Deserialize;

use super::client::GeminiClient;

const PROMPT_TEMPLATE: &str = r#"You are a careful medical navigation assistant for clinics in Taiwan. Your only task is to pick the single most suitable department for the user's symptom description from the candidate department list.

Rules:
1. Never give a diagnosis or any kind of medical advice.
2. Reply with a JSON object only.
3. The object must contain a "department" key whose value is copied exactly from the candidate list.

Candidate departments:
{candidates}

Symptom description:
"{symptoms}"
"#;

#[derive(Deserialize)]
struct DepartmentAnswer {
    department: Option<String>,
}

/// Fill the prompt template with the symptoms and candidate list
fn build_prompt(symptoms: &str, candidates: &[String]) -> String {
    let candidates = serde_json::to_string(candidates).unwrap_or_else(|_| "[]".to_string());
    PROMPT_TEMPLATE
        .replace("{candidates}", &candidates)
        .replace("{symptoms}", symptoms)
}

/// Read the `department` value out of the model's reply
fn parse_department(text: &str) -> Result<Option<String>, String> {
    let json_str = extract_json(text)?;
    let answer: DepartmentAnswer = serde_json::from_str(&json_str)
        .map_err(|e| format!("Failed to parse department answer: {}", e))?;

    Ok(answer
        .department
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty()))
}

/// Extract a JSON object from text that might contain markdown code blocks
fn extract_json(text: &str) -> Result<String, String> {
    let trimmed = text.trim();

    if trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    // Wrapped in ```json ... ```
    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return Ok(after[..end].trim().to_string());
        }
    }

    // Wrapped in ``` ... ```
    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            return Ok(after[..end].trim().to_string());
        }
    }

    Err(format!("Could not extract JSON from response: {}", trimmed))
}

impl DepartmentClassifier for GeminiClient {
    async fn classify(
        &self,
        symptoms: &str,
        candidates: &[String],
    ) -> Result<Option<String>, ClassifyError> {
        tracing::info!(model = self.model(), "Asking Gemini for a department");

        let prompt = build_prompt(symptoms, candidates);
        let reply = self.generate_json(&prompt).await.map_err(ClassifyError)?;
        parse_department(&reply).map_err(ClassifyError)
    }
}

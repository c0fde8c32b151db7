//! Symptom to department suggestion
//!
//! Evaluates an ordered chain: emergency keywords, then the keyword map, then
//! an external classifier. The first tier that produces an answer wins.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::ClassifyError;
use crate::reference::ReferenceFile;

/// Outcome of a suggestion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// The text mentions an emergency; the caller should seek urgent care
    Emergency { matched_keyword: String },
    /// Suggested departments, possibly empty
    Departments(Vec<String>),
}

impl Suggestion {
    pub fn none() -> Self {
        Self::Departments(Vec::new())
    }
}

/// External service that picks one department for a symptom description
pub trait DepartmentClassifier {
    /// Pick the best department from `candidates`, or `None` if the service
    /// declined to answer.
    fn classify(
        &self,
        symptoms: &str,
        candidates: &[String],
    ) -> impl Future<Output = Result<Option<String>, ClassifyError>> + Send;
}

/// Keyword configuration for the local tiers
#[derive(Debug, Clone, Default)]
pub struct SymptomRules {
    emergency_keywords: Vec<String>,
    keyword_map: Vec<(String, String)>,
}

/// `emergency_keywords.json` is either a list or an object keyed by keyword
#[derive(Deserialize)]
#[serde(untagged)]
enum KeywordFile {
    List(Vec<String>),
    Keys(Map<String, JsonValue>),
}

impl KeywordFile {
    fn into_keywords(self) -> Vec<String> {
        match self {
            Self::List(list) => list,
            Self::Keys(map) => map.into_iter().map(|(k, _)| k).collect(),
        }
    }
}

impl SymptomRules {
    /// Empty keywords are dropped since they would match every text.
    pub fn new(emergency_keywords: Vec<String>, keyword_map: Vec<(String, String)>) -> Self {
        Self {
            emergency_keywords: emergency_keywords
                .into_iter()
                .filter(|k| !k.is_empty())
                .collect(),
            keyword_map: keyword_map
                .into_iter()
                .filter(|(k, _)| !k.is_empty())
                .collect(),
        }
    }

    /// Load both keyword files. Missing or malformed files leave that tier empty.
    pub fn load(emergency_path: impl AsRef<Path>, keyword_map_path: impl AsRef<Path>) -> Self {
        let emergency = ReferenceFile::<KeywordFile>::load(emergency_path)
            .into_loaded()
            .map(KeywordFile::into_keywords)
            .unwrap_or_default();

        let keyword_map = ReferenceFile::<Map<String, JsonValue>>::load(keyword_map_path)
            .into_loaded()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(keyword, department)| match department {
                JsonValue::String(department) => Some((keyword, department)),
                other => {
                    tracing::warn!(keyword = %keyword, value = %other, "Ignoring non-text keyword mapping");
                    None
                }
            })
            .collect();

        Self::new(emergency, keyword_map)
    }

    pub fn emergency_keywords(&self) -> &[String] {
        &self.emergency_keywords
    }

    pub fn keyword_map(&self) -> &[(String, String)] {
        &self.keyword_map
    }
}

/// One local, side-effect free step of the suggestion chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTier {
    Emergency,
    KeywordMap,
}

impl LocalTier {
    /// Evaluation order of the local tiers
    pub const CHAIN: [LocalTier; 2] = [LocalTier::Emergency, LocalTier::KeywordMap];

    pub fn evaluate(self, text: &str, rules: &SymptomRules) -> Option<Suggestion> {
        match self {
            LocalTier::Emergency => rules
                .emergency_keywords
                .iter()
                .find(|keyword| text.contains(keyword.as_str()))
                .map(|keyword| Suggestion::Emergency {
                    matched_keyword: keyword.clone(),
                }),
            LocalTier::KeywordMap => {
                let mut departments: Vec<String> = Vec::new();
                for (keyword, department) in &rules.keyword_map {
                    if text.contains(keyword.as_str()) && !departments.contains(department) {
                        departments.push(department.clone());
                    }
                }
                (!departments.is_empty()).then_some(Suggestion::Departments(departments))
            }
        }
    }
}

/// Runs the suggestion chain against a fixed rule set and candidate list
#[derive(Debug, Clone, Default)]
pub struct SuggestionResolver {
    rules: SymptomRules,
    candidates: Vec<String>,
}

impl SuggestionResolver {
    /// `candidates` is the department list offered to the external classifier.
    pub fn new(rules: SymptomRules, candidates: Vec<String>) -> Self {
        Self { rules, candidates }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Run only the local tiers
    pub fn resolve_locally(&self, text: &str) -> Option<Suggestion> {
        LocalTier::CHAIN
            .iter()
            .find_map(|tier| tier.evaluate(text, &self.rules))
    }

    /// Run the full chain. Classifier failures are logged and yield no
    /// departments.
    pub async fn suggest<C>(&self, text: &str, classifier: Option<&C>) -> Suggestion
    where
        C: DepartmentClassifier + Sync,
    {
        if text.trim().is_empty() {
            return Suggestion::none();
        }

        if let Some(suggestion) = self.resolve_locally(text) {
            match &suggestion {
                Suggestion::Emergency { matched_keyword } => {
                    tracing::warn!(keyword = %matched_keyword, "Emergency keyword detected");
                }
                Suggestion::Departments(departments) => {
                    tracing::info!(departments = ?departments, "Keyword map matched");
                }
            }
            return suggestion;
        }

        let Some(classifier) = classifier else {
            tracing::warn!("No keyword matched and no classifier is configured");
            return Suggestion::none();
        };
        if self.candidates.is_empty() {
            tracing::warn!("No keyword matched and the candidate department list is empty");
            return Suggestion::none();
        }

        match classifier.classify(text, &self.candidates).await {
            Ok(Some(department)) => {
                tracing::info!(department = %department, "Classifier suggested department");
                Suggestion::Departments(vec![department])
            }
            Ok(None) => {
                tracing::info!("Classifier returned no department");
                Suggestion::none()
            }
            Err(e) => {
                tracing::error!(error = %e, "Classifier call failed");
                Suggestion::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records every call and replies with a fixed answer
    struct MockClassifier {
        calls: AtomicUsize,
        seen_candidates: Mutex<Vec<String>>,
        reply: Result<Option<String>, String>,
    }

    impl MockClassifier {
        fn replying(reply: Result<Option<&str>, &str>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen_candidates: Mutex::new(Vec::new()),
                reply: reply.map(|d| d.map(str::to_string)).map_err(str::to_string),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DepartmentClassifier for MockClassifier {
        async fn classify(
            &self,
            _symptoms: &str,
            candidates: &[String],
        ) -> Result<Option<String>, ClassifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_candidates.lock().unwrap() = candidates.to_vec();
            self.reply.clone().map_err(ClassifyError)
        }
    }

    fn resolver() -> SuggestionResolver {
        let rules = SymptomRules::new(
            vec!["快死了".to_string(), "胸痛".to_string()],
            vec![
                ("牙".to_string(), "牙科".to_string()),
                ("蛀牙".to_string(), "牙科".to_string()),
                ("疹子".to_string(), "皮膚科".to_string()),
            ],
        );
        SuggestionResolver::new(rules, vec!["內科".to_string(), "牙科".to_string(), "皮膚科".to_string()])
    }

    #[tokio::test]
    async fn emergency_keyword_short_circuits() {
        let classifier = MockClassifier::replying(Ok(Some("內科")));
        let result = resolver().suggest("我快死了，牙也很痛", Some(&classifier)).await;
        assert_eq!(
            result,
            Suggestion::Emergency {
                matched_keyword: "快死了".to_string()
            }
        );
        assert_eq!(classifier.calls(), 0);
    }

    #[tokio::test]
    async fn keyword_map_answers_without_classifier() {
        let classifier = MockClassifier::replying(Ok(Some("內科")));
        let result = resolver().suggest("牙痛", Some(&classifier)).await;
        assert_eq!(result, Suggestion::Departments(vec!["牙科".to_string()]));
        assert_eq!(classifier.calls(), 0);
    }

    #[tokio::test]
    async fn keyword_map_collapses_duplicates_in_order() {
        let classifier = MockClassifier::replying(Ok(None));
        let result = resolver().suggest("蛀牙又長疹子", Some(&classifier)).await;
        assert_eq!(
            result,
            Suggestion::Departments(vec!["牙科".to_string(), "皮膚科".to_string()])
        );
    }

    #[tokio::test]
    async fn empty_text_evaluates_nothing() {
        let classifier = MockClassifier::replying(Ok(Some("內科")));
        assert_eq!(resolver().suggest("", Some(&classifier)).await, Suggestion::none());
        assert_eq!(resolver().suggest("   ", Some(&classifier)).await, Suggestion::none());
        assert_eq!(classifier.calls(), 0);
    }

    #[tokio::test]
    async fn falls_back_to_classifier_with_candidates() {
        let classifier = MockClassifier::replying(Ok(Some("內科")));
        let result = resolver().suggest("一直咳嗽", Some(&classifier)).await;
        assert_eq!(result, Suggestion::Departments(vec!["內科".to_string()]));
        assert_eq!(classifier.calls(), 1);
        assert_eq!(
            *classifier.seen_candidates.lock().unwrap(),
            vec!["內科".to_string(), "牙科".to_string(), "皮膚科".to_string()]
        );
    }

    #[tokio::test]
    async fn classifier_failure_yields_no_departments() {
        let classifier = MockClassifier::replying(Err("connection reset"));
        let result = resolver().suggest("一直咳嗽", Some(&classifier)).await;
        assert_eq!(result, Suggestion::none());
        assert_eq!(classifier.calls(), 1);
    }

    #[tokio::test]
    async fn classifier_without_answer_yields_no_departments() {
        let classifier = MockClassifier::replying(Ok(None));
        assert_eq!(resolver().suggest("頭暈", Some(&classifier)).await, Suggestion::none());
    }

    #[tokio::test]
    async fn missing_classifier_yields_no_departments() {
        let result = resolver().suggest("頭暈", None::<&MockClassifier>).await;
        assert_eq!(result, Suggestion::none());
    }

    #[tokio::test]
    async fn empty_candidate_list_skips_classifier() {
        let resolver = SuggestionResolver::new(SymptomRules::default(), Vec::new());
        let classifier = MockClassifier::replying(Ok(Some("內科")));
        assert_eq!(resolver.suggest("頭暈", Some(&classifier)).await, Suggestion::none());
        assert_eq!(classifier.calls(), 0);
    }

    #[test]
    fn empty_keywords_are_ignored() {
        let rules = SymptomRules::new(vec![String::new()], vec![(String::new(), "內科".to_string())]);
        assert!(LocalTier::Emergency.evaluate("anything", &rules).is_none());
        assert!(LocalTier::KeywordMap.evaluate("anything", &rules).is_none());
    }

    #[test]
    fn loads_keyword_files_in_either_shape() {
        let mut emergency = tempfile::NamedTempFile::new().unwrap();
        emergency
            .write_all("{\"昏倒\": \"急診\", \"快死了\": \"急診\"}".as_bytes())
            .unwrap();
        let mut map = tempfile::NamedTempFile::new().unwrap();
        map.write_all("{\"牙\": \"牙科\", \"咳\": \"胸腔內科\", \"bad\": 3}".as_bytes())
            .unwrap();

        let rules = SymptomRules::load(emergency.path(), map.path());
        assert_eq!(rules.emergency_keywords(), ["昏倒".to_string(), "快死了".to_string()]);
        assert_eq!(
            rules.keyword_map(),
            [
                ("牙".to_string(), "牙科".to_string()),
                ("咳".to_string(), "胸腔內科".to_string())
            ]
        );

        let mut list = tempfile::NamedTempFile::new().unwrap();
        list.write_all("[\"胸痛\"]".as_bytes()).unwrap();
        let rules = SymptomRules::load(list.path(), map.path());
        assert_eq!(rules.emergency_keywords(), ["胸痛".to_string()]);
    }

    #[test]
    fn missing_keyword_files_leave_rules_empty() {
        let dir = tempfile::tempdir().unwrap();
        let rules = SymptomRules::load(dir.path().join("a.json"), dir.path().join("b.json"));
        assert!(rules.emergency_keywords().is_empty());
        assert!(rules.keyword_map().is_empty());
    }
}

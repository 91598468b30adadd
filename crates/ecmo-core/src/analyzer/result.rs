use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::extract::{extract_metadata, take_chars, Metadata};
use crate::gateway::QaResponse;

/// The record stored for one analysis field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Plain answer text.
    pub answer: String,
    /// Answer with citation keys and references.
    pub formatted_answer: String,
    /// Quotes, references and reference descriptions.
    pub metadata: Metadata,
}

impl AnalysisResult {
    /// Builds a result from an engine response.
    pub fn from_response(response: &QaResponse) -> Self {
        Self {
            answer: response.answer.clone(),
            formatted_answer: response.formatted_answer.clone(),
            metadata: extract_metadata(response),
        }
    }

    /// The answer cut to `max_chars`, with `...` when it was longer.
    pub fn answer_preview(&self, max_chars: usize) -> String {
        if self.answer.chars().count() > max_chars {
            format!("{}...", take_chars(&self.answer, max_chars))
        } else {
            self.answer.clone()
        }
    }
}

/// Results keyed by field name, in the order the fields were analyzed.
pub type AnalysisReport = IndexMap<String, AnalysisResult>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_preview() {
        let result = AnalysisResult {
            answer: "x".repeat(120),
            ..Default::default()
        };
        let preview = result.answer_preview(100);
        assert_eq!(preview.len(), 103);
        assert!(preview.ends_with("..."));

        let short = AnalysisResult {
            answer: "Minimal impact on PK.".to_string(),
            ..Default::default()
        };
        assert_eq!(short.answer_preview(100), "Minimal impact on PK.");
    }

    #[test]
    fn test_json_keys() {
        let value = serde_json::to_value(AnalysisResult::default()).unwrap();
        assert!(value.get("answer").is_some());
        assert!(value.get("formatted_answer").is_some());
        assert!(value["metadata"].get("exact_citation").is_some());
        assert!(value["metadata"].get("reference").is_some());
        assert!(value["metadata"].get("ref_details").is_some());
    }
}

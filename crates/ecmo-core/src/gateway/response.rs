use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Per-call settings sent along with a question.
///
/// Serializes to the settings shape the engine expects:
/// `{llm, summary_llm, temperature, paper_directory, prompts: {system, use_json}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfiguration {
    pub llm: String,
    pub summary_llm: String,
    pub temperature: f64,
    pub paper_directory: PathBuf,
    pub prompts: PromptSettings,
}

impl AnalysisConfiguration {
    pub fn system_prompt(&self) -> &str {
        &self.prompts.system
    }

    pub fn use_structured_output(&self) -> bool {
        self.prompts.use_json
    }
}

/// Prompt overrides for one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSettings {
    /// System prompt steering the answer.
    pub system: String,
    /// Ask for structured (JSON) evidence summaries.
    pub use_json: bool,
}

/// The engine's answer to one question.
///
/// Every field defaults to empty so a partial payload still decodes; the
/// metadata extractor degrades on whatever is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QaResponse {
    /// Plain answer text.
    pub answer: String,
    /// Answer with inline citation keys and a trailing `References` section.
    pub formatted_answer: String,
    /// Evidence snippets, most relevant first.
    pub contexts: Vec<ContextSnippet>,
}

/// A retrieved passage the engine used as evidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSnippet {
    /// The passage text.
    #[serde(rename = "context")]
    pub text: String,
    /// Source document, when the engine linked one.
    pub doc: Option<SourceDocument>,
}

impl ContextSnippet {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            doc: None,
        }
    }

    pub fn with_doc(mut self, doc: SourceDocument) -> Self {
        self.doc = Some(doc);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceDocument {
    /// Formatted citation string.
    pub citation: String,
    /// Short document key, e.g. `smith2019`.
    pub docname: String,
}

impl SourceDocument {
    pub fn new(citation: impl Into<String>, docname: impl Into<String>) -> Self {
        Self {
            citation: citation.into(),
            docname: docname.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_payload_decodes() {
        let json = r#"{"answer": "Increased Vd.", "contexts": [{"context": "text"}, {}]}"#;
        let response: QaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.answer, "Increased Vd.");
        assert!(response.formatted_answer.is_empty());
        assert_eq!(response.contexts.len(), 2);
        assert!(response.contexts[0].doc.is_none());
        assert!(response.contexts[1].text.is_empty());
    }

    #[test]
    fn test_doc_fields_decode() {
        let json = r#"{"contexts": [{"context": "x", "doc": {"citation": "Smith J. 2019", "docname": "smith2019"}}]}"#;
        let response: QaResponse = serde_json::from_str(json).unwrap();
        let doc = response.contexts[0].doc.as_ref().unwrap();
        assert_eq!(doc.citation, "Smith J. 2019");
        assert_eq!(doc.docname, "smith2019");
    }

    #[test]
    fn test_settings_shape() {
        let settings = AnalysisConfiguration {
            llm: "gpt-4o-mini".to_string(),
            summary_llm: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            paper_directory: PathBuf::from("./drugs/meropenem"),
            prompts: PromptSettings {
                system: "You are a pharmacist.".to_string(),
                use_json: true,
            },
        };
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["prompts"]["use_json"], true);
        assert_eq!(value["paper_directory"], "./drugs/meropenem");
        assert_eq!(settings.system_prompt(), "You are a pharmacist.");
    }
}

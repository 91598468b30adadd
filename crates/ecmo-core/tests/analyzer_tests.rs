use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use ecmo_core::{
    AnalysisConfiguration, AnalysisDefaults, AnalyzerError, ContextSnippet, DrugAnalyzer,
    FieldKind, FieldProgress, GatewayError, QaGateway, QaResponse,
};

/// Replays canned responses and records every question asked.
#[derive(Default)]
struct ScriptedGateway {
    responses: Mutex<VecDeque<Result<QaResponse, GatewayError>>>,
    calls: Mutex<Vec<(String, AnalysisConfiguration)>>,
}

impl ScriptedGateway {
    fn replying(responses: Vec<Result<QaResponse, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, AnalysisConfiguration)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QaGateway for ScriptedGateway {
    async fn ask(
        &self,
        question: &str,
        settings: &AnalysisConfiguration,
    ) -> Result<QaResponse, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((question.to_string(), settings.clone()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(answer("No answer.")))
    }
}

fn answer(text: &str) -> QaResponse {
    QaResponse {
        answer: text.to_string(),
        formatted_answer: format!("{text}\n\nReferences\n\n1. (smith2019): Smith J. Pediatric ECMO review. 2019"),
        contexts: vec![ContextSnippet::new(
            "Meropenem concentrations were lower in neonates on ECMO than expected.",
        )],
    }
}

#[tokio::test]
async fn test_analyze_field_builds_question_and_settings() {
    let analyzer = DrugAnalyzer::new(ScriptedGateway::default(), "Meropenem");

    let result = analyzer.analyze_field("Effect on ECMO").await.unwrap();
    assert_eq!(result.answer, "No answer.");

    let calls = analyzer.gateway().calls();
    assert_eq!(calls.len(), 1);
    let (question, settings) = &calls[0];
    assert!(question.starts_with("What is the effect of ECMO on meropenem?"));
    assert_eq!(settings.temperature, 0.1);
    assert_eq!(settings.llm, "gpt-4o-mini");
    assert_eq!(settings.summary_llm, "gpt-4o-mini");
    assert!(settings.use_structured_output());
    assert!(settings.system_prompt().contains("effect of ECMO on meropenem"));
    assert_eq!(settings.paper_directory, PathBuf::from("./drugs").join("meropenem"));
}

#[tokio::test]
async fn test_result_metadata_is_extracted() {
    let gateway = ScriptedGateway::replying(vec![Ok(answer("Increased Vd."))]);
    let analyzer = DrugAnalyzer::new(gateway, "meropenem");

    let result = analyzer.analyze_field("Volume of distribution (Vd)").await.unwrap();
    assert_eq!(result.answer, "Increased Vd.");
    assert_eq!(result.metadata.reference, vec!["Smith J. Pediatric ECMO review. 2019"]);
    assert_eq!(
        result.metadata.ref_details,
        vec!["Literature review on pediatric ECMO patients. Quality: narrative review. Evidence: multiple citations from this source."]
    );
    assert_eq!(result.metadata.exact_citation.len(), 1);
}

#[tokio::test]
async fn test_unknown_field_fails_before_gateway() {
    let analyzer = DrugAnalyzer::new(ScriptedGateway::default(), "meropenem");

    let err = analyzer.analyze_field("Half-life").await.unwrap_err();
    assert!(matches!(err, AnalyzerError::Catalog(_)));
    assert!(analyzer.gateway().calls().is_empty());
}

#[tokio::test]
async fn test_gateway_error_propagates() {
    let gateway = ScriptedGateway::replying(vec![Err(GatewayError::RateLimited)]);
    let analyzer = DrugAnalyzer::new(gateway, "meropenem");

    let err = analyzer.analyze_field("ECMO dosage").await.unwrap_err();
    assert!(matches!(err, AnalyzerError::Gateway(GatewayError::RateLimited)));
}

#[tokio::test]
async fn test_all_fields_in_catalog_order() {
    let analyzer = DrugAnalyzer::new(ScriptedGateway::default(), "vancomycin");

    let report = analyzer.analyze_all_fields().await.unwrap();
    let keys: Vec<&str> = report.keys().map(String::as_str).collect();
    let expected: Vec<&str> = FieldKind::ALL.iter().map(|k| k.name()).collect();
    assert_eq!(keys, expected);
    assert_eq!(analyzer.gateway().calls().len(), 7);
}

#[tokio::test]
async fn test_batch_aborts_on_first_failure() {
    let gateway = ScriptedGateway::replying(vec![
        Ok(answer("First.")),
        Err(GatewayError::Network("connection reset".to_string())),
        Ok(answer("Never asked.")),
    ]);
    let analyzer = DrugAnalyzer::new(gateway, "meropenem");

    let err = analyzer.analyze_all_fields().await.unwrap_err();
    assert!(matches!(err, AnalyzerError::Gateway(GatewayError::Network(_))));
    assert_eq!(analyzer.gateway().calls().len(), 2);
}

#[tokio::test]
async fn test_subset_validates_names_first() {
    let analyzer = DrugAnalyzer::new(ScriptedGateway::default(), "meropenem");

    let err = analyzer
        .analyze_fields(&["Effect on ECMO", "Clearance"])
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::Catalog(_)));
    assert!(analyzer.gateway().calls().is_empty());
}

#[tokio::test]
async fn test_subset_keeps_request_order() {
    let analyzer = DrugAnalyzer::new(ScriptedGateway::default(), "meropenem");

    let report = analyzer
        .analyze_fields(&["ECMO dosage", "Effect on ECMO", "Final Recommendation"])
        .await
        .unwrap();
    let keys: Vec<&str> = report.keys().map(String::as_str).collect();
    assert_eq!(keys, ["ECMO dosage", "Effect on ECMO", "Final Recommendation"]);
}

#[tokio::test]
async fn test_progress_events() {
    let analyzer = DrugAnalyzer::new(ScriptedGateway::default(), "meropenem");
    let mut events = Vec::new();

    analyzer
        .analyze_all_fields_with_progress(|p| events.push(p))
        .await
        .unwrap();

    assert_eq!(events.len(), 14);
    assert_eq!(
        events[0],
        FieldProgress::Started {
            field: FieldKind::EffectOnEcmo,
            index: 0,
            total: 7
        }
    );
    assert_eq!(
        events[13],
        FieldProgress::Finished {
            field: FieldKind::ProteinBinding,
            index: 6,
            total: 7
        }
    );
}

#[tokio::test]
async fn test_configured_defaults_and_paper_override() {
    let defaults = AnalysisDefaults {
        temperature: 0.0,
        llm: "gpt-4o".to_string(),
        drugs_dir: PathBuf::from("/data/papers"),
        ..AnalysisDefaults::default()
    };
    let analyzer = DrugAnalyzer::new(ScriptedGateway::default(), "Cefazolin").with_defaults(defaults);
    assert_eq!(analyzer.paper_directory(), PathBuf::from("/data/papers/cefazolin"));

    let analyzer = analyzer.with_paper_directory("/tmp/cefazolin-pdfs");
    analyzer.analyze_field("PK Properties -LogP").await.unwrap();

    let (_, settings) = &analyzer.gateway().calls()[0];
    assert_eq!(settings.llm, "gpt-4o");
    assert_eq!(settings.temperature, 0.0);
    assert_eq!(settings.paper_directory, PathBuf::from("/tmp/cefazolin-pdfs"));
}

#[test]
fn test_drug_name_is_only_lowercased() {
    let analyzer = DrugAnalyzer::new(ScriptedGateway::default(), "Meropenem");
    assert_eq!(analyzer.drug_name(), "meropenem");

    let analyzer = DrugAnalyzer::new(ScriptedGateway::default(), " Piperacillin-Tazobactam");
    assert_eq!(analyzer.drug_name(), " piperacillin-tazobactam");
}

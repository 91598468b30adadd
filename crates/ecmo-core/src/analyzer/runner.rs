use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, info};

use crate::analyzer::result::{AnalysisReport, AnalysisResult};
use crate::catalog::{AnalysisField, CatalogError, FieldKind};
use crate::config::AnalysisDefaults;
use crate::gateway::{AnalysisConfiguration, GatewayError, PromptSettings, QaGateway};

/// Progress events emitted while analyzing several fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProgress {
    Started {
        field: FieldKind,
        index: usize,
        total: usize,
    },
    Finished {
        field: FieldKind,
        index: usize,
        total: usize,
    },
}

/// Analyzes one drug against the field catalog.
///
/// Fields run one at a time; each issues exactly one engine call.
pub struct DrugAnalyzer<G: QaGateway> {
    gateway: G,
    drug_name: String,
    defaults: AnalysisDefaults,
    paper_directory: Option<PathBuf>,
}

impl<G: QaGateway> DrugAnalyzer<G> {
    /// Creates an analyzer with built-in defaults.
    ///
    /// The drug name is lower-cased; papers are read from `./drugs/{drug}`.
    pub fn new(gateway: G, drug_name: &str) -> Self {
        Self {
            gateway,
            drug_name: drug_name.to_lowercase(),
            defaults: AnalysisDefaults::default(),
            paper_directory: None,
        }
    }

    /// Uses configured models, temperature and drugs root.
    pub fn with_defaults(mut self, defaults: AnalysisDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Reads papers from `dir` instead of `{drugs_dir}/{drug}`.
    pub fn with_paper_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.paper_directory = Some(dir.into());
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn drug_name(&self) -> &str {
        &self.drug_name
    }

    pub fn paper_directory(&self) -> PathBuf {
        self.paper_directory
            .clone()
            .unwrap_or_else(|| self.defaults.paper_directory(&self.drug_name))
    }

    /// The question asked for a field.
    pub fn question(&self, field: &AnalysisField) -> String {
        field.question(&self.drug_name)
    }

    /// Engine settings for a field, built fresh on every call.
    pub fn analysis_settings(&self, field: &AnalysisField) -> AnalysisConfiguration {
        AnalysisConfiguration {
            llm: self.defaults.llm.clone(),
            summary_llm: self.defaults.summary_llm.clone(),
            temperature: self.defaults.temperature,
            paper_directory: self.paper_directory(),
            prompts: PromptSettings {
                system: field.system_prompt(&self.drug_name),
                use_json: self.defaults.use_structured_output,
            },
        }
    }

    /// Analyzes the field with the given canonical name.
    ///
    /// Unknown names fail before the engine is called.
    pub async fn analyze_field(&self, field_name: &str) -> Result<AnalysisResult, AnalyzerError> {
        let kind = FieldKind::from_name(field_name)?;
        self.analyze_kind(kind).await
    }

    /// Analyzes one field.
    pub async fn analyze_kind(&self, kind: FieldKind) -> Result<AnalysisResult, AnalyzerError> {
        let field = kind.field();
        let question = self.question(&field);
        let settings = self.analysis_settings(&field);

        info!(drug = %self.drug_name, field = field.name, "analyzing field");

        let response = self
            .gateway
            .ask(&question, &settings)
            .await
            .map_err(|e| {
                error!(drug = %self.drug_name, field = field.name, error = %e, "engine call failed");
                e
            })?;

        let result = AnalysisResult::from_response(&response);

        info!(
            drug = %self.drug_name,
            field = field.name,
            quotes = result.metadata.exact_citation.len(),
            references = result.metadata.reference.len(),
            "field analyzed"
        );

        Ok(result)
    }

    /// Analyzes the named fields in the given order.
    ///
    /// All names are checked before the first engine call. The first engine
    /// failure aborts the whole run.
    pub async fn analyze_fields<S: AsRef<str>>(
        &self,
        field_names: &[S],
    ) -> Result<AnalysisReport, AnalyzerError> {
        let kinds = field_names
            .iter()
            .map(|name| FieldKind::from_name(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        self.run_fields(&kinds, |_| {}).await
    }

    /// Analyzes all seven fields in catalog order.
    pub async fn analyze_all_fields(&self) -> Result<AnalysisReport, AnalyzerError> {
        self.run_fields(&FieldKind::ALL, |_| {}).await
    }

    /// Like [`analyze_all_fields`](Self::analyze_all_fields), reporting progress.
    pub async fn analyze_all_fields_with_progress(
        &self,
        on_progress: impl FnMut(FieldProgress),
    ) -> Result<AnalysisReport, AnalyzerError> {
        self.run_fields(&FieldKind::ALL, on_progress).await
    }

    /// Analyzes the given fields, reporting progress.
    pub async fn run_fields(
        &self,
        kinds: &[FieldKind],
        mut on_progress: impl FnMut(FieldProgress),
    ) -> Result<AnalysisReport, AnalyzerError> {
        let total = kinds.len();
        let mut report = AnalysisReport::with_capacity(total);

        for (index, &field) in kinds.iter().enumerate() {
            on_progress(FieldProgress::Started { field, index, total });
            let result = self.analyze_kind(field).await?;
            report.insert(field.name().to_string(), result);
            on_progress(FieldProgress::Finished { field, index, total });
        }

        Ok(report)
    }
}

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

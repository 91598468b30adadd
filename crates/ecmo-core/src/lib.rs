//! Literature-backed pharmacokinetic analysis of drugs during ECMO.
//!
//! Asks a paper QA engine seven fixed clinical questions about a drug and
//! turns each answer into a JSON record with quotes, references and a rough
//! evidence-quality description.

pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod extract;
pub mod gateway;
pub mod storage;

pub use analyzer::{AnalysisReport, AnalysisResult, AnalyzerError, DrugAnalyzer, FieldProgress};
pub use catalog::{get_field, AnalysisField, CatalogError, FieldKind};
pub use config::{AnalysisDefaults, Config, ConfigError, GatewayConfig, StorageConfig};
pub use extract::{extract_metadata, Metadata};
pub use gateway::{
    AnalysisConfiguration, ContextSnippet, GatewayError, HttpGateway, QaGateway, QaResponse,
    SourceDocument,
};
pub use storage::{FileStorage, Storage, StorageError};

mod result;
mod runner;

pub use result::{AnalysisReport, AnalysisResult};
pub use runner::{AnalyzerError, DrugAnalyzer, FieldProgress};

mod error;
mod file;

pub use error::StorageError;
pub use file::FileStorage;

use std::path::{Path, PathBuf};

use crate::analyzer::{AnalysisReport, AnalysisResult};
use crate::catalog::FieldKind;

/// Trait for result storage backends.
pub trait Storage {
    /// Saves a multi-field report. Returns where it was written.
    ///
    /// Without a filename, a report covering every field goes to the full
    /// report path and anything smaller to the subset report path.
    fn save_report(
        &self,
        drug_name: &str,
        report: &AnalysisReport,
        filename: Option<&Path>,
    ) -> Result<PathBuf, StorageError>;

    /// Saves a single-field result. Returns where it was written.
    fn save_result(
        &self,
        drug_name: &str,
        field: FieldKind,
        result: &AnalysisResult,
        filename: Option<&Path>,
    ) -> Result<PathBuf, StorageError>;

    /// Loads a previously saved report.
    fn load_report(&self, path: &Path) -> Result<AnalysisReport, StorageError>;

    /// Loads a previously saved single-field result.
    fn load_result(&self, path: &Path) -> Result<AnalysisResult, StorageError>;
}

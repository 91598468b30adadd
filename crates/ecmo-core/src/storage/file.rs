use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::analyzer::{AnalysisReport, AnalysisResult};
use crate::catalog::FieldKind;
use crate::config::StorageConfig;

use super::error::StorageError;
use super::Storage;

/// JSON file storage.
///
/// ```text
/// {output_dir}/
///   meropenem_ecmo_analysis.json   # all fields
///   meropenem_key_analysis.json    # a subset of fields
///   meropenem_effect.json          # a single field
/// ```
///
/// Explicit file names are used as given (relative to the working
/// directory), not joined to `output_dir`.
pub struct FileStorage {
    config: StorageConfig,
}

impl FileStorage {
    /// Creates a new FileStorage writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config: StorageConfig {
                output_dir: output_dir.into(),
            },
        }
    }

    /// Creates a new FileStorage with custom configuration.
    pub fn with_config(config: StorageConfig) -> Self {
        Self { config }
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
        }

        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json).map_err(|e| StorageError::io(path, e))?;

        info!(path = %path.display(), "results saved");
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, StorageError> {
        if !path.exists() {
            return Err(StorageError::NotFound(path.to_path_buf()));
        }

        let json = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// True when the report holds a result for every catalog field.
fn covers_all_fields(report: &AnalysisReport) -> bool {
    FieldKind::ALL
        .iter()
        .all(|kind| report.contains_key(kind.name()))
}

impl Storage for FileStorage {
    fn save_report(
        &self,
        drug_name: &str,
        report: &AnalysisReport,
        filename: Option<&Path>,
    ) -> Result<PathBuf, StorageError> {
        let path = match filename {
            Some(path) => path.to_path_buf(),
            None if covers_all_fields(report) => self.config.report_path(drug_name),
            None => self.config.subset_report_path(drug_name),
        };
        self.write_json(&path, report)?;
        Ok(path)
    }

    fn save_result(
        &self,
        drug_name: &str,
        field: FieldKind,
        result: &AnalysisResult,
        filename: Option<&Path>,
    ) -> Result<PathBuf, StorageError> {
        let path = filename
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.field_path(drug_name, field.slug()));
        self.write_json(&path, result)?;
        Ok(path)
    }

    fn load_report(&self, path: &Path) -> Result<AnalysisReport, StorageError> {
        self.read_json(path)
    }

    fn load_result(&self, path: &Path) -> Result<AnalysisResult, StorageError> {
        self.read_json(path)
    }
}

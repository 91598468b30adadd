//! Configuration management for ecmo.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. An explicit file passed by the caller, or project-local `ecmo.toml`
//! 3. User config `~/.config/ecmo/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Paper QA service connection.
    pub gateway: GatewayConfig,

    /// Per-field analysis settings.
    pub analysis: AnalysisDefaults,

    /// Where result files go.
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./ecmo.toml` (project local)
    /// 2. `~/.config/ecmo/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides are applied in every case.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(LOCAL_CONFIG_FILE).exists() {
            return Self::from_file(LOCAL_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from TOML text without touching the environment.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = std::env::var("ECMO_GATEWAY_URL") {
            self.gateway.base_url = url;
        }
        if let Ok(key) = std::env::var("ECMO_GATEWAY_API_KEY") {
            self.gateway.api_key = Some(key);
        }
        if let Ok(secs) = std::env::var("ECMO_GATEWAY_TIMEOUT_SECS") {
            if let Ok(n) = secs.parse() {
                self.gateway.timeout_secs = n;
            }
        }

        if let Ok(model) = std::env::var("ECMO_LLM") {
            self.analysis.llm = model;
        }
        if let Ok(model) = std::env::var("ECMO_SUMMARY_LLM") {
            self.analysis.summary_llm = model;
        }
        if let Ok(temp) = std::env::var("ECMO_TEMPERATURE") {
            if let Ok(t) = temp.parse() {
                self.analysis.temperature = t;
            }
        }
        if let Ok(dir) = std::env::var("ECMO_DRUGS_DIR") {
            self.analysis.drugs_dir = PathBuf::from(dir);
        }

        if let Ok(dir) = std::env::var("ECMO_OUTPUT_DIR") {
            self.storage.output_dir = PathBuf::from(dir);
        }

        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.analysis.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.analysis.temperature
            )));
        }
        if self.gateway.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("gateway.base_url is empty".to_string()));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Paper QA service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the service.
    pub base_url: String,

    /// Bearer token (can also be set via environment variable).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_GATEWAY_TIMEOUT_SECS,
        }
    }
}

/// Settings shared by every field analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDefaults {
    /// Sampling temperature passed to the engine.
    pub temperature: f64,

    /// Answering model.
    pub llm: String,

    /// Evidence summary model.
    pub summary_llm: String,

    /// Request structured evidence summaries.
    pub use_structured_output: bool,

    /// Root holding `{drug}/` paper folders.
    pub drugs_dir: PathBuf,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            llm: DEFAULT_LLM.to_string(),
            summary_llm: DEFAULT_SUMMARY_LLM.to_string(),
            use_structured_output: DEFAULT_USE_STRUCTURED_OUTPUT,
            drugs_dir: PathBuf::from(DEFAULT_DRUGS_DIR),
        }
    }
}

impl AnalysisDefaults {
    /// Paper folder for a drug: `{drugs_dir}/{drug}`.
    pub fn paper_directory(&self, drug_name: &str) -> PathBuf {
        self.drugs_dir.join(drug_name.to_lowercase())
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory where result files are written.
    pub output_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl StorageConfig {
    /// Default path of the all-fields report for a drug.
    pub fn report_path(&self, drug_name: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}{}",
            drug_name.to_lowercase(),
            DEFAULT_REPORT_SUFFIX
        ))
    }

    /// Default path of a report covering a subset of fields.
    pub fn subset_report_path(&self, drug_name: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}{}",
            drug_name.to_lowercase(),
            DEFAULT_SUBSET_REPORT_SUFFIX
        ))
    }

    /// Default path of a single-field result.
    pub fn field_path(&self, drug_name: &str, field_slug: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.json", drug_name.to_lowercase(), field_slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gateway.base_url, DEFAULT_GATEWAY_URL);
        assert_eq!(config.analysis.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.analysis.llm, DEFAULT_LLM);
        assert!(config.analysis.use_structured_output);
    }

    #[test]
    fn test_config_to_toml() {
        let toml_str = Config::default_config_string();
        assert!(toml_str.contains("[gateway]"));
        assert!(toml_str.contains("[analysis]"));
        assert!(toml_str.contains("[storage]"));
        assert!(!toml_str.contains("api_key"));
    }

    #[test]
    fn test_invalid_temperature() {
        let result = Config::from_toml("[analysis]\ntemperature = 7.5\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_paper_directory_lowercases() {
        let defaults = AnalysisDefaults::default();
        assert_eq!(
            defaults.paper_directory("Meropenem"),
            PathBuf::from("./drugs").join("meropenem")
        );
    }
}

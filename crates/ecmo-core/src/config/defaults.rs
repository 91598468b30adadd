//! Default values for ecmo configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Gateway Defaults
// ============================================================================

/// Default base URL of the paper QA service.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8000";

/// Path appended to the base URL for questions.
pub const DEFAULT_ASK_PATH: &str = "ask";

/// Default request timeout in seconds.
///
/// A full question (search, gather evidence, answer) routinely takes minutes.
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 600;

// ============================================================================
// Analysis Defaults
// ============================================================================

/// Low temperature keeps answers consistent across runs.
pub const DEFAULT_TEMPERATURE: f64 = 0.1;

/// Default answering model.
pub const DEFAULT_LLM: &str = "gpt-4o-mini";

/// Default model used to summarize evidence chunks.
pub const DEFAULT_SUMMARY_LLM: &str = "gpt-4o-mini";

/// Ask the engine for structured (JSON) evidence summaries.
pub const DEFAULT_USE_STRUCTURED_OUTPUT: bool = true;

/// Root directory holding one paper folder per drug.
pub const DEFAULT_DRUGS_DIR: &str = "./drugs";

// ============================================================================
// Storage Defaults
// ============================================================================

/// Default directory for result files.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Suffix of the all-fields report file name: `{drug}_ecmo_analysis.json`.
pub const DEFAULT_REPORT_SUFFIX: &str = "_ecmo_analysis.json";

/// Suffix of a report covering only some fields: `{drug}_key_analysis.json`.
pub const DEFAULT_SUBSET_REPORT_SUFFIX: &str = "_key_analysis.json";

// ============================================================================
// Config Locations
// ============================================================================

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "ecmo.toml";

/// Directory under the user config dir.
pub const USER_CONFIG_DIR: &str = "ecmo";

/// File name under the user config dir.
pub const USER_CONFIG_FILE: &str = "config.toml";

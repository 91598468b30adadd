//! Configuration lookup and environment overrides.
//!
//! These touch process-wide state (environment, working directory), so they
//! live in their own test binary as a single test.

use std::path::PathBuf;

use ecmo_core::config::{DEFAULT_LLM, LOCAL_CONFIG_FILE, USER_CONFIG_DIR, USER_CONFIG_FILE};
use ecmo_core::{Config, ConfigError};
use tempfile::TempDir;

const OVERRIDE_VARS: [&str; 8] = [
    "ECMO_GATEWAY_URL",
    "ECMO_GATEWAY_API_KEY",
    "ECMO_GATEWAY_TIMEOUT_SECS",
    "ECMO_LLM",
    "ECMO_SUMMARY_LLM",
    "ECMO_TEMPERATURE",
    "ECMO_DRUGS_DIR",
    "ECMO_OUTPUT_DIR",
];

fn clear_overrides() {
    for var in OVERRIDE_VARS {
        std::env::remove_var(var);
    }
}

fn lookup_order(temp: &TempDir) {
    let workdir = temp.path().join("project");
    let xdg = temp.path().join("xdg");
    let user_dir = xdg.join(USER_CONFIG_DIR);
    std::fs::create_dir_all(&workdir).unwrap();
    std::fs::create_dir_all(&user_dir).unwrap();

    let original_dir = std::env::current_dir().unwrap();
    std::env::set_current_dir(&workdir).unwrap();
    std::env::set_var("XDG_CONFIG_HOME", &xdg);

    // Nothing on disk: built-in defaults.
    let config = Config::load().unwrap();
    assert_eq!(config.analysis.llm, DEFAULT_LLM);

    // User config only.
    std::fs::write(
        user_dir.join(USER_CONFIG_FILE),
        "[analysis]\nllm = \"from-user-config\"\n",
    )
    .unwrap();
    let config = Config::load().unwrap();
    assert_eq!(config.analysis.llm, "from-user-config");

    // Project-local file wins over the user config.
    std::fs::write(
        workdir.join(LOCAL_CONFIG_FILE),
        "[analysis]\nllm = \"from-project\"\n",
    )
    .unwrap();
    let config = Config::load().unwrap();
    assert_eq!(config.analysis.llm, "from-project");

    std::env::set_current_dir(original_dir).unwrap();
    std::env::remove_var("XDG_CONFIG_HOME");
}

fn env_overrides(temp: &TempDir) {
    let path = temp.path().join("explicit.toml");
    std::fs::write(
        &path,
        r#"
[gateway]
base_url = "http://from-file:8000"
timeout_secs = 60

[analysis]
llm = "gpt-4o"
summary_llm = "gpt-4o"
temperature = 0.5
drugs_dir = "papers"

[storage]
output_dir = "from-file"
"#,
    )
    .unwrap();

    std::env::set_var("ECMO_GATEWAY_URL", "http://from-env:9000");
    std::env::set_var("ECMO_GATEWAY_API_KEY", "env-key");
    std::env::set_var("ECMO_GATEWAY_TIMEOUT_SECS", "30");
    std::env::set_var("ECMO_LLM", "env-llm");
    std::env::set_var("ECMO_SUMMARY_LLM", "env-summary-llm");
    std::env::set_var("ECMO_TEMPERATURE", "0.3");
    std::env::set_var("ECMO_DRUGS_DIR", "/srv/papers");
    std::env::set_var("ECMO_OUTPUT_DIR", "from-env");

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.gateway.base_url, "http://from-env:9000");
    assert_eq!(config.gateway.api_key.as_deref(), Some("env-key"));
    assert_eq!(config.gateway.timeout_secs, 30);
    assert_eq!(config.analysis.llm, "env-llm");
    assert_eq!(config.analysis.summary_llm, "env-summary-llm");
    assert_eq!(config.analysis.temperature, 0.3);
    assert_eq!(config.analysis.drugs_dir, PathBuf::from("/srv/papers"));
    assert_eq!(config.storage.output_dir, PathBuf::from("from-env"));

    // Unparseable numbers are ignored; the file value stays.
    std::env::set_var("ECMO_TEMPERATURE", "warm");
    std::env::set_var("ECMO_GATEWAY_TIMEOUT_SECS", "soon");
    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.analysis.temperature, 0.5);
    assert_eq!(config.gateway.timeout_secs, 60);

    // A parseable but out-of-range value still fails validation.
    std::env::set_var("ECMO_TEMPERATURE", "3.5");
    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::Invalid(_))
    ));

    clear_overrides();
}

#[test]
fn test_lookup_order_and_env_overrides() {
    let temp = TempDir::new().unwrap();
    clear_overrides();

    if cfg!(target_os = "linux") {
        lookup_order(&temp);
    }
    env_overrides(&temp);
}

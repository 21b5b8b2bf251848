//! Integration tests for configuration loading
//!
//! This module verifies:
//! - Config loading from files on disk
//! - Error classification for unreadable, malformed and invalid files
//! - Configuration flowing through to the check registry

mod common;

use common::TestResult;
use nbaudit::checks::{CheckRegistry, ScanError, ScanReport, SecretScanner};
use nbaudit::config::{CONFIG_FILE_NAME, ColorOption, Config, OutputFormat};
use nbaudit::error::ConfigError;
use nbaudit::notebook::{Cell, Notebook};
use nbaudit::types::CheckId;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct Unavailable;

impl SecretScanner for Unavailable {
    fn scan(&self, _notebook: &Path) -> Result<ScanReport, ScanError> {
        Err(ScanError::Unavailable("not installed".to_string()))
    }
}

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join(CONFIG_FILE_NAME);
    assert_ok!(fs::write(&path, content));
    path
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_full_config() -> TestResult {
    let temp_dir = TempDir::new()?;
    let path = write_config(
        &temp_dir,
        r#"
[discovery]
include = ["guides/**/*.ipynb"]

[checks]
adjacent-code = false

[conclusion]
min_cells = 6

[models]
valid = ["claude-sonnet-4-5", "claude-opus-4-1"]

[render]
required = true
output_dir = "review"
timeout_secs = 30

[output]
format = "jsonl"
color = "always"
"#,
    );

    let config = Config::load(&path)?;
    assert_eq!(config.discovery.include[0].as_str(), "guides/**/*.ipynb");
    assert!(!config.is_check_enabled(&assert_some!(CheckId::new("adjacent-code"))));
    assert_eq!(config.conclusion.min_cells, 6);
    assert_eq!(config.models.valid.len(), 2);
    assert!(config.render.required);
    assert_eq!(config.render.output_dir(), PathBuf::from("review"));
    assert_eq!(config.render.timeout().as_secs(), 30);
    assert_eq!(config.output.format, OutputFormat::Jsonl);
    assert_eq!(config.output.color, ColorOption::Always);
    Ok(())
}

#[test]
fn test_load_missing_file_is_io_error() {
    let temp_dir = assert_ok!(TempDir::new());
    let result = Config::load(temp_dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_load_malformed_toml_is_parse_error() {
    let temp_dir = assert_ok!(TempDir::new());
    let path = write_config(&temp_dir, "[render\nenabled = false");
    assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_load_wrong_type_is_parse_error() {
    let temp_dir = assert_ok!(TempDir::new());
    let path = write_config(&temp_dir, "[introduction]\nmin_length = \"long\"\n");
    assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_load_invalid_check_id_is_rejected() {
    let temp_dir = assert_ok!(TempDir::new());
    // Not a valid identifier at all
    let path = write_config(&temp_dir, "[checks]\n\"bad id\" = false\n");
    assert!(Config::load(&path).is_err());
}

#[test]
fn test_empty_render_command_only_matters_when_enabled() {
    assert!(matches!(
        Config::parse("[render]\ncommand = []\n"),
        Err(ConfigError::Validation(_))
    ));
    assert!(Config::parse("[render]\nenabled = false\ncommand = []\n").is_ok());
}

// ============================================================================
// Configuration reaching the checks
// ============================================================================

#[test]
fn test_thresholds_change_findings() -> TestResult {
    let notebook = Notebook::from_cells(vec![
        Cell::markdown("Setup: you need an API key."),
        Cell::code("import anthropic"),
        Cell::markdown("Done."),
    ]);

    let default_findings =
        CheckRegistry::from_config_with_scanner(&Config::default(), Arc::new(Unavailable))
            .run_all(&notebook);
    let relaxed = Config::parse(
        "[introduction]\nmin_length = 10\n\n[conclusion]\nmin_length = 5\n",
    )?;
    let relaxed_findings =
        CheckRegistry::from_config_with_scanner(&relaxed, Arc::new(Unavailable))
            .run_all(&notebook);

    let messages = |f: &nbaudit::findings::Findings| -> Vec<String> {
        f.advisory().iter().map(|x| x.message().to_string()).collect()
    };
    assert!(messages(&default_findings).iter().any(|m| m.contains("too short")));
    assert!(messages(&default_findings).iter().any(|m| m.contains("too brief")));
    assert!(!messages(&relaxed_findings).iter().any(|m| m.contains("too short")));
    assert!(!messages(&relaxed_findings).iter().any(|m| m.contains("too brief")));
    Ok(())
}

#[test]
fn test_custom_allow_list() -> TestResult {
    let config = Config::parse("[models]\nvalid = [\"claude-test-1\"]\n")?;
    let notebook = Notebook::from_cells(vec![
        Cell::markdown("intro"),
        Cell::code("MODEL = 'claude-test-1'\nOLD = 'claude-sonnet-4-5'"),
    ]);
    let findings =
        CheckRegistry::from_config_with_scanner(&config, Arc::new(Unavailable)).run_all(&notebook);

    assert_eq!(findings.blocking().len(), 1);
    assert_eq!(
        findings.blocking()[0].message(),
        "Invalid model 'claude-sonnet-4-5'. Valid models are: claude-test-1"
    );
    Ok(())
}

//! Integration tests for the check suite
//!
//! These run the full built-in registry against in-memory and on-disk
//! notebooks. The secret scanner is replaced by a stub so results do not
//! depend on tools installed on the machine.

mod common;

use common::TestResult;
use nbaudit::checks::{CheckRegistry, ScanError, ScanReport, SecretScanner};
use nbaudit::config::Config;
use nbaudit::findings::{Finding, Findings, Outcome};
use nbaudit::notebook::{Cell, CellSource, Notebook};
use nbaudit::types::{CellKind, CheckId, Severity};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

struct Unavailable;

impl SecretScanner for Unavailable {
    fn scan(&self, _notebook: &Path) -> Result<ScanReport, ScanError> {
        Err(ScanError::Unavailable("detect-secrets-hook: not found".to_string()))
    }
}

fn registry(config: &Config) -> CheckRegistry {
    CheckRegistry::from_config_with_scanner(config, Arc::new(Unavailable))
}

fn from_check<'a>(findings: &'a [Finding], id: &str) -> Vec<&'a Finding> {
    findings.iter().filter(|f| f.check().as_str() == id).collect()
}

#[test]
fn test_zero_cells_only_introduction_blocks() {
    let findings = registry(&Config::default()).run_all(&Notebook::default());

    assert_eq!(findings.blocking().len(), 1);
    assert_eq!(findings.blocking()[0].check().as_str(), "introduction");
    assert_eq!(findings.blocking()[0].message(), "Notebook is empty");
    // Nothing refers to a cell
    assert!(findings.iter().all(|f| f.cell().is_none()));
    assert!(from_check(findings.advisory(), "conclusion").is_empty());
}

#[test]
fn test_code_first_blocks_and_suite_is_idempotent() {
    let notebook = Notebook::from_cells(vec![
        Cell::code("import anthropic\nx = 1"),
        Cell::code("temp = x"),
        Cell::markdown("short"),
    ]);
    let registry = registry(&Config::default());

    let first = registry.run_all(&notebook);
    let second = registry.run_all(&notebook);

    let intro = from_check(first.blocking(), "introduction");
    assert_eq!(intro.len(), 1);
    assert_eq!(
        intro[0].message(),
        "First cell is not markdown (should be introduction)"
    );
    assert_eq!(first, second);
}

#[test]
fn test_invalid_model_name_blocks_once() {
    let notebook = Notebook::from_cells(vec![
        Cell::markdown("intro"),
        Cell::code("MODEL = \"claude-sonnet-4-5\"\nOTHER = \"claude-made-up-9\""),
    ]);
    let findings = registry(&Config::default()).run_all(&notebook);

    let invalid = from_check(findings.blocking(), "deprecated-patterns");
    assert_eq!(invalid.len(), 1);
    assert!(invalid[0].message().contains("'claude-made-up-9'"));
    assert!(!invalid[0].message().starts_with("Invalid model 'claude-sonnet-4-5'"));
    assert_eq!(invalid[0].cell(), Some(1));
}

#[test]
fn test_well_formed_four_cell_notebook() {
    let intro = format!(
        "# Building a classifier\nPrerequisites: an API key and Python 3.11. {}",
        "This guide walks through the problem, the audience and the result. ".repeat(3)
    );
    let conclusion = format!("## Conclusion\n{}", "We built and evaluated it. ".repeat(4));
    assert!(intro.chars().count() >= 250);
    assert!(conclusion.chars().count() >= 100 && conclusion.chars().count() < 150);

    let notebook = Notebook::from_cells(vec![
        Cell::markdown(intro),
        Cell::code("import anthropic"),
        Cell::code("client = anthropic.Anthropic()"),
        Cell::markdown(conclusion),
    ]);
    let findings = registry(&Config::default()).run_all(&notebook);

    assert!(from_check(findings.advisory(), "introduction").is_empty());
    assert!(from_check(findings.blocking(), "introduction").is_empty());
    assert!(from_check(findings.advisory(), "conclusion").is_empty());

    let adjacent = from_check(findings.advisory(), "adjacent-code");
    assert_eq!(adjacent.len(), 1);
    assert_eq!(adjacent[0].cell(), Some(2));
}

#[test]
fn test_secret_fallback_on_disk() -> TestResult {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("keys.ipynb");
    fs::write(
        &path,
        r#"{"cells": [
            {"cell_type": "markdown", "source": "intro"},
            {"cell_type": "code", "source": ["api_key = ", "\"sk-ant-abcdef0123456789\""]}
        ]}"#,
    )?;
    let notebook = Notebook::load(&path)?;

    let mut config = Config::default();
    config.checks.insert(assert_some!(CheckId::new("introduction")), false);
    let findings = registry(&config).run_all(&notebook);

    let blocking = from_check(findings.blocking(), "secret-scan");
    let advisory = from_check(findings.advisory(), "secret-scan");
    assert_eq!(blocking.len(), 1);
    assert_eq!(blocking[0].cell(), Some(1));
    assert_eq!(advisory.len(), 1);
    assert!(advisory[0].message().contains("basic secret detection"));
    assert_eq!(findings.outcome(), Outcome::Fail);
    Ok(())
}

#[test]
fn test_normalization_is_representation_invariant() {
    let fragments = vec![
        "import os\n".to_string(),
        "".to_string(),
        "print(os.getcwd())".to_string(),
    ];
    let joined = fragments.concat();

    let from_fragments = Cell::from_source(
        CellKind::Code,
        Some(&CellSource::Fragments(fragments.clone())),
    );
    let from_text = Cell::from_source(CellKind::Code, Some(&CellSource::Text(joined)));
    assert_eq!(from_fragments, from_text);

    let a = Notebook::from_cells(vec![from_fragments]);
    let b = Notebook::from_cells(vec![from_text]);
    let registry = registry(&Config::default());
    assert_eq!(registry.run_all(&a), registry.run_all(&b));
}

#[test]
fn test_outcome_fails_iff_blocking() {
    let id = assert_some!(CheckId::new("naming"));
    let advisory = Finding::new(id.clone(), Severity::Advisory, None, "a");
    let blocking = Finding::new(id, Severity::Blocking, Some(1), "b");

    for (advise, block) in [(false, false), (true, false), (false, true), (true, true)] {
        let mut findings = Findings::new();
        if advise {
            findings.push(advisory.clone());
        }
        if block {
            findings.push(blocking.clone());
        }
        assert_eq!(findings.outcome() == Outcome::Fail, block);
        assert_eq!(findings.outcome().passed(), !block);
    }
}

#[test]
fn test_broken_extra_pattern_is_isolated() -> TestResult {
    let config = Config::parse("[patterns]\nnaming = [\"(unclosed\"]\n")?;
    let notebook = Notebook::from_cells(vec![Cell::code("import os"), Cell::code("x = 1")]);
    let findings = registry(&config).run_all(&notebook);

    let naming = from_check(findings.advisory(), "naming");
    assert_eq!(naming.len(), 1);
    assert!(naming[0].message().starts_with("Check 'naming' failed:"));

    // Other checks still report
    assert_eq!(from_check(findings.blocking(), "introduction").len(), 1);
    assert_eq!(from_check(findings.advisory(), "adjacent-code").len(), 1);
    Ok(())
}

#[test]
fn test_extra_pattern_extends_builtin_set() -> TestResult {
    let config = Config::parse("[patterns]\nverbose-output = ['logging\\.basicConfig\\(level=logging\\.DEBUG']\n")?;
    let notebook = Notebook::from_cells(vec![
        Cell::markdown("intro"),
        Cell::code("logging.basicConfig(level=logging.DEBUG)"),
    ]);
    let findings = registry(&config).run_all(&notebook);

    let verbose = from_check(findings.advisory(), "verbose-output");
    assert_eq!(verbose.len(), 1);
    assert_eq!(verbose[0].cell(), Some(1));
    Ok(())
}

#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! Each notebook produces, one JSON object per line:
//! 1. One `finding` record per finding, blocking before advisory, each in
//!    the order the checks recorded them
//! 2. One `status` record
//!
//! A notebook that could not be validated produces only a `status` record
//! carrying the error.

use crate::engine::Report;
use crate::error::AuditError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// JSONL output formatter
pub struct JsonlFormatter;

impl JsonlFormatter {
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// Format one report as JSONL
    pub fn format(&self, report: &Report) -> String {
        let notebook = notebook_label(report);
        let mut output = String::new();

        for finding in report.findings.iter() {
            push_record(
                &mut output,
                &FindingRecord {
                    record_type: "finding",
                    notebook: notebook.clone(),
                    check: finding.check().as_str(),
                    severity: finding.severity().as_str(),
                    cell: finding.cell(),
                    message: finding.message(),
                },
            );
        }

        push_record(
            &mut output,
            &StatusRecord {
                record_type: "status",
                notebook,
                passed: report.passed(),
                blocking: report.findings.blocking().len() as u64,
                advisory: report.findings.advisory().len() as u64,
                rendered: report.rendered.clone(),
                error: None,
            },
        );

        output
    }

    /// Format the status record of a notebook that failed to validate
    pub fn format_error(&self, path: &Path, error: &AuditError) -> String {
        let mut output = String::new();
        push_record(
            &mut output,
            &StatusRecord {
                record_type: "status",
                notebook: path.display().to_string(),
                passed: false,
                blocking: 0,
                advisory: 0,
                rendered: None,
                error: Some(error.to_string()),
            },
        );
        output
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn notebook_label(report: &Report) -> String {
    report
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| report.name.clone())
}

fn push_record<T: Serialize>(output: &mut String, record: &T) {
    if let Ok(json) = serde_json::to_string(record) {
        output.push_str(&json);
        output.push('\n');
    }
}

/// Finding record for JSONL output
#[derive(Debug, Serialize)]
struct FindingRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    notebook: String,
    check: &'a str,
    severity: &'static str,
    cell: Option<usize>,
    message: &'a str,
}

/// Status record for JSONL output
#[derive(Debug, Serialize)]
struct StatusRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    notebook: String,
    passed: bool,
    blocking: u64,
    advisory: u64,
    rendered: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

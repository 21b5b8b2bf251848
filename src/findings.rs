#![forbid(unsafe_code)]

//! Finding accumulator
//!
//! `Findings` holds two insertion-ordered sequences, one per severity. A new
//! accumulator is created for every validation run and checks append to it
//! through a `Recorder` that stamps each finding with the check's ID.

use crate::types::{CheckId, Severity};
use std::fmt;

/// A single validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    check: CheckId,
    severity: Severity,
    cell: Option<usize>,
    message: String,
}

impl Finding {
    pub fn new(
        check: CheckId,
        severity: Severity,
        cell: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            check,
            severity,
            cell,
            message: message.into(),
        }
    }

    pub fn check(&self) -> &CheckId {
        &self.check
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Zero-based index of the cell the finding refers to
    pub fn cell(&self) -> Option<usize> {
        self.cell
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell {
            Some(index) => write!(f, "Cell {}: {}", index, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Binary outcome of a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        *self == Outcome::Pass
    }
}

/// Accumulated findings of one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    blocking: Vec<Finding>,
    advisory: Vec<Finding>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finding to the sequence matching its severity
    pub fn push(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Blocking => self.blocking.push(finding),
            Severity::Advisory => self.advisory.push(finding),
        }
    }

    /// Borrow the accumulator on behalf of one check
    pub fn recorder(&mut self, check: &CheckId) -> Recorder<'_> {
        Recorder {
            check: check.clone(),
            findings: self,
        }
    }

    pub fn blocking(&self) -> &[Finding] {
        &self.blocking
    }

    pub fn advisory(&self) -> &[Finding] {
        &self.advisory
    }

    pub fn is_empty(&self) -> bool {
        self.blocking.is_empty() && self.advisory.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocking.len() + self.advisory.len()
    }

    /// Blocking findings first, then advisory, each in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.blocking.iter().chain(self.advisory.iter())
    }

    /// Fail if and only if at least one blocking finding exists
    pub fn outcome(&self) -> Outcome {
        if self.blocking.is_empty() {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }
}

/// Write handle a check uses to append findings
#[derive(Debug)]
pub struct Recorder<'a> {
    check: CheckId,
    findings: &'a mut Findings,
}

impl Recorder<'_> {
    /// Record a blocking issue
    pub fn block(&mut self, cell: Option<usize>, message: impl Into<String>) {
        let finding = Finding::new(self.check.clone(), Severity::Blocking, cell, message);
        self.findings.push(finding);
    }

    /// Record an advisory warning
    pub fn advise(&mut self, cell: Option<usize>, message: impl Into<String>) {
        let finding = Finding::new(self.check.clone(), Severity::Advisory, cell, message);
        self.findings.push(finding);
    }

    pub fn check(&self) -> &CheckId {
        &self.check
    }
}

#![forbid(unsafe_code)]

//! Core domain types for nbaudit
//!
//! This module defines the fundamental types shared by the document model,
//! the checks and the report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Finding severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must be fixed; fails the run
    Blocking,
    /// Should be reviewed; never fails the run
    Advisory,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Blocking => "blocking",
            Severity::Advisory => "advisory",
        }
    }
}

/// Kind of a notebook cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Code,
    Markdown,
    /// Raw cells and anything the model does not recognize
    Other,
}

impl CellKind {
    /// Maps an nbformat `cell_type` value to a kind
    pub fn from_cell_type(cell_type: Option<&str>) -> Self {
        match cell_type {
            Some("code") => CellKind::Code,
            Some("markdown") => CellKind::Markdown,
            _ => CellKind::Other,
        }
    }
}

/// A validated check identifier
///
/// Check IDs must be non-empty and contain only alphanumeric characters, hyphens, and underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CheckId(String);

impl CheckId {
    /// Creates a new CheckId, validating the input
    ///
    /// Returns None if the input is empty or contains invalid characters
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            return None;
        }
        if !id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return None;
        }
        Some(CheckId(id))
    }

    /// Builds an ID from a compile-time constant known to be valid
    pub(crate) fn from_static(id: &'static str) -> Self {
        debug_assert!(CheckId::new(id).is_some(), "invalid builtin check id {id}");
        CheckId(id.to_string())
    }

    /// Returns the check ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CheckId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CheckId::new(value.clone()).ok_or_else(|| format!("Invalid check ID '{}'", value))
    }
}

impl From<CheckId> for String {
    fn from(check_id: CheckId) -> Self {
        check_id.0
    }
}

/// A glob pattern for notebook discovery
///
/// This is a simple wrapper around a string that will be used with the `globset` crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobPattern(String);

impl GlobPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        GlobPattern(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GlobPattern {
    fn from(pattern: &str) -> Self {
        GlobPattern(pattern.to_string())
    }
}

#![forbid(unsafe_code)]

//! Core Check trait and related types for defining and executing checks

use crate::error::CheckError;
use crate::findings::Recorder;
use crate::notebook::Notebook;
use crate::types::CheckId;
use std::path::Path;

/// Execution context provided to checks when they run
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    /// The document under validation; read-only for the whole run
    pub notebook: &'a Notebook,
}

impl<'a> CheckContext<'a> {
    pub fn new(notebook: &'a Notebook) -> Self {
        Self { notebook }
    }

    /// Location the notebook was loaded from, if any
    pub fn source(&self) -> Option<&'a Path> {
        self.notebook.source()
    }
}

/// Trait that all checks must implement
///
/// A check inspects the notebook and appends zero or more findings. Checks
/// are independent: none reads another's findings. The trait is
/// `Send + Sync` so one registry can serve a parallel batch.
pub trait Check: Send + Sync {
    /// Returns the unique identifier for this check
    fn id(&self) -> &CheckId;

    /// Returns a human-readable description of what this check inspects
    fn description(&self) -> &str;

    /// Runs the check, appending findings through `out`
    ///
    /// An `Err` is recorded by the runner as an advisory finding; findings
    /// appended before the error are kept.
    fn run(&self, ctx: &CheckContext<'_>, out: &mut Recorder<'_>) -> Result<(), CheckError>;
}

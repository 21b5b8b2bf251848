#![forbid(unsafe_code)]

//! Code-cell hygiene checks driven by pattern sets
//!
//! Each check here is a thin policy over a `PatternSet`: which cells to scan
//! and how many findings a cell may produce.

use crate::checks::builtin::{INSTALL_OUTPUT, NAMING, VERBOSE_OUTPUT};
use crate::checks::{Check, CheckContext, PatternSet};
use crate::error::{CheckError, PatternError};
use crate::findings::Recorder;
use crate::types::CheckId;

/// Flags package installs whose output is not suppressed
pub struct InstallOutputCheck {
    id: CheckId,
    installs: Result<PatternSet, PatternError>,
    suppressions: Result<PatternSet, PatternError>,
}

impl InstallOutputCheck {
    pub fn new(
        installs: Result<PatternSet, PatternError>,
        suppressions: Result<PatternSet, PatternError>,
    ) -> Self {
        Self {
            id: CheckId::from_static(INSTALL_OUTPUT),
            installs,
            suppressions,
        }
    }
}

impl Check for InstallOutputCheck {
    fn id(&self) -> &CheckId {
        &self.id
    }

    fn description(&self) -> &str {
        "pip install output should be captured or quieted"
    }

    fn run(&self, ctx: &CheckContext<'_>, out: &mut Recorder<'_>) -> Result<(), CheckError> {
        let installs = self.installs.as_ref().map_err(Clone::clone)?;
        let suppressions = self.suppressions.as_ref().map_err(Clone::clone)?;

        for (index, cell) in ctx.notebook.code_cells() {
            if installs.is_match(cell.text()) && !suppressions.is_match(cell.text()) {
                out.advise(
                    Some(index),
                    "pip install without output suppression (use %%capture or %pip)",
                );
            }
        }

        Ok(())
    }
}

/// Flags debug prints, debug logging calls and verbose flags
pub struct VerboseOutputCheck {
    id: CheckId,
    patterns: Result<PatternSet, PatternError>,
}

impl VerboseOutputCheck {
    pub fn new(patterns: Result<PatternSet, PatternError>) -> Self {
        Self {
            id: CheckId::from_static(VERBOSE_OUTPUT),
            patterns,
        }
    }
}

impl Check for VerboseOutputCheck {
    fn id(&self) -> &CheckId {
        &self.id
    }

    fn description(&self) -> &str {
        "Code cells should not leave debug output enabled"
    }

    fn run(&self, ctx: &CheckContext<'_>, out: &mut Recorder<'_>) -> Result<(), CheckError> {
        let patterns = self.patterns.as_ref().map_err(Clone::clone)?;

        for (index, cell) in ctx.notebook.code_cells() {
            if patterns.is_match(cell.text()) {
                out.advise(Some(index), "Contains verbose debug output");
            }
        }

        Ok(())
    }
}

/// Flags low-information identifiers such as `x1`, `temp` or `data2`
pub struct NamingCheck {
    id: CheckId,
    patterns: Result<PatternSet, PatternError>,
}

impl NamingCheck {
    pub fn new(patterns: Result<PatternSet, PatternError>) -> Self {
        Self {
            id: CheckId::from_static(NAMING),
            patterns,
        }
    }
}

impl Check for NamingCheck {
    fn id(&self) -> &CheckId {
        &self.id
    }

    fn description(&self) -> &str {
        "Variables should have descriptive names"
    }

    fn run(&self, ctx: &CheckContext<'_>, out: &mut Recorder<'_>) -> Result<(), CheckError> {
        let patterns = self.patterns.as_ref().map_err(Clone::clone)?;

        for (index, cell) in ctx.notebook.code_cells() {
            let tokens = patterns.distinct_matches(cell.text());
            if !tokens.is_empty() {
                out.advise(
                    Some(index),
                    format!("Contains unclear variable names: {}", tokens.join(", ")),
                );
            }
        }

        Ok(())
    }
}

#![forbid(unsafe_code)]

//! Check registry and runner
//!
//! The registry holds checks in registration order and runs each exactly
//! once per notebook against a fresh accumulator. A check that returns an
//! error or panics is recorded as an advisory finding naming the check, and
//! the remaining checks still run.

use crate::checks::builtin;
use crate::checks::secrets::{DetectSecrets, SecretScanner};
use crate::checks::{Check, CheckContext};
use crate::config::Config;
use crate::error::CheckError;
use crate::findings::Findings;
use crate::notebook::Notebook;
use crate::types::CheckId;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Ordered registry of checks
pub struct CheckRegistry {
    checks: Vec<Box<dyn Check>>,
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.checks.iter().map(|c| c.id().as_str()))
            .finish()
    }
}

impl CheckRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Build the built-in checks, using detect-secrets as the scanner
    pub fn from_config(config: &Config) -> Self {
        let scanner = Arc::new(DetectSecrets::from_config(&config.secrets));
        Self::from_config_with_scanner(config, scanner)
    }

    /// Build the built-in checks with an explicit secret scanner
    ///
    /// Checks disabled in the `[checks]` table are left out; the rest keep
    /// their fixed built-in order.
    pub fn from_config_with_scanner(config: &Config, scanner: Arc<dyn SecretScanner>) -> Self {
        let mut registry = Self::new();
        for check in builtin::builtin_checks(config, scanner) {
            if !config.is_check_enabled(check.id()) {
                log::debug!("check {} disabled by configuration", check.id());
                continue;
            }
            // Built-in IDs are unique
            let _ = registry.register(check);
        }
        registry
    }

    /// Append a check to the end of the run order
    ///
    /// # Errors
    ///
    /// Returns `CheckError::Other` if a check with the same ID is already registered.
    pub fn register(&mut self, check: Box<dyn Check>) -> Result<(), CheckError> {
        if self.get(check.id()).is_some() {
            return Err(CheckError::Other(format!(
                "Duplicate check ID '{}'",
                check.id()
            )));
        }
        self.checks.push(check);
        Ok(())
    }

    /// Run every registered check against a notebook
    pub fn run_all(&self, notebook: &Notebook) -> Findings {
        let mut findings = Findings::new();
        self.run_into(notebook, &mut findings);
        findings
    }

    /// Run every registered check, appending to an existing accumulator
    pub fn run_into(&self, notebook: &Notebook, findings: &mut Findings) {
        let ctx = CheckContext::new(notebook);

        for check in &self.checks {
            log::debug!("running check {}", check.id());
            let mut recorder = findings.recorder(check.id());

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| check.run(&ctx, &mut recorder)));

            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(payload) => Some(panic_message(payload.as_ref())),
            };

            if let Some(reason) = failure {
                log::warn!("check {} failed: {}", check.id(), reason);
                recorder.advise(None, format!("Check '{}' failed: {}", check.id(), reason));
            }
        }
    }

    pub fn get(&self, id: &CheckId) -> Option<&dyn Check> {
        self.checks
            .iter()
            .find(|c| c.id() == id)
            .map(|boxed| boxed.as_ref())
    }

    /// Iterate over checks in run order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Check> {
        self.checks.iter().map(|boxed| boxed.as_ref())
    }

    /// IDs of the registered checks in run order
    pub fn ids(&self) -> Vec<&CheckId> {
        self.checks.iter().map(|c| c.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

#![forbid(unsafe_code)]

//! Per-notebook validation pipeline
//!
//! load → render (optional) → run every check → report. Batch validation
//! runs notebooks in parallel with rayon; each notebook gets its own
//! accumulator and results come back in input order.

use crate::checks::CheckRegistry;
use crate::config::Config;
use crate::error::AuditError;
use crate::findings::{Findings, Outcome};
use crate::notebook::Notebook;
use crate::render::Renderer;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Result of validating one notebook
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Short name shown in report headers
    pub name: String,
    /// Source path, when the notebook came from disk
    pub path: Option<PathBuf>,
    /// Markdown rendering written for review, if any
    pub rendered: Option<PathBuf>,
    pub findings: Findings,
}

impl Report {
    pub fn outcome(&self) -> Outcome {
        self.findings.outcome()
    }

    pub fn passed(&self) -> bool {
        self.outcome().passed()
    }
}

/// Validates notebooks against a check registry
#[derive(Debug)]
pub struct Validator {
    registry: CheckRegistry,
    renderer: Option<Renderer>,
    render_required: bool,
}

impl Validator {
    /// Built-in checks and renderer as configured
    pub fn new(config: &Config) -> Self {
        Self::with_registry(CheckRegistry::from_config(config), config)
    }

    pub fn with_registry(registry: CheckRegistry, config: &Config) -> Self {
        let renderer = config
            .render
            .enabled
            .then(|| Renderer::from_config(&config.render));
        Self {
            registry,
            renderer,
            render_required: config.render.required,
        }
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Validate the notebook at `path`
    ///
    /// # Errors
    ///
    /// - `AuditError::Notebook` if the file is missing, unreadable or malformed
    /// - `AuditError::Render` if rendering is required and fails
    pub fn validate(&self, path: &Path) -> Result<Report, AuditError> {
        let target = self.renderer.as_ref().map(|r| r.output_path(path));
        self.validate_with(path, target.as_deref())
    }

    fn validate_with(&self, path: &Path, target: Option<&Path>) -> Result<Report, AuditError> {
        let notebook = Notebook::load(path)?;
        log::debug!("loaded {} ({} cells)", path.display(), notebook.len());

        let rendered = self.render(path, target)?;
        let mut report = self.validate_notebook(&notebook);
        report.rendered = rendered;
        Ok(report)
    }

    /// Run every check against an already-loaded notebook
    pub fn validate_notebook(&self, notebook: &Notebook) -> Report {
        let name = notebook
            .source()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| notebook.display_name());

        Report {
            name,
            path: notebook.source().map(Path::to_path_buf),
            rendered: None,
            findings: self.registry.run_all(notebook),
        }
    }

    /// Validate several notebooks in parallel, results in input order
    ///
    /// Render targets are assigned up front so notebooks sharing a file
    /// stem never write the same artifact.
    pub fn validate_all(&self, paths: &[PathBuf]) -> Vec<(PathBuf, Result<Report, AuditError>)> {
        let targets: Vec<Option<PathBuf>> = match &self.renderer {
            Some(renderer) => renderer.output_paths(paths).into_iter().map(Some).collect(),
            None => vec![None; paths.len()],
        };

        paths
            .par_iter()
            .zip(&targets)
            .map(|(path, target)| (path.clone(), self.validate_with(path, target.as_deref())))
            .collect()
    }

    fn render(&self, path: &Path, target: Option<&Path>) -> Result<Option<PathBuf>, AuditError> {
        let (Some(renderer), Some(target)) = (&self.renderer, target) else {
            return Ok(None);
        };

        match renderer.render_to(path, target) {
            Ok(output) => Ok(Some(output)),
            Err(e) if self.render_required => Err(e.into()),
            Err(e) => {
                log::warn!("could not render {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }
}

#![forbid(unsafe_code)]

//! Secret scanning
//!
//! The primary path runs the detect-secrets pre-commit hook against the
//! notebook file. When the hook cannot be run, a degraded fallback matches
//! code cells against the `secret-shapes` pattern set and says so in an
//! advisory finding.

use crate::checks::builtin::SECRET_SCAN;
use crate::checks::{Check, CheckContext, PatternSet};
use crate::config::SecretsConfig;
use crate::error::{CheckError, PatternError};
use crate::findings::Recorder;
use crate::process;
use crate::types::CheckId;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Marker directory identifying the repository root
const REPO_MARKER: &str = ".git";

/// Raw result of an external scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Scanner exited successfully (nothing found)
    pub clean: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Why the external scanner produced no report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// Tool missing, not configured, or timed out
    #[error("{0}")]
    Unavailable(String),

    /// Tool present but could not be run
    #[error("{0}")]
    Failed(String),
}

/// An external secret scanner
pub trait SecretScanner: Send + Sync {
    fn scan(&self, notebook: &Path) -> Result<ScanReport, ScanError>;
}

/// Scanner backed by the `detect-secrets-hook` command
#[derive(Debug, Clone)]
pub struct DetectSecrets {
    command: Vec<String>,
    timeout: Duration,
    max_search_depth: usize,
}

impl DetectSecrets {
    pub fn from_config(config: &SecretsConfig) -> Self {
        Self {
            command: config.command.clone(),
            timeout: config.timeout(),
            max_search_depth: config.max_search_depth,
        }
    }
}

impl SecretScanner for DetectSecrets {
    fn scan(&self, notebook: &Path) -> Result<ScanReport, ScanError> {
        let notebook = std::path::absolute(notebook)
            .map_err(|e| ScanError::Failed(format!("{}: {}", notebook.display(), e)))?;
        let start = notebook.parent().unwrap_or(Path::new("/"));

        let repo_root = find_repo_root(start, self.max_search_depth);
        if repo_root.is_none() {
            log::debug!(
                "no {} marker within {} levels of {}",
                REPO_MARKER,
                self.max_search_depth,
                start.display()
            );
        }
        let workdir = repo_root.clone().unwrap_or_else(|| start.to_path_buf());

        let mut command = process::command_from(&self.command)
            .map_err(|e| ScanError::Unavailable(e.to_string()))?;

        if let Some(root) = &repo_root
            && let Some(baseline) = find_baseline(root)
        {
            command.arg("--baseline").arg(baseline);
            let plugins = root.join("scripts").join("detect-secrets").join("plugins.py");
            if plugins.is_file() {
                command.arg("--plugin").arg(plugins);
            }
            command.arg("--verbose");
        }
        command.arg(&notebook).current_dir(&workdir);

        let output = process::run(&mut command, self.timeout).map_err(|e| {
            if e.is_unavailable() {
                ScanError::Unavailable(e.to_string())
            } else {
                ScanError::Failed(e.to_string())
            }
        })?;

        Ok(ScanReport {
            clean: output.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Walk upward from `start` looking for a `.git` marker
///
/// At most `max_depth` parent directories are visited beyond `start`.
pub fn find_repo_root(start: &Path, max_depth: usize) -> Option<PathBuf> {
    let mut current = Some(start);
    for _ in 0..=max_depth {
        let dir = current?;
        if dir.join(REPO_MARKER).exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

/// First existing baseline file under the repository root
fn find_baseline(root: &Path) -> Option<PathBuf> {
    [
        root.join("scripts")
            .join("detect-secrets")
            .join(".secrets.baseline"),
        root.join(".secrets.baseline"),
    ]
    .into_iter()
    .find(|p| p.is_file())
}

/// One secret reported by detect-secrets
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecretHit {
    pub secret_type: Option<String>,
    pub location: Option<String>,
}

impl SecretHit {
    fn describe(&self) -> String {
        let mut message = "Potential hardcoded secret".to_string();
        if let Some(kind) = &self.secret_type {
            message.push_str(&format!(" ({})", kind));
        }
        if let Some(location) = &self.location {
            message.push_str(&format!(" at {}", location));
        }
        message
    }
}

/// Extract `Secret Type:` / `Location:` pairs from hook output
pub fn parse_hook_output(output: &str) -> Vec<SecretHit> {
    let mut hits: Vec<SecretHit> = Vec::new();

    for line in output.lines().map(str::trim) {
        if let Some(kind) = line.strip_prefix("Secret Type:") {
            hits.push(SecretHit {
                secret_type: Some(kind.trim().to_string()),
                location: None,
            });
        } else if let Some(location) = line.strip_prefix("Location:") {
            let location = Some(location.trim().to_string());
            match hits.last_mut() {
                Some(hit) if hit.location.is_none() => hit.location = location,
                _ => hits.push(SecretHit {
                    secret_type: None,
                    location,
                }),
            }
        }
    }

    hits
}

/// Runs the external scanner, falling back to local pattern matching
pub struct SecretScanCheck {
    id: CheckId,
    scanner: Arc<dyn SecretScanner>,
    shapes: Result<PatternSet, PatternError>,
}

impl SecretScanCheck {
    pub fn new(scanner: Arc<dyn SecretScanner>, shapes: Result<PatternSet, PatternError>) -> Self {
        Self {
            id: CheckId::from_static(SECRET_SCAN),
            scanner,
            shapes,
        }
    }

    fn record_report(&self, notebook: &Path, report: &ScanReport, out: &mut Recorder<'_>) {
        let output = match report.stdout.trim() {
            "" => report.stderr.trim(),
            stdout => stdout,
        };
        log::debug!("detect-secrets output:\n{}", output);

        if output.is_empty() {
            out.block(
                None,
                format!(
                    "Potential secrets detected. Run 'detect-secrets-hook {}' for details.",
                    notebook.display()
                ),
            );
            return;
        }

        let hits = parse_hook_output(output);
        if hits.is_empty() {
            out.block(
                None,
                format!(
                    "Contains potential secrets. Run 'detect-secrets-hook {}' for details.",
                    notebook.display()
                ),
            );
        }
        for hit in hits {
            out.block(None, hit.describe());
        }
    }

    fn fallback(&self, ctx: &CheckContext<'_>, out: &mut Recorder<'_>) -> Result<(), CheckError> {
        let shapes = self.shapes.as_ref().map_err(Clone::clone)?;

        for (index, cell) in ctx.notebook.code_cells() {
            for pattern in shapes.matching(cell.text()) {
                out.block(
                    Some(index),
                    format!("Contains hardcoded {}", pattern.name()),
                );
            }
        }

        Ok(())
    }
}

impl Check for SecretScanCheck {
    fn id(&self) -> &CheckId {
        &self.id
    }

    fn description(&self) -> &str {
        "Notebook must not contain hardcoded credentials"
    }

    fn run(&self, ctx: &CheckContext<'_>, out: &mut Recorder<'_>) -> Result<(), CheckError> {
        let Some(source) = ctx.source() else {
            out.advise(
                None,
                "Notebook has no source file - using basic secret detection",
            );
            return self.fallback(ctx, out);
        };

        match self.scanner.scan(source) {
            Ok(report) if report.clean => Ok(()),
            Ok(report) => {
                self.record_report(source, &report, out);
                Ok(())
            }
            Err(ScanError::Unavailable(reason)) => {
                log::warn!("detect-secrets unavailable ({}); using basic detection", reason);
                out.advise(
                    None,
                    "detect-secrets not found - using basic secret detection. \
                     Install with: pip install detect-secrets",
                );
                self.fallback(ctx, out)
            }
            Err(ScanError::Failed(reason)) => {
                log::warn!("detect-secrets failed: {}", reason);
                out.advise(None, format!("Error running detect-secrets: {}", reason));
                self.fallback(ctx, out)
            }
        }
    }
}

//! Error types for nbaudit
//!
//! Errors are grouped by concern. Only `NotebookError`, `ConfigError` and a
//! required `RenderError` abort a validation run; `CheckError` never escapes
//! the check runner.

use std::path::PathBuf;
use std::time::Duration;

/// Errors raised while loading a notebook document
#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    /// The notebook path does not exist
    #[error("Notebook not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The bytes are not a valid notebook document
    #[error("{} is not a valid notebook: {message}", path_label(.path))]
    Malformed {
        path: Option<PathBuf>,
        message: String,
    },

    /// Any other I/O failure while reading the notebook
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn path_label(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "input".to_string(),
    }
}

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid TOML syntax or shape
    #[error("Invalid configuration syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantically invalid configuration value
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Errors raised while compiling a pattern set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// The TOML definition could not be parsed
    #[error("Invalid pattern set definition: {0}")]
    InvalidDefinition(String),

    /// A regular expression failed to compile
    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },
}

/// Errors a single check may report to the runner
///
/// These are recorded as advisory findings and never abort the run.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The check's pattern set could not be compiled
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Any other failure inside a check
    #[error("{0}")]
    Other(String),
}

/// Errors from running an external process
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The command was empty
    #[error("No command configured")]
    EmptyCommand,

    /// The program could not be found on PATH
    #[error("Command not found: {0}")]
    NotFound(String),

    /// The program did not finish before the deadline
    #[error("Command '{program}' timed out after {timeout:?}")]
    TimedOut { program: String, timeout: Duration },

    /// Spawning or waiting failed
    #[error("Failed to run '{program}': {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },
}

impl ProcessError {
    /// Returns true when the tool should be treated as absent
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ProcessError::NotFound(_) | ProcessError::TimedOut { .. } | ProcessError::EmptyCommand
        )
    }
}

/// Errors from the notebook-to-markdown renderer
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The renderer could not be launched or timed out
    #[error("Renderer unavailable: {0}")]
    Process(#[from] ProcessError),

    /// The renderer exited with a non-zero status
    #[error("Renderer exited with status {code}: {stderr}")]
    Failed { code: i32, stderr: String },

    /// The output directory could not be prepared
    #[error("Failed to prepare render output {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Top-level error type for a validation run
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// Notebook could not be loaded
    #[error(transparent)]
    Notebook(#[from] NotebookError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rendering was required and failed
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    /// Notebook discovery failed
    #[error("Discovery error: {0}")]
    Discovery(#[from] crate::engine::discovery::DiscoveryError),
}

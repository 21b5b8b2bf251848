#![forbid(unsafe_code)]

//! nbaudit: rule-based validation of Jupyter notebooks
//!
//! A notebook is loaded as an ordered sequence of typed cells, a fixed
//! battery of independent checks runs against it, and every finding is
//! classified as blocking or advisory. Any blocking finding fails the run.

pub mod checks;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod findings;
pub mod notebook;
pub mod output;
pub mod process;
pub mod render;
pub mod types;

// Re-export error types for convenient access
pub use error::{AuditError, CheckError, ConfigError, NotebookError, PatternError, RenderError};

// Re-export core domain types for convenient access
pub use findings::{Finding, Findings, Outcome};
pub use notebook::{Cell, Notebook};
pub use types::{CellKind, CheckId, GlobPattern, Severity};

#![forbid(unsafe_code)]

//! Checks, pattern sets and the check registry

pub mod builtin;
mod check;
pub mod hygiene;
pub mod models;
mod pattern_set;
mod registry;
pub mod secrets;
pub mod structure;

pub use check::{Check, CheckContext};
pub use pattern_set::{Pattern, PatternSet};
pub use registry::CheckRegistry;
pub use secrets::{DetectSecrets, ScanError, ScanReport, SecretScanner};

//! Notebook discovery and the validation pipeline

pub mod discovery;
pub mod validator;

pub use discovery::{Discovery, DiscoveryError};
pub use validator::{Report, Validator};

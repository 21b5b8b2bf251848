//! Configuration file parsing and validation

pub mod nbaudit_toml;

pub use nbaudit_toml::{
    ColorOption, ConclusionConfig, Config, DiscoveryConfig, IntroductionConfig, ModelsConfig,
    OutputConfig, OutputFormat, RenderConfig, SecretsConfig,
};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "nbaudit.toml";

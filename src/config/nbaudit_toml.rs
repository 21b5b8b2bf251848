//! Parsing and validation for nbaudit.toml configuration files

use crate::checks::builtin::{BUILTIN_CHECK_IDS, BUILTIN_PATTERN_SETS};
use crate::error::ConfigError;
use crate::types::{CheckId, GlobPattern};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration struct for nbaudit.toml
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Notebook discovery for directory arguments
    pub discovery: DiscoveryConfig,

    /// Check enablement, keyed by check ID
    pub checks: HashMap<CheckId, bool>,

    /// Extra regexes appended to built-in pattern sets, keyed by set ID
    pub patterns: HashMap<String, Vec<String>>,

    pub introduction: IntroductionConfig,

    pub conclusion: ConclusionConfig,

    pub models: ModelsConfig,

    pub secrets: SecretsConfig,

    pub render: RenderConfig,

    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Whether a check should be registered
    ///
    /// Checks are enabled unless explicitly disabled.
    pub fn is_check_enabled(&self, id: &CheckId) -> bool {
        self.checks.get(id).copied().unwrap_or(true)
    }

    /// Extra patterns configured for a pattern set
    pub fn extra_patterns(&self, set_id: &str) -> &[String] {
        self.patterns.get(set_id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for pattern in self
            .discovery
            .include
            .iter()
            .chain(self.discovery.exclude.iter())
        {
            globset::Glob::new(pattern.as_str()).map_err(|e| {
                ConfigError::Validation(format!(
                    "Invalid discovery glob pattern '{}': {}",
                    pattern.as_str(),
                    e
                ))
            })?;
        }

        for check_id in self.checks.keys() {
            if !BUILTIN_CHECK_IDS.contains(&check_id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "Unknown check '{}' in [checks]. Known checks: {}",
                    check_id,
                    BUILTIN_CHECK_IDS.join(", ")
                )));
            }
        }

        let known_sets: Vec<&str> = BUILTIN_PATTERN_SETS.iter().map(|(id, _)| *id).collect();
        for set_id in self.patterns.keys() {
            if !known_sets.contains(&set_id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "Unknown pattern set '{}' in [patterns]. Known sets: {}",
                    set_id,
                    known_sets.join(", ")
                )));
            }
        }

        if self.models.prefix.is_empty() {
            return Err(ConfigError::Validation(
                "models.prefix must not be empty".to_string(),
            ));
        }

        for model in &self.models.valid {
            if !model.starts_with(&self.models.prefix) {
                return Err(ConfigError::Validation(format!(
                    "Valid model '{}' does not start with prefix '{}'",
                    model, self.models.prefix
                )));
            }
        }

        if self.secrets.timeout_secs == 0 || self.render.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.render.enabled && self.render.command.is_empty() {
            return Err(ConfigError::Validation(
                "render.command must not be empty when rendering is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

/// Discovery section: which files count as notebooks inside directories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub include: Vec<GlobPattern>,
    pub exclude: Vec<GlobPattern>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            include: vec![GlobPattern::new("**/*.ipynb")],
            exclude: vec![GlobPattern::new("**/.ipynb_checkpoints/**")],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroductionConfig {
    /// Minimum introduction length in characters
    pub min_length: usize,

    /// Words that indicate the introduction lists prerequisites
    pub keywords: Vec<String>,
}

impl Default for IntroductionConfig {
    fn default() -> Self {
        Self {
            min_length: 200,
            keywords: ["prerequisite", "requirement", "need", "require"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConclusionConfig {
    /// Minimum conclusion length in characters
    pub min_length: usize,

    /// Number of trailing cells searched for a markdown conclusion
    pub window: usize,

    /// Notebooks shorter than this are not required to conclude
    pub min_cells: usize,
}

impl Default for ConclusionConfig {
    fn default() -> Self {
        Self {
            min_length: 100,
            window: 5,
            min_cells: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Vendor prefix every model identifier starts with
    pub prefix: String,

    /// Allow-list of model identifiers
    pub valid: Vec<String>,

    /// Number of leading code cells searched for a model constant
    pub constant_window: usize,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            prefix: "claude-".to_string(),
            valid: ["claude-sonnet-4-5", "claude-haiku-4-5", "claude-opus-4-1"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            constant_window: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// Program and leading arguments of the detect-secrets hook
    pub command: Vec<String>,

    pub timeout_secs: u64,

    /// Maximum number of parent directories searched for a `.git` marker
    pub max_search_depth: usize,
}

impl SecretsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            command: ["uvx", "--from", "detect-secrets", "detect-secrets-hook"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timeout_secs: 60,
            max_search_depth: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Produce a markdown rendering before checking
    pub enabled: bool,

    /// Treat a rendering failure as fatal for the notebook
    pub required: bool,

    /// Program and leading arguments of the nbconvert invocation
    pub command: Vec<String>,

    /// Where `<stem>_review.md` files are written; defaults to a temp directory
    pub output_dir: Option<PathBuf>,

    pub timeout_secs: u64,
}

impl RenderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolved output directory
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("nbaudit-review"))
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            required: false,
            command: ["uv", "run", "--with", "nbconvert", "jupyter", "nbconvert"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output_dir: None,
            timeout_secs: 120,
        }
    }
}

/// Output configuration section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color: ColorOption,
}

/// Output format options
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Human,
    /// JSON Lines (one record per finding plus a status record)
    Jsonl,
}

/// Color output options
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorOption {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

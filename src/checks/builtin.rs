#![forbid(unsafe_code)]

//! Built-in checks and the pattern sets embedded at compile time
//!
//! Pattern sets are compiled into the binary using `include_str!` so the
//! validator runs without external definition files.

use crate::checks::hygiene::{InstallOutputCheck, NamingCheck, VerboseOutputCheck};
use crate::checks::models::{DeprecatedPatternsCheck, ModelConstantCheck};
use crate::checks::secrets::{SecretScanCheck, SecretScanner};
use crate::checks::structure::{AdjacentCodeCheck, ConclusionCheck, IntroductionCheck};
use crate::checks::{Check, PatternSet};
use crate::config::Config;
use crate::error::PatternError;
use std::sync::Arc;

pub const SECRET_SCAN: &str = "secret-scan";
pub const INTRODUCTION: &str = "introduction";
pub const INSTALL_OUTPUT: &str = "install-output";
pub const ADJACENT_CODE: &str = "adjacent-code";
pub const VERBOSE_OUTPUT: &str = "verbose-output";
pub const NAMING: &str = "naming";
pub const MODEL_CONSTANT: &str = "model-constant";
pub const DEPRECATED_PATTERNS: &str = "deprecated-patterns";
pub const CONCLUSION: &str = "conclusion";

/// Built-in check IDs in run order
pub const BUILTIN_CHECK_IDS: &[&str] = &[
    SECRET_SCAN,
    INTRODUCTION,
    INSTALL_OUTPUT,
    ADJACENT_CODE,
    VERBOSE_OUTPUT,
    NAMING,
    MODEL_CONSTANT,
    DEPRECATED_PATTERNS,
    CONCLUSION,
];

/// Embedded pattern set definitions, keyed by set ID
pub const BUILTIN_PATTERN_SETS: &[(&str, &str)] = &[
    (
        "secret-shapes",
        include_str!("../../builtin-checks/secret-shapes.toml"),
    ),
    (
        "install-commands",
        include_str!("../../builtin-checks/install-commands.toml"),
    ),
    (
        "output-suppression",
        include_str!("../../builtin-checks/output-suppression.toml"),
    ),
    (
        "verbose-output",
        include_str!("../../builtin-checks/verbose-output.toml"),
    ),
    ("naming", include_str!("../../builtin-checks/naming.toml")),
    (
        "deprecated-api",
        include_str!("../../builtin-checks/deprecated-api.toml"),
    ),
];

/// Compile a built-in pattern set with its configured extras
///
/// # Errors
///
/// Returns `PatternError` if the set is unknown or any pattern fails to compile.
pub fn pattern_set(set_id: &str, config: &Config) -> Result<PatternSet, PatternError> {
    let (_, content) = BUILTIN_PATTERN_SETS
        .iter()
        .find(|(id, _)| *id == set_id)
        .ok_or_else(|| PatternError::InvalidDefinition(format!("Unknown pattern set '{}'", set_id)))?;

    PatternSet::from_toml(content)?.with_extra(config.extra_patterns(set_id))
}

/// Instantiate every built-in check in run order
///
/// Pattern compilation errors are carried into the affected check, which
/// reports them when it runs instead of preventing the others from running.
pub fn builtin_checks(config: &Config, scanner: Arc<dyn SecretScanner>) -> Vec<Box<dyn Check>> {
    vec![
        Box::new(SecretScanCheck::new(
            scanner,
            pattern_set("secret-shapes", config),
        )),
        Box::new(IntroductionCheck::new(&config.introduction)),
        Box::new(InstallOutputCheck::new(
            pattern_set("install-commands", config),
            pattern_set("output-suppression", config),
        )),
        Box::new(AdjacentCodeCheck::new()),
        Box::new(VerboseOutputCheck::new(pattern_set("verbose-output", config))),
        Box::new(NamingCheck::new(pattern_set("naming", config))),
        Box::new(ModelConstantCheck::new(&config.models)),
        Box::new(DeprecatedPatternsCheck::new(
            &config.models,
            pattern_set("deprecated-api", config),
        )),
        Box::new(ConclusionCheck::new(&config.conclusion)),
    ]
}

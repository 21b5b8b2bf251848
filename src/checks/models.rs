#![forbid(unsafe_code)]

//! Model identifier checks
//!
//! Model names are string literals starting with the configured vendor
//! prefix (`claude-` by default). One check wants them hoisted into a
//! constant near the top; the other rejects names outside the allow-list
//! and flags retired API surfaces.

use crate::checks::builtin::{DEPRECATED_PATTERNS, MODEL_CONSTANT};
use crate::checks::{Check, CheckContext, PatternSet};
use crate::config::ModelsConfig;
use crate::error::{CheckError, PatternError};
use crate::findings::Recorder;
use crate::types::CheckId;
use regex::Regex;

fn compile(source: String) -> Result<Regex, PatternError> {
    Regex::new(&source).map_err(|e| PatternError::InvalidRegex {
        pattern: source.clone(),
        message: e.to_string(),
    })
}

/// Regex matching any quoted literal that starts with the prefix
fn reference_regex(prefix: &str) -> Result<Regex, PatternError> {
    compile(format!(r#"["']{}"#, regex::escape(prefix)))
}

/// Recommends defining the model name once, near the top of the notebook
pub struct ModelConstantCheck {
    id: CheckId,
    window: usize,
    example: String,
    constant: Result<Regex, PatternError>,
    reference: Result<Regex, PatternError>,
}

impl ModelConstantCheck {
    pub fn new(config: &ModelsConfig) -> Self {
        let prefix = regex::escape(&config.prefix);
        Self {
            id: CheckId::from_static(MODEL_CONSTANT),
            window: config.constant_window,
            example: config
                .valid
                .first()
                .cloned()
                .unwrap_or_else(|| format!("{}...", config.prefix)),
            constant: compile(format!(
                r#"(MODEL|model|MODEL_NAME|model_name)\s*=\s*["']{}"#,
                prefix
            )),
            reference: reference_regex(&config.prefix),
        }
    }
}

impl Check for ModelConstantCheck {
    fn id(&self) -> &CheckId {
        &self.id
    }

    fn description(&self) -> &str {
        "Model name should be a constant defined in the first code cells"
    }

    fn run(&self, ctx: &CheckContext<'_>, out: &mut Recorder<'_>) -> Result<(), CheckError> {
        let constant = self.constant.as_ref().map_err(Clone::clone)?;
        let reference = self.reference.as_ref().map_err(Clone::clone)?;

        let has_constant = ctx
            .notebook
            .code_cells()
            .take(self.window)
            .any(|(_, cell)| constant.is_match(cell.text()));
        if has_constant {
            return Ok(());
        }

        let has_references = ctx
            .notebook
            .cells()
            .iter()
            .any(|cell| reference.is_match(cell.text()));
        if has_references {
            out.advise(
                None,
                format!(
                    "Model name should be defined as a constant at the top of the notebook \
                     (e.g., MODEL = '{}') to make future updates easier",
                    self.example
                ),
            );
        }

        Ok(())
    }
}

/// Rejects unknown model names and flags deprecated API usage
pub struct DeprecatedPatternsCheck {
    id: CheckId,
    prefix: String,
    valid: Vec<String>,
    model_literal: Result<Regex, PatternError>,
    deprecated: Result<PatternSet, PatternError>,
}

impl DeprecatedPatternsCheck {
    pub fn new(config: &ModelsConfig, deprecated: Result<PatternSet, PatternError>) -> Self {
        Self {
            id: CheckId::from_static(DEPRECATED_PATTERNS),
            prefix: config.prefix.clone(),
            valid: config.valid.clone(),
            model_literal: compile(format!(
                r#"["']{}([a-z0-9.-]+)["']"#,
                regex::escape(&config.prefix)
            )),
            deprecated,
        }
    }

    fn valid_list(&self) -> String {
        if self.valid.is_empty() {
            "(none configured)".to_string()
        } else {
            self.valid.join(", ")
        }
    }
}

impl Check for DeprecatedPatternsCheck {
    fn id(&self) -> &CheckId {
        &self.id
    }

    fn description(&self) -> &str {
        "Model names must be current and deprecated APIs avoided"
    }

    fn run(&self, ctx: &CheckContext<'_>, out: &mut Recorder<'_>) -> Result<(), CheckError> {
        let model_literal = self.model_literal.as_ref().map_err(Clone::clone)?;
        let deprecated = self.deprecated.as_ref().map_err(Clone::clone)?;

        for (index, cell) in ctx.notebook.code_cells() {
            for captures in model_literal.captures_iter(cell.text()) {
                let Some(suffix) = captures.get(1) else {
                    continue;
                };
                let model = format!("{}{}", self.prefix, suffix.as_str());
                if !self.valid.contains(&model) {
                    out.block(
                        Some(index),
                        format!(
                            "Invalid model '{}'. Valid models are: {}",
                            model,
                            self.valid_list()
                        ),
                    );
                }
            }

            for pattern in deprecated.matching(cell.text()) {
                out.advise(Some(index), pattern.message());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::builtin::pattern_set;
    use crate::config::Config;
    use crate::findings::Findings;
    use crate::notebook::{Cell, Notebook};

    fn run(check: &dyn Check, cells: Vec<Cell>) -> Findings {
        let notebook = Notebook::from_cells(cells);
        let mut findings = Findings::new();
        let result = check.run(&CheckContext::new(&notebook), &mut findings.recorder(check.id()));
        assert!(result.is_ok());
        findings
    }

    fn constant_check() -> ModelConstantCheck {
        ModelConstantCheck::new(&ModelsConfig::default())
    }

    fn deprecated_check() -> DeprecatedPatternsCheck {
        DeprecatedPatternsCheck::new(
            &ModelsConfig::default(),
            pattern_set("deprecated-api", &Config::default()),
        )
    }

    #[test]
    fn test_constant_in_first_cells() {
        let findings = run(
            &constant_check(),
            vec![
                Cell::markdown("intro"),
                Cell::code("MODEL = \"claude-sonnet-4-5\""),
                Cell::code("client.messages.create(model=MODEL)"),
            ],
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_inline_model_without_constant() {
        let findings = run(
            &constant_check(),
            vec![Cell::code("client.messages.create(model='claude-haiku-4-5')")],
        );
        assert_eq!(findings.advisory().len(), 1);
        assert!(findings.advisory()[0].message().contains("MODEL = 'claude-sonnet-4-5'"));
    }

    #[test]
    fn test_constant_after_window_does_not_count() {
        let mut cells: Vec<Cell> = (0..5).map(|i| Cell::code(format!("step_{} = {}", i, i))).collect();
        cells.push(Cell::code("MODEL = 'claude-sonnet-4-5'"));
        let findings = run(&constant_check(), cells);
        assert_eq!(findings.advisory().len(), 1);
    }

    #[test]
    fn test_markdown_reference_counts() {
        let findings = run(
            &constant_check(),
            vec![
                Cell::markdown("We call 'claude-haiku-4-5' throughout."),
                Cell::code("import anthropic"),
            ],
        );
        assert_eq!(findings.advisory().len(), 1);
        assert!(findings.advisory()[0].cell().is_none());
    }

    #[test]
    fn test_no_model_references() {
        let findings = run(&constant_check(), vec![Cell::code("import os")]);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_invalid_model_blocks_only_unknown_names() {
        let findings = run(
            &deprecated_check(),
            vec![Cell::code(
                "a = \"claude-sonnet-4-5\"\nb = \"claude-made-up-9\"",
            )],
        );
        assert_eq!(findings.blocking().len(), 1);
        assert_eq!(
            findings.blocking()[0].message(),
            "Invalid model 'claude-made-up-9'. Valid models are: \
             claude-sonnet-4-5, claude-haiku-4-5, claude-opus-4-1"
        );
        assert_eq!(findings.blocking()[0].cell(), Some(0));
        assert!(findings.advisory().is_empty());
    }

    #[test]
    fn test_every_occurrence_is_reported() {
        let findings = run(
            &deprecated_check(),
            vec![
                Cell::markdown("Uses 'claude-2' in prose"),
                Cell::code("m = 'claude-2'\nn = 'claude-2'"),
            ],
        );
        assert_eq!(findings.blocking().len(), 2);
    }

    #[test]
    fn test_deprecated_api_advisory() {
        let findings = run(
            &deprecated_check(),
            vec![Cell::code(
                "resp = client.completion(prompt=f\"{HUMAN_PROMPT} hi {AI_PROMPT}\")",
            )],
        );
        let messages: Vec<&str> = findings.advisory().iter().map(|f| f.message()).collect();
        assert_eq!(
            messages,
            vec![
                "Using old completion API (use messages API)",
                "Using legacy HUMAN_PROMPT/AI_PROMPT constants (use messages API roles)",
            ]
        );
    }
}

#![forbid(unsafe_code)]

//! Structural checks: introduction, adjacent code cells and conclusion
//!
//! These inspect cell order and kinds rather than scanning text for patterns.

use crate::checks::builtin::{ADJACENT_CODE, CONCLUSION, INTRODUCTION};
use crate::checks::{Check, CheckContext};
use crate::config::{ConclusionConfig, IntroductionConfig};
use crate::error::CheckError;
use crate::findings::Recorder;
use crate::types::{CellKind, CheckId};

/// Requires a markdown introduction that mentions prerequisites
pub struct IntroductionCheck {
    id: CheckId,
    min_length: usize,
    keywords: Vec<String>,
}

impl IntroductionCheck {
    pub fn new(config: &IntroductionConfig) -> Self {
        Self {
            id: CheckId::from_static(INTRODUCTION),
            min_length: config.min_length,
            keywords: config.keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

impl Check for IntroductionCheck {
    fn id(&self) -> &CheckId {
        &self.id
    }

    fn description(&self) -> &str {
        "First cell must be a markdown introduction that mentions prerequisites"
    }

    fn run(&self, ctx: &CheckContext<'_>, out: &mut Recorder<'_>) -> Result<(), CheckError> {
        let Some(first) = ctx.notebook.cells().first() else {
            out.block(None, "Notebook is empty");
            return Ok(());
        };

        if !first.is_markdown() {
            out.block(None, "First cell is not markdown (should be introduction)");
            return Ok(());
        }

        if first.char_len() < self.min_length {
            out.advise(
                None,
                format!(
                    "Introduction seems too short (< {} chars). Should include \
                     problem statement, audience, and what will be accomplished",
                    self.min_length
                ),
            );
        }

        let intro = first.text().to_lowercase();
        if !self.keywords.iter().any(|k| intro.contains(k.as_str())) {
            out.advise(None, "Introduction doesn't mention prerequisites");
        }

        Ok(())
    }
}

/// Flags code cells that directly follow another code cell
pub struct AdjacentCodeCheck {
    id: CheckId,
}

impl AdjacentCodeCheck {
    pub fn new() -> Self {
        Self {
            id: CheckId::from_static(ADJACENT_CODE),
        }
    }
}

impl Default for AdjacentCodeCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for AdjacentCodeCheck {
    fn id(&self) -> &CheckId {
        &self.id
    }

    fn description(&self) -> &str {
        "Code cells should be introduced by a markdown explanation"
    }

    fn run(&self, ctx: &CheckContext<'_>, out: &mut Recorder<'_>) -> Result<(), CheckError> {
        let mut previous: Option<CellKind> = None;

        for (index, cell) in ctx.notebook.cells().iter().enumerate() {
            if cell.is_code() && previous == Some(CellKind::Code) {
                let trimmed = cell.text().trim();
                // A bare comment cell is treated as a continuation
                if !trimmed.is_empty() && !trimmed.starts_with('#') {
                    out.advise(
                        Some(index),
                        "Code cell without preceding markdown explanation (two code cells in a row)",
                    );
                }
            }
            previous = Some(cell.kind());
        }

        Ok(())
    }
}

/// Requires a markdown conclusion near the end of longer notebooks
pub struct ConclusionCheck {
    id: CheckId,
    min_length: usize,
    window: usize,
    min_cells: usize,
}

impl ConclusionCheck {
    pub fn new(config: &ConclusionConfig) -> Self {
        Self {
            id: CheckId::from_static(CONCLUSION),
            min_length: config.min_length,
            window: config.window,
            min_cells: config.min_cells,
        }
    }
}

impl Check for ConclusionCheck {
    fn id(&self) -> &CheckId {
        &self.id
    }

    fn description(&self) -> &str {
        "Notebook should end with a markdown conclusion"
    }

    fn run(&self, ctx: &CheckContext<'_>, out: &mut Recorder<'_>) -> Result<(), CheckError> {
        let cells = ctx.notebook.cells();
        if cells.len() < self.min_cells {
            return Ok(());
        }

        let tail = &cells[cells.len().saturating_sub(self.window)..];
        let conclusion = tail.iter().rev().find(|c| c.is_markdown());

        match conclusion {
            Some(cell) if !cell.text().is_empty() => {
                if cell.char_len() < self.min_length {
                    out.advise(None, "Conclusion section seems too brief");
                }
            }
            _ => out.advise(None, "No conclusion or summary section found"),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::Findings;
    use crate::notebook::{Cell, Notebook};

    fn run(check: &dyn Check, cells: Vec<Cell>) -> Findings {
        let notebook = Notebook::from_cells(cells);
        let mut findings = Findings::new();
        check
            .run(&CheckContext::new(&notebook), &mut findings.recorder(check.id()))
            .unwrap();
        findings
    }

    fn intro() -> IntroductionCheck {
        IntroductionCheck::new(&IntroductionConfig::default())
    }

    fn conclusion() -> ConclusionCheck {
        ConclusionCheck::new(&ConclusionConfig::default())
    }

    #[test]
    fn test_empty_notebook_blocks() {
        let findings = run(&intro(), vec![]);
        assert_eq!(findings.blocking().len(), 1);
        assert_eq!(findings.blocking()[0].message(), "Notebook is empty");
        assert!(findings.advisory().is_empty());
    }

    #[test]
    fn test_code_first_blocks_and_stops() {
        let findings = run(&intro(), vec![Cell::code("import os")]);
        assert_eq!(findings.blocking().len(), 1);
        assert!(findings.advisory().is_empty());
    }

    #[test]
    fn test_short_intro_without_prerequisites() {
        let findings = run(&intro(), vec![Cell::markdown("# Hello")]);
        assert!(findings.blocking().is_empty());
        assert_eq!(findings.advisory().len(), 2);
        assert!(findings.advisory()[0].message().contains("too short"));
        assert_eq!(
            findings.advisory()[1].message(),
            "Introduction doesn't mention prerequisites"
        );
    }

    #[test]
    fn test_good_intro_passes() {
        let text = format!("# Guide\nYou will NEED an API key. {}", "x".repeat(200));
        let findings = run(&intro(), vec![Cell::markdown(text)]);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_intro_length_counts_characters() {
        // 162 characters, 312 bytes
        let text = format!("requirement {}", "é".repeat(150));
        let findings = run(&intro(), vec![Cell::markdown(text)]);
        assert_eq!(findings.advisory().len(), 1);
    }

    #[test]
    fn test_adjacent_code_cells() {
        let check = AdjacentCodeCheck::new();
        let findings = run(
            &check,
            vec![
                Cell::markdown("intro"),
                Cell::code("a = 1"),
                Cell::code("b = 2"),
                Cell::code("# just a comment"),
                Cell::code("   "),
                Cell::markdown("text"),
                Cell::code("c = 3"),
            ],
        );
        assert_eq!(findings.advisory().len(), 1);
        assert_eq!(findings.advisory()[0].cell(), Some(2));
    }

    #[test]
    fn test_other_cell_breaks_adjacency() {
        let check = AdjacentCodeCheck::new();
        let findings = run(
            &check,
            vec![
                Cell::code("a = 1"),
                Cell::new(CellKind::Other, "raw"),
                Cell::code("b = 2"),
            ],
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_conclusion_skipped_for_short_notebooks() {
        let findings = run(&conclusion(), vec![Cell::code("a"), Cell::code("b")]);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_missing_conclusion() {
        let findings = run(
            &conclusion(),
            vec![Cell::markdown("intro"), Cell::code("a"), Cell::code("b")],
        );
        assert_eq!(
            findings.advisory()[0].message(),
            "No conclusion or summary section found"
        );
    }

    #[test]
    fn test_conclusion_outside_window_is_missing() {
        let mut cells = vec![Cell::markdown("x".repeat(150))];
        cells.extend((0..5).map(|i| Cell::code(format!("v{} = 1", i))));
        let findings = run(&conclusion(), cells);
        assert_eq!(findings.advisory().len(), 1);
        assert_eq!(
            findings.advisory()[0].message(),
            "No conclusion or summary section found"
        );
    }

    #[test]
    fn test_brief_and_adequate_conclusion() {
        let findings = run(
            &conclusion(),
            vec![Cell::markdown("intro"), Cell::code("a"), Cell::markdown("Done.")],
        );
        assert_eq!(
            findings.advisory()[0].message(),
            "Conclusion section seems too brief"
        );

        let findings = run(
            &conclusion(),
            vec![
                Cell::markdown("intro"),
                Cell::code("a"),
                Cell::markdown("y".repeat(100)),
                Cell::code("b"),
            ],
        );
        assert!(findings.is_empty());
    }
}

#![forbid(unsafe_code)]

//! Human-readable validation report
//!
//! Blocking findings come first under a "critical issues" heading, then
//! advisory findings. Colors are applied through `termcolor`, so the same
//! writer produces plain text when color is disabled.

use crate::engine::Report;
use crate::findings::Finding;
use std::io::{self, Write};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

const RULE_WIDTH: usize = 60;

const MANUAL_REVIEW: &[&str] = &[
    "Content quality and narrative flow",
    "Technical accuracy of explanations",
    "Appropriateness of examples",
    "Overall pedagogical effectiveness",
];

/// Formats reports for terminals
#[derive(Debug, Default, Clone, Copy)]
pub struct HumanFormatter;

impl HumanFormatter {
    pub fn new() -> Self {
        HumanFormatter
    }

    /// Render a report as plain text
    pub fn format(&self, report: &Report) -> String {
        let mut buffer = Buffer::no_color();
        // Writing into an in-memory buffer cannot fail
        let _ = self.write(&mut buffer, report);
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }

    /// Write a report, colored if `out` supports it
    pub fn write(&self, out: &mut dyn WriteColor, report: &Report) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(out)?;
        writeln!(out, "{}", rule)?;
        write!(out, "Validation Report: ")?;
        with_color(out, None, true, |out| write!(out, "{}", report.name))?;
        writeln!(out)?;
        writeln!(out, "{}", rule)?;
        writeln!(out)?;

        if let Some(rendered) = &report.rendered {
            writeln!(out, "Markdown review file: {}", rendered.display())?;
            writeln!(out, "   (More readable format for detailed review)")?;
            writeln!(out)?;
        }

        let blocking = report.findings.blocking();
        let advisory = report.findings.advisory();

        if !blocking.is_empty() {
            with_color(out, Some(Color::Red), true, |out| {
                writeln!(out, "CRITICAL ISSUES (must fix):")
            })?;
            write_findings(out, blocking, "✗", Color::Red)?;
        }

        if !advisory.is_empty() {
            with_color(out, Some(Color::Yellow), true, |out| {
                writeln!(out, "WARNINGS (should review):")
            })?;
            write_findings(out, advisory, "⚠", Color::Yellow)?;
        }

        if blocking.is_empty() && advisory.is_empty() {
            with_color(out, Some(Color::Green), true, |out| {
                writeln!(out, "✓ No automated issues found!")
            })?;
            writeln!(out)?;
            writeln!(out, "Note: This doesn't replace manual review for:")?;
            for item in MANUAL_REVIEW {
                writeln!(out, "  - {}", item)?;
            }
        }

        writeln!(out)?;
        writeln!(out, "{}", rule)?;
        writeln!(
            out,
            "Summary: {} critical issues, {} warnings",
            blocking.len(),
            advisory.len()
        )?;
        writeln!(out, "{}", rule)?;
        writeln!(out)
    }
}

fn write_findings(
    out: &mut dyn WriteColor,
    findings: &[Finding],
    icon: &str,
    color: Color,
) -> io::Result<()> {
    for finding in findings {
        write!(out, "  ")?;
        with_color(out, Some(color), false, |out| write!(out, "{}", icon))?;
        writeln!(out, " {}", finding)?;
    }
    writeln!(out)
}

fn with_color<F>(out: &mut dyn WriteColor, color: Option<Color>, bold: bool, f: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn WriteColor) -> io::Result<()>,
{
    out.set_color(ColorSpec::new().set_fg(color).set_bold(bold))?;
    let result = f(out);
    out.reset()?;
    result
}

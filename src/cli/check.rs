//! Validation command
//!
//! Loads configuration, discovers notebooks, validates them (in parallel
//! for batch runs), prints one report per notebook in input order and maps
//! the combined outcome to an exit code.

use crate::cli::args::Cli;
use crate::cli::common::{EXIT_FAILURE, EXIT_SUCCESS, load_config};
use crate::config::{ColorOption, OutputFormat};
use crate::engine::{Discovery, Report, Validator};
use crate::error::AuditError;
use crate::output::{HumanFormatter, JsonlFormatter};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use termcolor::{ColorChoice, StandardStream};

/// Run validation for parsed arguments
///
/// # Returns
///
/// Exit code:
/// - 0: every notebook passed
/// - 1: blocking findings, a fatal error for some notebook, or a
///   configuration error
pub fn run_check(args: &Cli) -> i32 {
    match run_check_inner(args) {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) => EXIT_FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

fn run_check_inner(args: &Cli) -> Result<bool, AuditError> {
    let mut config = load_config(args.config.as_deref())?;
    if args.no_render {
        config.render.enabled = false;
    }
    let format = args.format.unwrap_or(config.output.format);
    let color = args.color.unwrap_or(config.output.color);

    let notebooks = Discovery::new(&config.discovery)?.discover(&args.paths)?;
    if notebooks.is_empty() {
        eprintln!("Warning: No notebooks found to validate.");
        return Ok(true);
    }

    let validator = Validator::new(&config);

    if format == OutputFormat::Human {
        eprintln!(
            "Validating {} notebook(s) with {} checks...",
            notebooks.len(),
            validator.registry().len()
        );
    }

    let results = validator.validate_all(&notebooks);

    let mut printer = Printer::new(format, color);
    for (path, result) in &results {
        match result {
            Ok(report) => printer.report(report),
            Err(e) => {
                eprintln!("Error: {}", describe_error(path, e));
                printer.error(path, e);
            }
        }
    }

    let failed = failed_paths(&results);
    if results.len() > 1 && format == OutputFormat::Human {
        eprintln!("{} of {} notebooks failed", failed.len(), results.len());
    }

    Ok(failed.is_empty())
}

/// Writes reports to stdout in the chosen format
struct Printer {
    format: OutputFormat,
    stdout: StandardStream,
}

impl Printer {
    fn new(format: OutputFormat, color: ColorOption) -> Self {
        Self {
            format,
            stdout: StandardStream::stdout(color_choice(color, io::stdout().is_terminal())),
        }
    }

    fn report(&mut self, report: &Report) {
        let result = match self.format {
            OutputFormat::Human => HumanFormatter::new().write(&mut self.stdout, report),
            OutputFormat::Jsonl => {
                let text = JsonlFormatter::new().format(report);
                self.stdout.write_all(text.as_bytes())
            }
        };
        if let Err(e) = result {
            log::warn!("failed to write report for {}: {}", report.name, e);
        }
    }

    fn error(&mut self, path: &Path, error: &AuditError) {
        if self.format != OutputFormat::Jsonl {
            return;
        }
        let text = JsonlFormatter::new().format_error(path, error);
        if let Err(e) = self.stdout.write_all(text.as_bytes()) {
            log::warn!("failed to write status for {}: {}", path.display(), e);
        }
    }
}

/// Map the configured color option to a termcolor choice
///
/// `auto` only colors when stdout is a terminal.
fn color_choice(option: ColorOption, is_terminal: bool) -> ColorChoice {
    match option {
        ColorOption::Always => ColorChoice::Always,
        ColorOption::Never => ColorChoice::Never,
        ColorOption::Auto if is_terminal => ColorChoice::Auto,
        ColorOption::Auto => ColorChoice::Never,
    }
}

/// Error text for a notebook, naming the path when the error does not
fn describe_error(path: &Path, error: &AuditError) -> String {
    match error {
        AuditError::Notebook(_) => error.to_string(),
        _ => format!("{}: {}", path.display(), error),
    }
}

/// Paths that failed, in input order
fn failed_paths(results: &[(PathBuf, Result<Report, AuditError>)]) -> Vec<&Path> {
    results
        .iter()
        .filter(|(_, r)| !r.as_ref().is_ok_and(Report::passed))
        .map(|(p, _)| p.as_path())
        .collect()
}

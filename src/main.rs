//! nbaudit CLI entry point

use clap::Parser;
use nbaudit::cli::{Cli, EXIT_FAILURE, run_check};
use std::process;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Usage errors exit 1; --help and --version exit 0
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(EXIT_FAILURE);
        }
        Err(e) => e.exit(),
    };

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    process::exit(run_check(&cli));
}

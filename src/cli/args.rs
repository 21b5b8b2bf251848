//! CLI argument parsing using clap

use crate::config::{ColorOption, OutputFormat};
use clap::Parser;
use std::path::PathBuf;

/// nbaudit CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "nbaudit")]
#[command(about = "Validate Jupyter notebooks against cookbook authoring standards")]
#[command(version)]
pub struct Cli {
    /// Notebooks or directories to validate
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Configuration file (defaults to ./nbaudit.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (overrides the configuration file)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output coloring (overrides the configuration file)
    #[arg(long)]
    pub color: Option<ColorOption>,

    /// Skip the markdown rendering step
    #[arg(long)]
    pub no_render: bool,

    /// Log collaborator commands and check activity to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

//! Notebook discovery for batch mode
//!
//! Command-line paths naming files are taken as given, whatever their
//! extension. Directories are walked with gitignore support and filtered by
//! the configured include/exclude globs, matched against the path relative
//! to the directory being walked.

use crate::config::DiscoveryConfig;
use crate::types::GlobPattern;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during discovery
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Expands command-line paths into the notebooks to validate
#[derive(Debug, Clone)]
pub struct Discovery {
    include: GlobSet,
    exclude: GlobSet,
}

impl Discovery {
    /// Compile the configured globs
    ///
    /// `.git` directories are always excluded.
    pub fn new(config: &DiscoveryConfig) -> Result<Self, DiscoveryError> {
        let mut exclude = config.exclude.clone();
        exclude.push(GlobPattern::new("**/.git/**"));

        Ok(Self {
            include: build_globset(&config.include)?,
            exclude: build_globset(&exclude)?,
        })
    }

    /// Resolve `paths` into notebook paths, preserving argument order
    ///
    /// Paths that are not directories, including ones that do not exist,
    /// are passed through so that loading reports them individually.
    /// Notebooks found under one directory are sorted.
    pub fn discover(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>, DiscoveryError> {
        let mut notebooks = Vec::new();
        for path in paths {
            if path.is_dir() {
                let mut found = self.walk(path)?;
                log::debug!("found {} notebooks under {}", found.len(), path.display());
                found.sort();
                notebooks.append(&mut found);
            } else {
                notebooks.push(path.clone());
            }
        }
        Ok(notebooks)
    }

    /// Walk a directory for notebooks matching the globs
    pub fn walk(&self, root: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
        let walker = WalkBuilder::new(root)
            .hidden(false) // Don't skip hidden files by default
            .git_ignore(true) // Respect .gitignore
            .build();

        let mut found = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            if !self.include.is_match(relative) {
                continue;
            }
            if self.exclude.is_match(relative) {
                log::debug!("excluded {}", path.display());
                continue;
            }

            found.push(path.to_path_buf());
        }
        Ok(found)
    }
}

fn build_globset(patterns: &[GlobPattern]) -> Result<GlobSet, DiscoveryError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern.as_str()).map_err(|e| DiscoveryError::InvalidGlob {
            pattern: pattern.as_str().to_string(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| DiscoveryError::InvalidGlob {
        pattern: "<globset>".to_string(),
        source: e,
    })
}

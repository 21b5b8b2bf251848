#![forbid(unsafe_code)]

//! Markdown rendering of notebooks for human review
//!
//! Rendering is delegated to nbconvert. The rendered file carries no cell
//! outputs or prompts, so a reviewer reads only the authored content.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::process;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const REVIEW_SUFFIX: &str = "_review.md";

/// Converts notebooks to markdown with an external converter
#[derive(Debug, Clone)]
pub struct Renderer {
    command: Vec<String>,
    output_dir: PathBuf,
    timeout: Duration,
}

impl Renderer {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            command: config.command.clone(),
            output_dir: config.output_dir(),
            timeout: config.timeout(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the rendering of `notebook` is written
    pub fn output_path(&self, notebook: &Path) -> PathBuf {
        self.output_dir.join(review_name(&stem(notebook)))
    }

    /// Distinct artifact paths for a batch, in input order
    ///
    /// The first notebook with a given stem gets `<stem>_review.md`; later
    /// notebooks from other locations get `<stem>-2_review.md`, `-3`, and so
    /// on. The same source listed twice maps to the same artifact.
    pub fn output_paths(&self, notebooks: &[PathBuf]) -> Vec<PathBuf> {
        let mut taken: HashSet<String> = HashSet::new();
        let mut assigned: HashMap<PathBuf, PathBuf> = HashMap::new();

        notebooks
            .iter()
            .map(|notebook| {
                let key = std::path::absolute(notebook).unwrap_or_else(|_| notebook.clone());
                if let Some(existing) = assigned.get(&key) {
                    return existing.clone();
                }

                let stem = stem(notebook);
                let mut name = review_name(&stem);
                let mut n = 2;
                while taken.contains(&name) {
                    name = review_name(&format!("{}-{}", stem, n));
                    n += 1;
                }
                taken.insert(name.clone());

                let path = self.output_dir.join(name);
                assigned.insert(key, path.clone());
                path
            })
            .collect()
    }

    /// Render `notebook` to markdown at its default artifact path
    ///
    /// # Errors
    ///
    /// See [`Renderer::render_to`].
    pub fn render(&self, notebook: &Path) -> Result<PathBuf, RenderError> {
        self.render_to(notebook, &self.output_path(notebook))
    }

    /// Render `notebook` to markdown at `target` and return the artifact path
    ///
    /// # Errors
    ///
    /// - `RenderError::Io` if the output directory cannot be created
    /// - `RenderError::Process` if the converter cannot be run or times out
    /// - `RenderError::Failed` if the converter exits unsuccessfully
    pub fn render_to(&self, notebook: &Path, target: &Path) -> Result<PathBuf, RenderError> {
        let output = absolute(target)?;
        if let Some(dir) = output.parent() {
            fs::create_dir_all(dir).map_err(|source| RenderError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let input = absolute(notebook)?;

        let mut command = process::command_from(&self.command)?;
        command
            .arg("--to")
            .arg("markdown")
            .arg("--output")
            .arg(&output)
            .arg("--no-prompt")
            .arg("--TemplateExporter.exclude_output=True")
            .arg(&input);

        let result = process::run(&mut command, self.timeout)?;
        if !result.success() {
            return Err(RenderError::Failed {
                code: result.code(),
                stderr: result.stderr.trim().to_string(),
            });
        }

        log::info!("rendered {} to {}", notebook.display(), output.display());
        Ok(output)
    }
}

fn stem(notebook: &Path) -> String {
    notebook
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "notebook".to_string())
}

fn review_name(stem: &str) -> String {
    format!("{}{}", stem, REVIEW_SUFFIX)
}

fn absolute(path: &Path) -> Result<PathBuf, RenderError> {
    std::path::absolute(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#![forbid(unsafe_code)]

//! Notebook document model
//!
//! A notebook is an ordered sequence of typed cells parsed from nbformat
//! JSON. Cell sources arrive either as one string or as a list of line
//! fragments; both normalize to the same concatenated text.

use crate::error::NotebookError;
use crate::types::CellKind;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Raw nbformat layout, only the parts the checks need
#[derive(Debug, Deserialize)]
struct RawNotebook {
    #[serde(default)]
    cells: Vec<RawCell>,
}

#[derive(Debug, Deserialize)]
struct RawCell {
    #[serde(default)]
    cell_type: Option<String>,
    #[serde(default)]
    source: Option<CellSource>,
}

/// Cell content as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CellSource {
    Text(String),
    Fragments(Vec<String>),
}

impl CellSource {
    /// Concatenates fragments without adding separators
    pub fn normalize(&self) -> String {
        match self {
            CellSource::Text(text) => text.clone(),
            CellSource::Fragments(fragments) => fragments.concat(),
        }
    }
}

/// A single notebook cell with normalized text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    kind: CellKind,
    text: String,
}

impl Cell {
    pub fn new(kind: CellKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Builds a cell from its on-disk source; a missing source is empty
    pub fn from_source(kind: CellKind, source: Option<&CellSource>) -> Self {
        let text = source.map(CellSource::normalize).unwrap_or_default();
        Self { kind, text }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self::new(CellKind::Code, text)
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self::new(CellKind::Markdown, text)
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn is_code(&self) -> bool {
        self.kind == CellKind::Code
    }

    pub fn is_markdown(&self) -> bool {
        self.kind == CellKind::Markdown
    }

    /// Normalized cell text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in Unicode scalar values
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A parsed notebook document
///
/// The document is immutable once parsed. Checks only ever borrow it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Notebook {
    cells: Vec<Cell>,
    source: Option<PathBuf>,
}

impl Notebook {
    /// Builds a notebook from already-normalized cells
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            source: None,
        }
    }

    /// Parse a notebook from raw JSON bytes
    ///
    /// # Errors
    ///
    /// Returns `NotebookError::Malformed` if the bytes are not valid JSON or
    /// do not have the shape of a notebook.
    pub fn parse(bytes: &[u8]) -> Result<Self, NotebookError> {
        Self::parse_with_source(bytes, None)
    }

    /// Load a notebook from disk, recording the path as its source
    ///
    /// # Errors
    ///
    /// Returns `NotebookError::NotFound` if the path does not exist,
    /// `NotebookError::Malformed` for invalid content and
    /// `NotebookError::Io` for other read failures.
    pub fn load(path: &Path) -> Result<Self, NotebookError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => NotebookError::NotFound(path.to_path_buf()),
            _ => NotebookError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        Self::parse_with_source(&bytes, Some(path))
    }

    fn parse_with_source(bytes: &[u8], source: Option<&Path>) -> Result<Self, NotebookError> {
        let raw: RawNotebook =
            serde_json::from_slice(bytes).map_err(|e| NotebookError::Malformed {
                path: source.map(Path::to_path_buf),
                message: e.to_string(),
            })?;

        let cells = raw
            .cells
            .iter()
            .map(|cell| {
                Cell::from_source(
                    CellKind::from_cell_type(cell.cell_type.as_deref()),
                    cell.source.as_ref(),
                )
            })
            .collect();

        Ok(Self {
            cells,
            source: source.map(Path::to_path_buf),
        })
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Code cells paired with their index in the full cell sequence
    pub fn code_cells(&self) -> impl Iterator<Item = (usize, &Cell)> {
        self.cells.iter().enumerate().filter(|(_, c)| c.is_code())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Path the notebook was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// File name used in report headers
    pub fn display_name(&self) -> String {
        self.source
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<input>".to_string())
    }
}

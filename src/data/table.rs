//! Raw integer tables
//!
//! Every input file of the toolkit has the same shape: optional `#` comment
//! lines followed by lines of tab (or space) separated integers. This module
//! reads that shape into a [`NumericTable`] without attaching any meaning to
//! the columns; the typed loaders in [`super::loader`] do that.

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::Array2;

use crate::error::{AnalysisError, Result};

/// Dense integer table read from one file
///
/// Rows keep file order. `line_numbers[i]` and `lines[i]` are the 1-based
/// line number and raw text of row `i`, so later validation can point at the
/// offending line.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericTable {
    /// Source file
    pub path: PathBuf,

    /// `[rows × columns]` integers
    pub data: Array2<i64>,

    /// 1-based source line of each row
    pub line_numbers: Vec<usize>,

    /// Raw source text of each row
    pub lines: Vec<String>,
}

impl NumericTable {
    /// Parse a table from text
    ///
    /// Lines starting with `#` and blank lines are skipped. The column count
    /// is the caller's `columns`, not the width of the first data line: each
    /// remaining line must carry at least `columns` integer tokens, and only
    /// the first `columns` are kept.
    pub fn parse(path: impl Into<PathBuf>, content: &str, columns: usize) -> Result<Self> {
        let path = path.into();
        let mut flat = Vec::new();
        let mut line_numbers = Vec::new();
        let mut lines = Vec::new();

        for (index, line) in content.lines().enumerate() {
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            let line_number = index + 1;
            let format_error = |found: String| AnalysisError::Format {
                path: path.clone(),
                line_number,
                line: line.to_string(),
                expected: columns,
                found,
            };

            let tokens: Vec<&str> = line.split_ascii_whitespace().collect();
            if tokens.len() < columns {
                return Err(format_error(format!("{} columns", tokens.len())));
            }

            for token in &tokens[..columns] {
                let value = token
                    .parse::<i64>()
                    .map_err(|_| format_error(format!("non-integer token {:?}", token)))?;
                flat.push(value);
            }
            line_numbers.push(line_number);
            lines.push(line.to_string());
        }

        let rows = line_numbers.len();
        let data = Array2::from_shape_vec((rows, columns), flat).map_err(|_| {
            AnalysisError::ShapeMismatch {
                what: format!("table {}", path.display()),
                expected: rows * columns,
                found: rows,
            }
        })?;

        log::debug!("{}: {} rows × {} columns", path.display(), rows, columns);

        Ok(Self {
            path,
            data,
            line_numbers,
            lines,
        })
    }

    /// Read and parse a table from a file
    pub fn read(path: &Path, columns: usize) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        Self::parse(path, &content, columns)
    }

    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    /// True when the file held no data line
    pub fn is_empty(&self) -> bool {
        self.nrows() == 0
    }

    /// Read a cell that must be non-negative
    ///
    /// Negative counts and durations are not meaningful in a raw
    /// measurement file, so they are reported as format errors.
    pub fn unsigned(&self, row: usize, column: usize) -> Result<u64> {
        let value = self.data[(row, column)];
        u64::try_from(value).map_err(|_| AnalysisError::Format {
            path: self.path.clone(),
            line_number: self.line_numbers[row],
            line: self.lines[row].clone(),
            expected: self.ncols(),
            found: format!("negative value {} in column {}", value, column),
        })
    }
}

// =================================================================================================
// Tests
// =================================================================================================

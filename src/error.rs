//! Error type shared by the loader, the regression engine and the outputs
//!
//! Every failure in this toolkit is terminal: the binary prints the message
//! and exits. The variants carry enough context (path, line, term list,
//! sample count) for the user to fix the input without a debugger.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// All the ways an analysis run can fail
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The file could not be opened, read or written
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data line did not tokenize into the expected integer columns
    #[error(
        "{}:{line_number}: expected {expected} integer columns, {found} (line: {line:?})",
        path.display()
    )]
    Format {
        path: PathBuf,
        line_number: usize,
        line: String,
        expected: usize,
        found: String,
    },

    /// A basis term name outside the fixed vocabulary
    #[error("unknown basis term {name:?}, valid terms are: {}", valid.join(", "))]
    UnknownTerm { name: String, valid: Vec<&'static str> },

    /// A phase letter outside the fixed vocabulary
    #[error("unknown phase {name:?}, valid phases are: {}", valid.join(", "))]
    UnknownPhase { name: String, valid: Vec<&'static str> },

    /// XᵗX is singular or too ill-conditioned to invert
    #[error(
        "design matrix is singular for terms [{}] over {samples} samples \
         (too few samples, or duplicate/collinear terms)",
        terms.join(", ")
    )]
    SingularMatrix { terms: Vec<String>, samples: usize },

    /// Paired tables do not line up row for row or column for column
    #[error("shape mismatch in {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    /// Nothing left to work with after comments and range filtering
    #[error("no samples left in {} after filtering", path.display())]
    EmptyDataset { path: PathBuf },

    /// A sample whose total time is below its scheduling time
    #[error(
        "{}: sample {row} has total {total} ns below scheduling {scheduling} ns",
        path.display()
    )]
    InvalidSample {
        path: PathBuf,
        row: usize,
        scheduling: u64,
        total: u64,
    },

    /// Malformed command line value
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Chart rendering failed
    #[error("plotting failed: {0}")]
    Plot(String),
}

impl AnalysisError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

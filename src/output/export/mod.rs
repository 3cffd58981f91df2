//! Export of fitted phases
//!
//! # Architecture
//!
//! This module defines the [`Exporter`] trait that abstracts the export format.
//! Each format is an independent implementation in its own sub-module, so a
//! new format is a new file.
//!
//! # Available formats
//!
//! | Format | Module  |
//! |--------|---------|
//! | TSV    | [`tsv`] |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use deinit_analysis::output::export::{Exporter, TsvExporter};
//!
//! let exporter = TsvExporter::default();
//! exporter.export(&observations, &phases, "fit.tsv".as_ref())?;
//! ```

pub mod tsv;

pub use tsv::{export_fit, write_fit, TsvConfig, TsvExporter, TsvMetadata};

use std::path::Path;

use crate::data::Observations;
use crate::regression::Phase;

/// Abstraction trait for all export formats.
///
/// # Associated type `Error`
///
/// Each format manages its own errors via the associated type.
/// This avoids systematic boxing (`Box<dyn Error>`) and allows
/// the caller to react precisely based on the error type.
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Writes every observation next to the fitted value of each phase.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the path is invalid or the directory does not exist
    /// - there is nothing to export, or the phases do not match `observations`
    fn export(&self, observations: &Observations, phases: &[Phase], path: &Path) -> Result<(), Self::Error>;
}

//! Tab-separated export of fitted phases
//!
//! Writes, for every retained sample, the parameters followed by the
//! observed and fitted response of each phase. The layout matches the
//! measurement files, so the export can be read back by any tool that reads
//! those (comment lines start with `#`).
//!
//! # Quick Example
//!
//! ```rust,ignore
//! use deinit_analysis::output::export::{export_fit, TsvConfig, TsvMetadata};
//!
//! let metadata = TsvMetadata::from_fit("data/async_tree.txt", &phases);
//! let config = TsvConfig::default().with_metadata(metadata);
//! export_fit(&observations, &phases, "fit.tsv".as_ref(), Some(&config))?;
//! ```
//!
//! **Output** (`fit.tsv`):
//! ```text
//! # deinit-analysis fit
//! # Generated: 2026-10-18T09:12:44+00:00
//! # Dataset: data/async_tree.txt
//! # Terms: o,1
//! # Samples: 3
//! #
//! values	objects	Scheduling	Scheduling_fit	Total	Total_fit
//! 0	1	10	10	20	20
//! ...
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::Exporter;
use crate::data::Observations;
use crate::error::{AnalysisError, Result};
use crate::regression::{BasisTerm, Phase};

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for TSV export
///
/// # Example
///
/// ```rust,ignore
/// let config = TsvConfig {
///     precision: Some(3),
///     include_metadata: false,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct TsvConfig {
    /// Column delimiter (default: '\t')
    pub delimiter: char,

    /// Decimal places for fitted values, or `None` for the shortest exact form
    pub precision: Option<usize>,

    /// Include metadata header comments (default: true)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<TsvMetadata>,
}

impl Default for TsvConfig {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            precision: None,
            include_metadata: true,
            metadata: None,
        }
    }
}

impl TsvConfig {
    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: TsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Header comment fields; `None` fields are skipped
#[derive(Debug, Clone, Default)]
pub struct TsvMetadata {
    /// Source measurement file
    pub dataset: Option<String>,

    /// Baseline file subtracted before fitting
    pub baseline: Option<String>,

    /// Comma-separated term list
    pub terms: Option<String>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl TsvMetadata {
    /// Metadata describing a fit of `dataset`
    pub fn from_fit(dataset: impl AsRef<Path>, phases: &[Phase]) -> Self {
        Self {
            dataset: Some(dataset.as_ref().display().to_string()),
            terms: phases
                .first()
                .map(|p| BasisTerm::join_names(&p.terms)),
            ..Default::default()
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom.push((key.into(), value.into()));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn write_metadata_header<W: Write>(out: &mut W, metadata: &TsvMetadata, samples: usize) -> std::io::Result<()> {
    writeln!(out, "# deinit-analysis fit")?;

    let now = chrono::Utc::now();
    writeln!(out, "# Generated: {}", now.to_rfc3339())?;

    if let Some(dataset) = &metadata.dataset {
        writeln!(out, "# Dataset: {}", dataset)?;
    }
    if let Some(baseline) = &metadata.baseline {
        writeln!(out, "# Baseline: {}", baseline)?;
    }
    if let Some(terms) = &metadata.terms {
        writeln!(out, "# Terms: {}", terms)?;
    }
    writeln!(out, "# Samples: {}", samples)?;

    for (key, value) in &metadata.custom {
        writeln!(out, "# {}: {}", key, value)?;
    }

    writeln!(out, "#")
}

fn format_number(value: f64, config: &TsvConfig) -> String {
    match config.precision {
        Some(precision) => format!("{:.prec$}", value, prec = precision),
        None => value.to_string(),
    }
}

fn validate(observations: &Observations, phases: &[Phase]) -> Result<()> {
    if observations.is_empty() || phases.is_empty() {
        return Err(AnalysisError::InvalidArgument(
            "empty data: nothing to export".to_string(),
        ));
    }

    for phase in phases {
        if phase.response.len() != observations.len() || phase.predictions.len() != observations.len() {
            return Err(AnalysisError::ShapeMismatch {
                what: format!("{} fit versus exported samples", phase.name()),
                expected: observations.len(),
                found: phase.response.len().min(phase.predictions.len()),
            });
        }

        if phase.response.iter().chain(phase.predictions.iter()).any(|x| !x.is_finite()) {
            return Err(AnalysisError::InvalidArgument(format!(
                "invalid data: NaN or Inf in {} fit",
                phase.name()
            )));
        }
    }

    Ok(())
}

/// Write the export to any writer
pub fn write_fit<W: Write>(
    out: &mut W,
    observations: &Observations,
    phases: &[Phase],
    config: &TsvConfig,
) -> Result<()> {
    validate(observations, phases)?;

    let io_error = |e: std::io::Error| AnalysisError::io("<export>", e);
    let d = config.delimiter;

    if config.include_metadata {
        let metadata = config.metadata.clone().unwrap_or_default();
        write_metadata_header(out, &metadata, observations.len()).map_err(io_error)?;
    }

    // ============================= Header ================================

    let mut header = format!("values{d}objects");
    for phase in phases {
        header.push_str(&format!("{d}{name}{d}{name}_fit", name = phase.name()));
    }
    writeln!(out, "{}", header).map_err(io_error)?;

    // ============================= Data ==================================

    for i in 0..observations.len() {
        let mut row = format!("{}{d}{}", observations.values[i], observations.objects[i]);
        for phase in phases {
            row.push(d);
            row.push_str(&phase.response[i].to_string());
            row.push(d);
            row.push_str(&format_number(phase.predictions[i], config));
        }
        writeln!(out, "{}", row).map_err(io_error)?;
    }

    Ok(())
}

/// Export observations and fitted phases to a TSV file
///
/// # Errors
///
/// - Empty data
/// - A phase fitted on a different number of samples
/// - NaN or Inf values
/// - File creation errors
pub fn export_fit(
    observations: &Observations,
    phases: &[Phase],
    output_path: &Path,
    config: Option<&TsvConfig>,
) -> Result<()> {
    let binding = TsvConfig::default();
    let config = config.unwrap_or(&binding);

    validate(observations, phases)?;

    let file = File::create(output_path).map_err(|e| AnalysisError::io(output_path, e))?;
    let mut out = BufWriter::new(file);

    write_fit(&mut out, observations, phases, config).map_err(|e| match e {
        AnalysisError::Io { source, .. } => AnalysisError::io(output_path, source),
        other => other,
    })?;
    out.flush().map_err(|e| AnalysisError::io(output_path, e))?;

    log::info!("exported {} samples to {}", observations.len(), output_path.display());
    Ok(())
}

/// [`Exporter`] writing tab-separated files
#[derive(Debug, Clone, Default)]
pub struct TsvExporter {
    pub config: TsvConfig,
}

impl TsvExporter {
    pub fn new(config: TsvConfig) -> Self {
        Self { config }
    }
}

impl Exporter for TsvExporter {
    type Error = AnalysisError;

    fn export(&self, observations: &Observations, phases: &[Phase], path: &Path) -> Result<()> {
        export_fit(observations, phases, path, Some(&self.config))
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::{PhaseKind, RegressionEngine};
    use std::fs;

    fn scenario() -> (Observations, Vec<Phase>) {
        let mut obs = Observations::default();
        obs.push(0.0, 1.0, 10.0, 20.0);
        obs.push(0.0, 2.0, 10.0, 40.0);
        obs.push(0.0, 3.0, 10.0, 60.0);

        let terms = BasisTerm::parse_list("o,1").unwrap();
        let engine = RegressionEngine::from_observations(&terms, &obs).unwrap();
        let phases = engine
            .fit_phases(&obs, &[PhaseKind::Scheduling, PhaseKind::Total])
            .unwrap();
        (obs, phases)
    }

    #[test]
    fn test_write_fit_without_metadata() {
        let (obs, phases) = scenario();
        let config = TsvConfig {
            include_metadata: false,
            precision: Some(0),
            ..Default::default()
        };

        let mut out = Vec::new();
        write_fit(&mut out, &obs, &phases, &config).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "values\tobjects\tScheduling\tScheduling_fit\tTotal\tTotal_fit");
        assert_eq!(lines[1], "0\t1\t10\t10\t20\t20");
        assert_eq!(lines[3], "0\t3\t10\t10\t60\t60");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_metadata_header() {
        let (obs, phases) = scenario();
        let mut metadata = TsvMetadata::from_fit("data/run.txt", &phases);
        metadata.add_custom("Phases", "S,T");
        let config = TsvConfig::default().with_metadata(metadata);

        let mut out = Vec::new();
        write_fit(&mut out, &obs, &phases, &config).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("# deinit-analysis fit\n# Generated: "));
        assert!(text.contains("# Dataset: data/run.txt\n"));
        assert!(text.contains("# Terms: o,1\n"));
        assert!(text.contains("# Samples: 3\n"));
        assert!(text.contains("# Phases: S,T\n#\nvalues"));
    }

    #[test]
    fn test_export_fit_to_file() {
        let (obs, phases) = scenario();
        let temp = tempfile::NamedTempFile::new().unwrap();

        TsvExporter::default().export(&obs, &phases, temp.path()).unwrap();

        let content = fs::read_to_string(temp.path()).unwrap();
        let data_lines = content.lines().filter(|l| !l.starts_with('#')).count();
        assert_eq!(data_lines, 4);
    }

    #[test]
    fn test_export_rejects_empty() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let (_, phases) = scenario();
        assert!(export_fit(&Observations::default(), &phases, temp.path(), None).is_err());
        assert!(export_fit(&scenario().0, &[], temp.path(), None).is_err());
    }

    #[test]
    fn test_export_rejects_non_finite() {
        let (obs, mut phases) = scenario();
        phases[0].predictions[1] = f64::NAN;
        let mut out = Vec::new();
        assert!(matches!(
            write_fit(&mut out, &obs, &phases, &TsvConfig::default()),
            Err(AnalysisError::InvalidArgument(_))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_export_rejects_mismatched_samples() {
        let (mut obs, phases) = scenario();
        obs.push(0.0, 4.0, 10.0, 80.0);
        let mut out = Vec::new();
        assert!(matches!(
            write_fit(&mut out, &obs, &phases, &TsvConfig::default()),
            Err(AnalysisError::ShapeMismatch { .. })
        ));
    }
}

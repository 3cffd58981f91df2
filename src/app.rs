//! Runners behind each subcommand
//!
//! Each runner takes a plain configuration, does the whole job and writes
//! the text report to the given writer. The binary passes a locked stdout;
//! tests pass a `Vec<u8>`.
//!
//! # Pipeline of a fit
//!
//! ```text
//! load ─► filter ─► (validate) ─► design matrix ─► (XᵗX)⁻¹ ─► fit each phase
//!                                                               │
//!                              report ◄─┬─────────────────────────┘
//!                              export ◄─┤
//!                           residuals ◄─┘
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{FitConfig, FitOptions, SplitFitConfig};
use crate::data::{
    generate_points, load_dataset, load_inputs, load_measurements, pair_measurements, write_points,
    GenerateConfig, Observations,
};
use crate::error::{AnalysisError, Result};
use crate::output::export::{Exporter, TsvConfig, TsvExporter, TsvMetadata};
use crate::output::visualization::{plot_relative_error, produce_chart_with, ChartKind};
use crate::regression::{Phase, RegressionEngine};
use crate::report::write_report;

/// Fit every requested phase over one shared design matrix
pub fn fit_observations(observations: &Observations, options: &FitOptions) -> Result<Vec<Phase>> {
    let engine = RegressionEngine::from_observations(&options.terms, observations)?;
    engine.fit_phases(observations, &options.phases)
}

/// Report, then the optional export and residual chart
fn emit<W: Write>(
    out: &mut W,
    observations: &Observations,
    phases: &[Phase],
    options: &FitOptions,
    metadata: TsvMetadata,
) -> Result<()> {
    write_report(out, phases, &options.report).map_err(|e| AnalysisError::io("<report>", e))?;

    if let Some(path) = &options.export {
        let exporter = TsvExporter::new(TsvConfig::default().with_metadata(metadata));
        exporter.export(observations, phases, path)?;
    }

    if let Some(path) = &options.residuals {
        plot_relative_error(phases, observations, path, None)?;
    }

    Ok(())
}

/// Fit a `[values, objects, scheduling, total]` file
///
/// # Errors
///
/// - Unreadable or malformed file
/// - No sample left after range filtering
/// - An inconsistent sample under [`ValidationPolicy::Reject`](crate::data::ValidationPolicy::Reject)
/// - Singular design matrix
/// - Report, export or chart failures
pub fn run_fit<W: Write>(config: &FitConfig, out: &mut W) -> Result<Vec<Phase>> {
    let options = &config.options;
    options.validate()?;

    let dataset = load_dataset(&config.dataset, &options.filter)?;
    if dataset.is_empty() {
        return Err(AnalysisError::EmptyDataset {
            path: config.dataset.clone(),
        });
    }
    dataset.validate(config.validation)?;

    let observations = dataset.observations();
    let phases = fit_observations(&observations, options)?;

    let metadata = TsvMetadata::from_fit(&config.dataset, &phases);
    emit(out, &observations, &phases, options, metadata)?;

    Ok(phases)
}

/// Fit an `inputs` file against an `outputs` file, optionally minus a baseline
///
/// Responses are signed deltas, so no sample validation is applied.
pub fn run_split_fit<W: Write>(config: &SplitFitConfig, out: &mut W) -> Result<Vec<Phase>> {
    let options = &config.options;
    options.validate()?;

    let points = load_inputs(&config.inputs)?;
    let measurements = load_measurements(&config.dataset)?;
    let baseline = config
        .baseline
        .as_deref()
        .map(load_measurements)
        .transpose()?;

    let observations = pair_measurements(&points, &measurements, baseline.as_deref(), &options.filter)?;
    if observations.is_empty() {
        return Err(AnalysisError::EmptyDataset {
            path: config.dataset.clone(),
        });
    }
    log::debug!(
        "{}: kept {} of {} samples",
        config.dataset.display(),
        observations.len(),
        points.len()
    );

    let phases = fit_observations(&observations, options)?;

    let mut metadata = TsvMetadata::from_fit(&config.dataset, &phases);
    metadata.baseline = config.baseline.as_ref().map(|p| p.display().to_string());
    metadata.add_custom("Inputs", config.inputs.display().to_string());
    emit(out, &observations, &phases, options, metadata)?;

    Ok(phases)
}

/// Draw a chart of one or more dataset files
pub fn run_plot(dataset_paths: &[PathBuf], output_path: &Path, kind: ChartKind) -> Result<()> {
    produce_chart_with(dataset_paths, output_path, kind, None)
}

/// Write random benchmark points, preceded by `# <command line>`, `#`, `# values objects`
pub fn run_generate<W: Write>(config: &GenerateConfig, command_line: &str, out: &mut W) -> Result<()> {
    let points = generate_points(config);
    let header = [command_line.to_string(), String::new(), "values objects".to_string()];

    write_points(out, &points, &header).map_err(|e| AnalysisError::io("<points>", e))?;
    log::info!(
        "generated {} points, values {} objects {}",
        points.len(),
        config.values,
        config.objects
    );
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{write_dataset, ParamRange, RangeFilter, Sample, ValidationPolicy};
    use crate::regression::{BasisTerm, PhaseKind};
    use approx::assert_relative_eq;
    use std::fs;

    fn three_point_file(dir: &Path) -> PathBuf {
        let path = dir.join("run.txt");
        let samples = [
            Sample::new(0, 1, 10, 20),
            Sample::new(0, 2, 10, 40),
            Sample::new(0, 3, 10, 60),
        ];
        write_dataset(&path, &samples, &["values objects scheduling total"]).unwrap();
        path
    }

    #[test]
    fn test_run_fit_three_point_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = FitConfig::new(three_point_file(dir.path()));
        config.options.terms = BasisTerm::parse_list("o,1").unwrap();

        let mut out = Vec::new();
        let phases = run_fit(&config, &mut out).unwrap();

        assert_eq!(phases.len(), 3);
        assert_relative_eq!(phases[0].coefficients[1], 10.0, epsilon = 1e-9);
        assert_relative_eq!(phases[2].coefficients[0], 20.0, epsilon = 1e-9);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Scheduling:"));
        assert!(lines[1].starts_with("Execution: "));
        assert!(lines[2].starts_with("Total:     "));
    }

    #[test]
    fn test_run_fit_empty_after_filter() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = FitConfig::new(three_point_file(dir.path()));
        config.options.filter = RangeFilter::unbounded().objects(100, 200);

        assert!(matches!(
            run_fit(&config, &mut Vec::new()),
            Err(AnalysisError::EmptyDataset { .. })
        ));
    }

    #[test]
    fn test_run_fit_singular_with_default_terms() {
        // Three samples cannot carry six terms
        let dir = tempfile::tempdir().unwrap();
        let config = FitConfig::new(three_point_file(dir.path()));

        assert!(matches!(
            run_fit(&config, &mut Vec::new()),
            Err(AnalysisError::SingularMatrix { samples: 3, .. })
        ));
    }

    #[test]
    fn test_run_fit_rejects_inconsistent_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        let samples = [
            Sample::new(0, 1, 10, 20),
            Sample::new(0, 2, 50, 40),
            Sample::new(0, 3, 10, 60),
            Sample::new(0, 4, 10, 80),
        ];
        write_dataset(&path, &samples, &[]).unwrap();

        let mut config = FitConfig::new(&path);
        config.options.terms = BasisTerm::parse_list("o,1").unwrap();
        assert!(run_fit(&config, &mut Vec::new()).is_ok());

        config.validation = ValidationPolicy::Reject;
        assert!(matches!(
            run_fit(&config, &mut Vec::new()),
            Err(AnalysisError::InvalidSample { row: 1, .. })
        ));
    }

    #[test]
    fn test_run_fit_writes_export() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("fit.tsv");
        let mut config = FitConfig::new(three_point_file(dir.path()));
        config.options.terms = BasisTerm::parse_list("o,1").unwrap();
        config.options.phases = vec![PhaseKind::Total];
        config.options.export = Some(export.clone());

        run_fit(&config, &mut Vec::new()).unwrap();

        let content = fs::read_to_string(&export).unwrap();
        assert!(content.starts_with("# deinit-analysis fit\n"));
        assert!(content.contains("run.txt\n# Terms: o,1\n# Samples: 3\n"));
        assert!(content.contains("values\tobjects\tTotal\tTotal_fit\n"));
    }

    #[test]
    fn test_run_split_fit_with_baseline() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = dir.path().join("inputs.txt");
        let outputs = dir.path().join("outputs.txt");
        let baseline = dir.path().join("baseline.txt");

        fs::write(&inputs, "# values objects\n0\t1\n0\t2\n0\t3\n0\t4\n").unwrap();
        // S = 7·o + 100, T = 30·o + 500, baseline S = 100, T = 500 + o
        fs::write(&outputs, "107\t530\n114\t560\n121\t590\n128\t620\n").unwrap();
        fs::write(&baseline, "100\t501\n100\t502\n100\t503\n100\t504\n").unwrap();

        let mut config = SplitFitConfig::new(&inputs, &outputs);
        config.baseline = Some(baseline);
        config.options.terms = BasisTerm::parse_list("o,1").unwrap();

        let mut out = Vec::new();
        let phases = run_split_fit(&config, &mut out).unwrap();

        assert_relative_eq!(phases[0].coefficients[0], 7.0, epsilon = 1e-9);
        assert_relative_eq!(phases[0].coefficients[1], 0.0, epsilon = 1e-9);
        assert_relative_eq!(phases[1].coefficients[0], 29.0, epsilon = 1e-9);
        assert_relative_eq!(phases[1].coefficients[1], 0.0, epsilon = 1e-9);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Scheduling:  7⋅o + 0,"));
        assert!(text.contains("Total:      29⋅o + 0,"));
    }

    #[test]
    fn test_run_split_fit_row_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = dir.path().join("inputs.txt");
        let outputs = dir.path().join("outputs.txt");
        fs::write(&inputs, "0\t1\n0\t2\n0\t3\n").unwrap();
        fs::write(&outputs, "1\t2\n3\t4\n").unwrap();

        let config = SplitFitConfig::new(&inputs, &outputs);
        assert!(matches!(
            run_split_fit(&config, &mut Vec::new()),
            Err(AnalysisError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_run_generate_header_and_count() {
        let config = GenerateConfig {
            values: ParamRange::new(5, 5).unwrap(),
            objects: ParamRange::new(1, 3).unwrap(),
            points: 10,
            seed: Some(7),
        };

        let mut out = Vec::new();
        run_generate(&config, "deinit-analysis gen-points 10", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# deinit-analysis gen-points 10");
        assert_eq!(lines[1], "#");
        assert_eq!(lines[2], "# values objects");
        assert_eq!(lines.len(), 13);
        assert!(lines[3..].iter().all(|l| l.starts_with("5\t")));
    }
}

//! Scatter charts of benchmark datasets
//!
//! # Available charts
//!
//! - [`ChartKind::VersusValues`]: Scheduling, Execution and Total panels,
//!   nanoseconds per object against the number of task-local values
//! - [`ChartKind::VersusObjects`]: Total and Total per object against the
//!   number of objects
//!
//! Each dataset becomes one series, labelled with its file stem.
//!
//! # Usage
//!
//! ```rust,ignore
//! use deinit_analysis::output::visualization::produce_chart;
//!
//! produce_chart(&["data/async_tree-vs-objects.txt".into(), "data/async_array-vs-objects.txt".into()],
//!               "img/async-vs-objects.png".as_ref())?;
//! ```

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use plotters::prelude::*;

use super::config::{ChartConfig, NO_TITLE};
use crate::data::{load_dataset, Dataset, RangeFilter, Sample};
use crate::error::{AnalysisError, Result};

/// Which figure to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    /// Per-object cost of each phase against task-local values
    VersusValues,

    /// Total cost, raw and per object, against objects
    #[default]
    VersusObjects,
}

impl FromStr for ChartKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "values" => Ok(ChartKind::VersusValues),
            "objects" => Ok(ChartKind::VersusObjects),
            other => Err(AnalysisError::InvalidArgument(format!(
                "chart kind {:?}, expected values or objects",
                other
            ))),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::VersusValues => f.write_str("values"),
            ChartKind::VersusObjects => f.write_str("objects"),
        }
    }
}

// =================================================================================================
// Panels
// =================================================================================================

/// One labelled point cloud
#[derive(Debug, Clone)]
pub(crate) struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// One sub-chart of a figure
#[derive(Debug, Clone)]
pub(crate) struct Panel {
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub series: Vec<Series>,
}

impl Panel {
    fn new(title: &str, xlabel: &str, ylabel: &str) -> Self {
        Self {
            title: title.to_string(),
            xlabel: xlabel.to_string(),
            ylabel: ylabel.to_string(),
            series: Vec::new(),
        }
    }

    /// Axis ranges covering every point, always including zero
    fn bounds(&self) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
        let points = self.series.iter().flat_map(|s| s.points.iter());

        let (mut x_min, mut x_max, mut y_min, mut y_max) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
        for &(x, y) in points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }

        let pad = |lo: f64, hi: f64| {
            let span = (hi - lo).max(1e-9);
            let lo = if lo < 0.0 { lo - 0.05 * span } else { lo };
            lo..(hi + 0.05 * span)
        };
        (pad(x_min, x_max), pad(y_min, y_max))
    }
}

/// Draw `panels` stacked vertically, backend picked from the extension
pub(crate) fn render_panels(panels: &[Panel], output_path: &Path, config: &ChartConfig) -> Result<()> {
    let ext = output_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("png");

    let drawn = match ext {
        "svg" => {
            let backend = SVGBackend::new(output_path, (config.width, config.height));
            render_panels_impl(backend, panels, config)
        }
        _ => {
            let backend = BitMapBackend::new(output_path, (config.width, config.height));
            render_panels_impl(backend, panels, config)
        }
    };

    drawn.map_err(|e| AnalysisError::Plot(format!("{}: {}", output_path.display(), e)))?;
    log::info!("wrote {}", output_path.display());
    Ok(())
}

/// Implementation for panel rendering with concrete backend
fn render_panels_impl<DB: DrawingBackend>(
    backend: DB,
    panels: &[Panel],
    config: &ChartConfig,
) -> std::result::Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&config.background)?;

    let root = if config.title.is_empty() {
        root
    } else {
        root.titled(&config.title, ("sans-serif", 30).into_font())?
    };

    let areas = root.split_evenly((panels.len(), 1));
    let size = config.marker_size;

    for (area, panel) in areas.iter().zip(panels) {
        let (x_range, y_range) = panel.bounds();

        let mut chart = ChartBuilder::on(area)
            .caption(&panel.title, ("sans-serif", 22).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)?;

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(&panel.xlabel).y_desc(&panel.ylabel);
        if !config.show_grid {
            mesh.disable_mesh();
        }
        mesh.draw()?;

        for (idx, series) in panel.series.iter().enumerate() {
            let color = config.get_series_color(idx);
            let points = series.points.iter().copied();

            // Square, circle, cross, in turn
            let anno = match idx % 3 {
                0 => {
                    let s = size as i32;
                    chart.draw_series(points.map(|p| {
                        EmptyElement::at(p) + Rectangle::new([(-s, -s), (s, s)], color.filled())
                    }))?
                }
                1 => chart.draw_series(points.map(|p| Circle::new(p, size, color.filled())))?,
                _ => chart.draw_series(points.map(|p| Cross::new(p, size, color.stroke_width(1))))?,
            };

            anno.label(series.label.as_str())
                .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
        }

        if panel.series.iter().any(|s| !s.label.is_empty()) {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperMiddle)
                .background_style(config.background.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }
    }

    root.present()?;

    Ok(())
}

// =================================================================================================
// Dataset figures
// =================================================================================================

/// Cost of one sample divided by its object count
fn per_object(value: f64, sample: &Sample) -> f64 {
    value / sample.objects as f64
}

fn values_panels(datasets: &[(String, Dataset)]) -> Vec<Panel> {
    let phases: [(&str, fn(&Sample) -> f64); 3] = [
        ("Scheduling", |s| s.scheduling_ns as f64),
        ("Execution", |s| s.execution_ns() as f64),
        ("Total", |s| s.total_ns as f64),
    ];

    phases
        .iter()
        .map(|(title, extract)| {
            let mut panel = Panel::new(title, "# of task-local values", "ns per object");
            for (label, dataset) in datasets {
                panel.series.push(Series {
                    label: label.clone(),
                    points: dataset
                        .samples
                        .iter()
                        .map(|s| (s.values as f64, per_object(extract(s), s)))
                        .collect(),
                });
            }
            panel
        })
        .collect()
}

fn objects_panels(datasets: &[(String, Dataset)]) -> Vec<Panel> {
    let mut total = Panel::new("Total", "# of objects", "ns");
    let mut normalized = Panel::new("Total (normalized)", "# of objects", "ns per object");

    for (label, dataset) in datasets {
        total.series.push(Series {
            label: label.clone(),
            points: dataset
                .samples
                .iter()
                .map(|s| (s.objects as f64, s.total_ns as f64))
                .collect(),
        });
        normalized.series.push(Series {
            label: label.clone(),
            points: dataset
                .samples
                .iter()
                .map(|s| (s.objects as f64, per_object(s.total_ns as f64, s)))
                .collect(),
        });
    }

    vec![total, normalized]
}

/// Plot already-loaded datasets
///
/// # Errors
///
/// - No datasets, or an empty one
/// - A sample with zero objects (every figure normalizes by object count)
/// - Drawing or file errors
pub fn plot_datasets(
    datasets: &[(String, Dataset)],
    kind: ChartKind,
    output_path: &Path,
    config: Option<&ChartConfig>,
) -> Result<()> {
    if datasets.is_empty() {
        return Err(AnalysisError::InvalidArgument("no datasets to plot".to_string()));
    }

    for (_, dataset) in datasets {
        if dataset.is_empty() {
            return Err(AnalysisError::EmptyDataset {
                path: dataset.path.clone(),
            });
        }
        if let Some(row) = dataset.samples.iter().position(|s| s.objects == 0) {
            return Err(AnalysisError::InvalidArgument(format!(
                "{}: sample {} has zero objects, cannot normalize per object",
                dataset.path.display(),
                row
            )));
        }
    }

    let default_config = match kind {
        ChartKind::VersusValues => ChartConfig::versus_values(NO_TITLE),
        ChartKind::VersusObjects => ChartConfig::versus_objects(NO_TITLE),
    };
    let config = config.unwrap_or(&default_config);

    let panels = match kind {
        ChartKind::VersusValues => values_panels(datasets),
        ChartKind::VersusObjects => objects_panels(datasets),
    };

    render_panels(&panels, output_path, config)
}

/// Series label for a dataset file: its stem
pub fn dataset_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load datasets and draw a chart of the given kind
pub fn produce_chart_with(
    dataset_paths: &[PathBuf],
    output_path: &Path,
    kind: ChartKind,
    config: Option<&ChartConfig>,
) -> Result<()> {
    let datasets = dataset_paths
        .iter()
        .map(|path| Ok((dataset_label(path), load_dataset(path, &RangeFilter::unbounded())?)))
        .collect::<Result<Vec<_>>>()?;

    plot_datasets(&datasets, kind, output_path, config)
}

/// Load datasets and draw the total-versus-objects chart
pub fn produce_chart(dataset_paths: &[PathBuf], output_path: &Path) -> Result<()> {
    produce_chart_with(dataset_paths, output_path, ChartKind::default(), None)
}

// =================================================================================================
// Tests
// =================================================================================================

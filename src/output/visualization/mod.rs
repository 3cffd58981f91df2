//! Charts of benchmark datasets and fits
//!
//! This module draws figures with the `plotters` library. The backend is
//! picked from the output extension: `.svg` gives SVG, anything else a bitmap.
//!
//! # Organization
//!
//! - **config**: Shared chart configuration (`ChartConfig`)
//! - **scatter**: Dataset scatter charts (`produce_chart`, `plot_datasets`)
//! - **residuals**: Relative error of a fit (`plot_relative_error`)
//!
//! # Quick Start
//!
//! ## Datasets
//!
//! ```rust,ignore
//! use deinit_analysis::output::visualization::{produce_chart_with, ChartConfig, ChartKind};
//!
//! // Total versus objects, default config
//! produce_chart(&paths, "async-vs-objects.png".as_ref())?;
//!
//! // Per-object cost versus task-local values, titled
//! let config = ChartConfig::versus_values("async tree");
//! produce_chart_with(&paths, "tree-vs-values.svg".as_ref(), ChartKind::VersusValues, Some(&config))?;
//! ```
//!
//! ## Fit quality
//!
//! ```rust,ignore
//! use deinit_analysis::output::visualization::plot_relative_error;
//!
//! let phases = engine.fit_phases(&observations, &PhaseKind::ALL)?;
//! plot_relative_error(&phases, &observations, "errors.png".as_ref(), None)?;
//! ```
//!
//! # When to Use Which Function
//!
//! | Use Case | Module | Function |
//! |----------|--------|----------|
//! | Dataset files, default figure | `scatter` | `produce_chart` |
//! | Dataset files, chosen figure | `scatter` | `produce_chart_with` |
//! | Already loaded datasets | `scatter` | `plot_datasets` |
//! | Residuals of a fit | `residuals` | `plot_relative_error` |

pub mod config;
pub mod scatter;
pub mod residuals;

pub use config::{ChartConfig, IntoOptionalTitle, NO_TITLE};

pub use scatter::{dataset_label, plot_datasets, produce_chart, produce_chart_with, ChartKind};

pub use residuals::{plot_relative_error, relative_error};

//! Output of datasets and fitted phases
//!
//! This module provides two outputs next to the text report:
//! - **Visualization**: PNG/SVG charts using plotters
//! - **Export**: tab-separated files of observed and fitted values
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! ├── visualization/      ← Charts
//! │   ├── mod.rs
//! │   ├── config.rs
//! │   ├── scatter.rs
//! │   └── residuals.rs
//! └── export/             ← Data export
//!     ├── mod.rs
//!     └── tsv.rs
//! ```
//!
//! # Quick Start
//!
//! ## Visualization
//!
//! ```rust,ignore
//! use deinit_analysis::output::visualization::produce_chart;
//!
//! produce_chart(&["data/async_tree.txt".into()], "tree.png".as_ref())?;
//! ```
//!
//! ## TSV Export
//!
//! ```rust,ignore
//! use deinit_analysis::output::export::export_fit;
//!
//! export_fit(&observations, &phases, "fit.tsv".as_ref(), None)?;
//! ```

pub mod visualization;
pub mod export;

// Re-export commonly used items for convenience
pub use visualization::{
    plot_datasets,
    plot_relative_error,
    produce_chart,
    produce_chart_with,
    ChartConfig,
    ChartKind,
};

pub use export::{export_fit, Exporter, TsvConfig, TsvExporter};

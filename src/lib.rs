//! deinit-analysis: cost models for deinitialization benchmarks
//!
//! Reads benchmark measurements (scheduling time and total time of
//! deinitializing a batch of objects, for a number of objects and a number of
//! task-local values) and fits each phase as a polynomial in those two
//! parameters with ordinary least squares.
//!
//! # Architecture
//!
//! deinit-analysis is built on two principles:
//!
//! 1. **One design matrix, several responses**
//!    - The basis terms and the retained samples define X
//!    - `(XᵗX)⁻¹` is computed once and reused for every phase
//!
//! 2. **Everything is a value**
//!    - Loaders return typed samples, the engine returns fitted phases
//!    - The report, export and charts only read those values
//!
//! # Quick Start
//!
//! ```rust
//! use deinit_analysis::data::Observations;
//! use deinit_analysis::regression::{BasisTerm, PhaseKind, RegressionEngine};
//! use deinit_analysis::report::{format_report, ReportOptions};
//!
//! # fn main() -> deinit_analysis::error::Result<()> {
//! // 1. Observations: (values, objects, scheduling ns, total ns)
//! let mut observations = Observations::default();
//! observations.push(0.0, 1.0, 10.0, 20.0);
//! observations.push(0.0, 2.0, 10.0, 40.0);
//! observations.push(0.0, 3.0, 10.0, 60.0);
//!
//! // 2. Basis terms
//! let terms = BasisTerm::parse_list("o,1")?;
//!
//! // 3. Fit every phase over the same design matrix
//! let engine = RegressionEngine::from_observations(&terms, &observations)?;
//! let phases = engine.fit_phases(&observations, &PhaseKind::ALL)?;
//!
//! // 4. Report
//! for line in format_report(&phases, &ReportOptions::default()) {
//!     println!("{}", line);
//! }
//! assert!((phases[2].coefficients[0] - 20.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`data`]: Measurement files, samples and range filtering
//! - [`regression`]: Basis terms, design matrix and least squares
//! - [`report`]: Aligned text report
//! - [`output`]: Charts and TSV export
//! - [`config`]: Run configurations
//! - [`app`]: One runner per subcommand

pub mod error;

pub mod data;
pub mod regression;
pub mod report;
pub mod output;

pub mod config;
pub mod app;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //!
    //! use deinit_analysis::prelude::*;
    //! ```
    pub use crate::data::{load_dataset,
                          Dataset,
                          Observations,
                          RangeFilter,
                          Sample};
    pub use crate::error::{AnalysisError, Result};
    pub use crate::regression::{BasisTerm,
                                Phase,
                                PhaseKind,
                                RegressionEngine};
    pub use crate::report::{format_report,
                            CoefficientStyle,
                            ReportOptions};
}

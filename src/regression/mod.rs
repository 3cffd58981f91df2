//! Least-squares cost models
//!
//! Fits scheduling, execution and total time as polynomials in the number
//! of task-local values and the number of objects.
//!
//! # Organization
//!
//! - **basis**: the fixed vocabulary of polynomial terms and the design matrix
//! - **phase**: response variables (`PhaseKind`), fitted phases and fit metrics
//! - **engine**: ordinary least squares with a shared `(XᵗX)⁻¹`
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use deinit_analysis::regression::{BasisTerm, PhaseKind, RegressionEngine};
//!
//! let terms = BasisTerm::parse_list("vo2,vo,v,o2,o,1")?;
//! let engine = RegressionEngine::from_observations(&terms, &dataset.observations())?;
//! let phases = engine.fit_phases(&dataset.observations(), &PhaseKind::ALL)?;
//! ```

pub mod basis;
pub mod phase;
pub mod engine;

pub use basis::{BasisTerm, DesignMatrix};
pub use phase::{FitMetrics, Phase, PhaseKind};
pub use engine::{RegressionEngine, SINGULARITY_TOLERANCE};

//! Ordinary least squares over a shared design matrix
//!
//! # Method
//!
//! For a design matrix X (n samples × k terms) and a response Y:
//!
//! ```text
//! Z = (XᵗX)⁻¹        computed once per engine
//! β = Z·Xᵗ·Y         per phase
//! Ŷ = X·β
//! ```
//!
//! # Singularity
//!
//! The basis columns live on wildly different scales (`1` next to `v·o²`,
//! which reaches 10¹⁰ on typical runs), so the conditioning test is done on
//! the equilibrated Gram matrix `D·XᵗX·D` with `D = diag(1/√(XᵗX)ᵢᵢ)`.
//! The engine never regularizes: a matrix that fails the test is an error.

use nalgebra::{DMatrix, DVector};

use super::basis::{BasisTerm, DesignMatrix};
use super::phase::{FitMetrics, Phase, PhaseKind};
use crate::data::Observations;
use crate::error::{AnalysisError, Result};

/// Smallest accepted ratio between the extreme singular values of the
/// equilibrated Gram matrix
pub const SINGULARITY_TOLERANCE: f64 = 1e-12;

/// Least-squares engine bound to one design matrix
///
/// Owns the design matrix and `Z = (XᵗX)⁻¹`; every phase fitted through
/// the same engine reuses them.
#[derive(Debug, Clone)]
pub struct RegressionEngine {
    design: DesignMatrix,
    gram_inverse: DMatrix<f64>,
}

impl RegressionEngine {
    /// Invert XᵗX for `design`
    ///
    /// # Errors
    ///
    /// [`AnalysisError::SingularMatrix`] when there are no more samples than
    /// terms, a column is identically zero, the columns are (nearly)
    /// collinear, or the inversion fails.
    pub fn new(design: DesignMatrix) -> Result<Self> {
        let n = design.nrows();
        let k = design.ncols();
        let singular = || AnalysisError::SingularMatrix {
            terms: design.term_names(),
            samples: n,
        };

        if n <= k {
            return Err(singular());
        }

        let gram = design.matrix.tr_mul(&design.matrix);

        let diagonal = gram.diagonal();
        if diagonal.iter().any(|d| !(d.is_finite() && *d > 0.0)) {
            return Err(singular());
        }
        let scale: DVector<f64> = diagonal.map(|d| 1.0 / d.sqrt());

        let equilibrated = DMatrix::from_fn(k, k, |i, j| gram[(i, j)] * scale[i] * scale[j]);

        let singular_values = equilibrated.clone().svd(false, false).singular_values;
        let rcond = singular_values.min() / singular_values.max();
        if !(rcond >= SINGULARITY_TOLERANCE) {
            log::debug!("reciprocal condition {:e} below {:e}", rcond, SINGULARITY_TOLERANCE);
            return Err(singular());
        }

        let inverse = equilibrated.try_inverse().ok_or_else(singular)?;
        let gram_inverse = DMatrix::from_fn(k, k, |i, j| inverse[(i, j)] * scale[i] * scale[j]);

        log::debug!(
            "design matrix {} × {} [{}], reciprocal condition {:e}",
            n,
            k,
            design.term_names().join(","),
            rcond
        );

        Ok(Self {
            design,
            gram_inverse,
        })
    }

    /// Build the design matrix from observations and invert it
    pub fn from_observations(terms: &[BasisTerm], observations: &Observations) -> Result<Self> {
        let design = DesignMatrix::build(terms, &observations.values, &observations.objects)?;
        Self::new(design)
    }

    pub fn design(&self) -> &DesignMatrix {
        &self.design
    }

    /// `(XᵗX)⁻¹`
    pub fn gram_inverse(&self) -> &DMatrix<f64> {
        &self.gram_inverse
    }

    /// Fit one response column
    pub fn fit(&self, kind: PhaseKind, response: &[f64]) -> Result<Phase> {
        let x = &self.design.matrix;
        if response.len() != x.nrows() {
            return Err(AnalysisError::ShapeMismatch {
                what: format!("{} response versus design matrix rows", kind),
                expected: x.nrows(),
                found: response.len(),
            });
        }

        let y = DVector::from_column_slice(response);
        let coefficients = &self.gram_inverse * x.tr_mul(&y);
        let predictions = x * &coefficients;
        let metrics = FitMetrics::compute(&y, &predictions, x.ncols());

        log::info!(
            "{}: R² = {:.6}, adjusted R² = {:.6}, RMSE = {:.3}",
            kind,
            metrics.r_squared,
            metrics.adjusted_r_squared,
            metrics.rmse
        );

        Ok(Phase {
            kind,
            terms: self.design.terms.clone(),
            coefficients,
            response: y,
            predictions,
            metrics,
        })
    }

    /// Fit every requested phase of `observations`, in order
    pub fn fit_phases(&self, observations: &Observations, phases: &[PhaseKind]) -> Result<Vec<Phase>> {
        phases
            .iter()
            .map(|kind| self.fit(*kind, &kind.response(observations)))
            .collect()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

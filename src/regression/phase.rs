//! Response variables and their fitted models

use std::fmt;
use std::str::FromStr;

use nalgebra::DVector;

use super::basis::BasisTerm;
use crate::data::Observations;
use crate::error::{AnalysisError, Result};

/// Which measured time a phase explains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// `S`: time spent scheduling the deinitialization
    Scheduling,
    /// `E`: total minus scheduling
    Execution,
    /// `T`: whole operation
    Total,
}

impl PhaseKind {
    pub const ALL: [PhaseKind; 3] = [PhaseKind::Scheduling, PhaseKind::Execution, PhaseKind::Total];

    /// Command line letter
    pub fn letter(&self) -> &'static str {
        match self {
            PhaseKind::Scheduling => "S",
            PhaseKind::Execution => "E",
            PhaseKind::Total => "T",
        }
    }

    /// Name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            PhaseKind::Scheduling => "Scheduling",
            PhaseKind::Execution => "Execution",
            PhaseKind::Total => "Total",
        }
    }

    /// Extract (or derive) the response column for this phase
    pub fn response(&self, observations: &Observations) -> Vec<f64> {
        match self {
            PhaseKind::Scheduling => observations.scheduling.clone(),
            PhaseKind::Execution => observations.execution(),
            PhaseKind::Total => observations.total.clone(),
        }
    }

    /// Parse a comma-separated list such as `S,E,T`
    ///
    /// Keeps the requested order; repeated letters are reported once.
    pub fn parse_list(list: &str) -> Result<Vec<PhaseKind>> {
        let mut phases = Vec::new();
        for letter in list.split(',').map(str::trim).filter(|l| !l.is_empty()) {
            let phase: PhaseKind = letter.parse()?;
            if !phases.contains(&phase) {
                phases.push(phase);
            }
        }

        if phases.is_empty() {
            return Err(AnalysisError::InvalidArgument(format!(
                "no phases in {:?}",
                list
            )));
        }
        Ok(phases)
    }
}

impl FromStr for PhaseKind {
    type Err = AnalysisError;

    fn from_str(letter: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|p| p.letter().eq_ignore_ascii_case(letter))
            .copied()
            .ok_or_else(|| AnalysisError::UnknownPhase {
                name: letter.to_string(),
                valid: Self::ALL.iter().map(|p| p.letter()).collect(),
            })
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =================================================================================================
// Fit quality
// =================================================================================================

/// Goodness-of-fit of one phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitMetrics {
    /// Mean absolute error
    pub mae: f64,

    /// Root mean square error
    pub rmse: f64,

    /// Residual sum of squares, Σ(y − ŷ)²
    pub rss: f64,

    /// Total sum of squares, Σ(y − ȳ)²
    pub sst: f64,

    /// Coefficient of determination
    pub r_squared: f64,

    /// R² penalized by the number of terms
    pub adjusted_r_squared: f64,
}

impl FitMetrics {
    /// Compute metrics for `terms` fitted coefficients
    ///
    /// A constant response (`SST = 0`) gets `R² = 1` when it is fitted
    /// exactly and `NaN` otherwise. Adjusted R² is `NaN` when `n − k − 1 ≤ 0`.
    pub fn compute(response: &DVector<f64>, predictions: &DVector<f64>, terms: usize) -> Self {
        let n = response.len();
        let n_f = n as f64;
        let residuals = response - predictions;

        let mae = residuals.iter().map(|r| r.abs()).sum::<f64>() / n_f;
        let rss = residuals.norm_squared();
        let rmse = (rss / n_f).sqrt();

        let mean = response.mean();
        let sst = response.iter().map(|y| (y - mean).powi(2)).sum::<f64>();

        let r_squared = if sst > 0.0 {
            1.0 - rss / sst
        } else if rss <= 1e-12 * response.norm_squared().max(1.0) {
            1.0
        } else {
            f64::NAN
        };

        let dof = n as i64 - terms as i64 - 1;
        let adjusted_r_squared = if dof > 0 {
            1.0 - (1.0 - r_squared) * (n_f - 1.0) / dof as f64
        } else {
            f64::NAN
        };

        Self {
            mae,
            rmse,
            rss,
            sst,
            r_squared,
            adjusted_r_squared,
        }
    }
}

// =================================================================================================
// Fitted phase
// =================================================================================================

/// One response variable with its least-squares fit
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub kind: PhaseKind,

    /// Terms, parallel to `coefficients`
    pub terms: Vec<BasisTerm>,

    /// β
    pub coefficients: DVector<f64>,

    /// Observed response Y
    pub response: DVector<f64>,

    /// Fitted response Ŷ = X·β
    pub predictions: DVector<f64>,

    pub metrics: FitMetrics,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Y − Ŷ
    pub fn residuals(&self) -> DVector<f64> {
        &self.response - &self.predictions
    }

    /// Coefficient of `term`, if it was part of the fit
    ///
    /// For a duplicated term this returns the first occurrence.
    pub fn coefficient(&self, term: BasisTerm) -> Option<f64> {
        self.terms
            .iter()
            .position(|t| *t == term)
            .map(|i| self.coefficients[i])
    }

    /// Evaluate the fitted polynomial at one point
    pub fn predict(&self, values: f64, objects: f64) -> f64 {
        self.terms
            .iter()
            .zip(self.coefficients.iter())
            .map(|(term, beta)| beta * term.evaluate(values, objects))
            .sum()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_phases_keeps_order_and_dedups() {
        assert_eq!(
            PhaseKind::parse_list("T,s,T,E").unwrap(),
            vec![PhaseKind::Total, PhaseKind::Scheduling, PhaseKind::Execution]
        );
    }

    #[test]
    fn test_unknown_phase() {
        assert!(matches!(
            PhaseKind::parse_list("S,X"),
            Err(AnalysisError::UnknownPhase { .. })
        ));
        assert!(PhaseKind::parse_list("").is_err());
    }

    #[test]
    fn test_metrics_of_perfect_fit() {
        let y = DVector::from_vec(vec![1.0, 2.0, 4.0, 8.0]);
        let metrics = FitMetrics::compute(&y, &y.clone(), 2);

        assert_eq!(metrics.rss, 0.0);
        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.rmse, 0.0);
        assert_eq!(metrics.r_squared, 1.0);
        assert_eq!(metrics.adjusted_r_squared, 1.0);
    }

    #[test]
    fn test_metrics_values() {
        let y = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let p = DVector::from_vec(vec![1.5, 2.0, 2.5, 4.0, 5.0]);
        let metrics = FitMetrics::compute(&y, &p, 2);

        // residuals: -0.5, 0, 0.5, 0, 0
        assert_relative_eq!(metrics.mae, 0.2, epsilon = 1e-12);
        assert_relative_eq!(metrics.rss, 0.5, epsilon = 1e-12);
        assert_relative_eq!(metrics.rmse, (0.1f64).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(metrics.sst, 10.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.r_squared, 0.95, epsilon = 1e-12);
        // 1 - 0.05 * 4 / 2
        assert_relative_eq!(metrics.adjusted_r_squared, 0.9, epsilon = 1e-12);
        assert!(metrics.adjusted_r_squared <= metrics.r_squared);
    }

    #[test]
    fn test_metrics_of_constant_response() {
        let y = DVector::from_vec(vec![10.0, 10.0, 10.0]);
        let exact = FitMetrics::compute(&y, &y.clone(), 1);
        assert_eq!(exact.r_squared, 1.0);

        let off = FitMetrics::compute(&y, &DVector::from_vec(vec![9.0, 10.0, 11.0]), 1);
        assert!(off.r_squared.is_nan());
    }

    #[test]
    fn test_adjusted_r_squared_without_degrees_of_freedom() {
        let y = DVector::from_vec(vec![1.0, 2.0, 4.0]);
        let metrics = FitMetrics::compute(&y, &y.clone(), 2);
        assert_eq!(metrics.r_squared, 1.0);
        assert!(metrics.adjusted_r_squared.is_nan());
    }

    #[test]
    fn test_predict_and_coefficient() {
        let phase = Phase {
            kind: PhaseKind::Total,
            terms: vec![BasisTerm::ValuesObjects, BasisTerm::Constant],
            coefficients: DVector::from_vec(vec![2.0, -5.0]),
            response: DVector::from_vec(vec![0.0]),
            predictions: DVector::from_vec(vec![0.0]),
            metrics: FitMetrics::compute(&DVector::from_vec(vec![0.0]), &DVector::from_vec(vec![0.0]), 2),
        };

        assert_eq!(phase.predict(3.0, 4.0), 19.0);
        assert_eq!(phase.coefficient(BasisTerm::Constant), Some(-5.0));
        assert_eq!(phase.coefficient(BasisTerm::Values), None);
        assert_eq!(phase.name(), "Total");
    }
}

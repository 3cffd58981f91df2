//! Run configurations
//!
//! Plain structs describing one invocation of each tool. The command line
//! parser fills them in; library users can build them directly.
//!
//! # Defaults
//!
//! | Run | Terms | Phases | Coefficients |
//! |-----|-------|--------|--------------|
//! | [`FitConfig`] | `vo2,vo,v,o2,o,1` | `S,E,T` | full |
//! | [`SplitFitConfig`] | `vo2,vo,v,o2,o,1` | `S,T` | integer |

use std::path::PathBuf;

use crate::data::{RangeFilter, ValidationPolicy};
use crate::error::Result;
use crate::regression::{BasisTerm, PhaseKind};
use crate::report::{CoefficientStyle, ReportOptions};

/// Options shared by both fit runs
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    /// Basis terms, in report order
    pub terms: Vec<BasisTerm>,

    /// Phases to fit, in report order
    pub phases: Vec<PhaseKind>,

    /// Samples outside these bounds are dropped before fitting
    pub filter: RangeFilter,

    pub report: ReportOptions,

    /// Write observed and fitted values here
    pub export: Option<PathBuf>,

    /// Draw the relative error chart here
    pub residuals: Option<PathBuf>,
}

impl FitOptions {
    fn new(phases: Vec<PhaseKind>, coefficients: CoefficientStyle) -> Self {
        Self {
            terms: BasisTerm::DEFAULT.to_vec(),
            phases,
            filter: RangeFilter::unbounded(),
            report: ReportOptions {
                coefficients,
                show_errors: false,
            },
            export: None,
            residuals: None,
        }
    }

    /// Reject option combinations that cannot produce a fit
    pub fn validate(&self) -> Result<()> {
        self.filter.validate()
    }
}

/// Fit of one `[values, objects, scheduling, total]` file
#[derive(Debug, Clone, PartialEq)]
pub struct FitConfig {
    pub dataset: PathBuf,

    /// What to do with samples where total < scheduling
    pub validation: ValidationPolicy,

    pub options: FitOptions,
}

impl FitConfig {
    pub fn new(dataset: impl Into<PathBuf>) -> Self {
        Self {
            dataset: dataset.into(),
            validation: ValidationPolicy::default(),
            options: FitOptions::new(PhaseKind::ALL.to_vec(), CoefficientStyle::Full),
        }
    }
}

/// Fit of an `inputs` file paired with an `outputs` file
#[derive(Debug, Clone, PartialEq)]
pub struct SplitFitConfig {
    /// `[values, objects]` rows
    pub inputs: PathBuf,

    /// `[scheduling, total]` rows, parallel to `inputs`
    pub dataset: PathBuf,

    /// Outputs of a reference run, subtracted row by row before fitting
    pub baseline: Option<PathBuf>,

    pub options: FitOptions,
}

impl SplitFitConfig {
    pub fn new(inputs: impl Into<PathBuf>, dataset: impl Into<PathBuf>) -> Self {
        Self {
            inputs: inputs.into(),
            dataset: dataset.into(),
            baseline: None,
            options: FitOptions::new(
                vec![PhaseKind::Scheduling, PhaseKind::Total],
                CoefficientStyle::Integer,
            ),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_defaults() {
        let config = FitConfig::new("run.txt");
        assert_eq!(config.options.terms, BasisTerm::DEFAULT.to_vec());
        assert_eq!(config.options.phases, PhaseKind::ALL.to_vec());
        assert_eq!(config.options.report.coefficients, CoefficientStyle::Full);
        assert_eq!(config.validation, ValidationPolicy::Warn);
        assert!(config.options.export.is_none());
    }

    #[test]
    fn test_split_fit_defaults() {
        let config = SplitFitConfig::new("inputs.txt", "outputs.txt");
        assert_eq!(config.options.phases, vec![PhaseKind::Scheduling, PhaseKind::Total]);
        assert_eq!(config.options.report.coefficients, CoefficientStyle::Integer);
        assert!(config.baseline.is_none());
    }

    #[test]
    fn test_validate_filter() {
        let mut config = FitConfig::new("run.txt");
        assert!(config.options.validate().is_ok());

        config.options.filter = RangeFilter::unbounded().objects(10, 5);
        assert!(config.options.validate().is_err());
    }
}

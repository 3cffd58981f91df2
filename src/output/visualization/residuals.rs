//! Relative error of a fit, per phase
//!
//! One panel per phase, x = objects, y = `100·(Y − Ŷ)/Ŷ` in percent.
//! Errors beyond ±100 % are clamped so a few near-zero predictions do not
//! flatten the rest of the cloud.

use std::path::Path;

use super::config::{ChartConfig, NO_TITLE};
use super::scatter::{render_panels, Panel, Series};
use crate::data::Observations;
use crate::error::{AnalysisError, Result};
use crate::regression::Phase;

/// Clamp bound for relative errors, in percent
pub const RELATIVE_ERROR_LIMIT: f64 = 100.0;

/// `100·(Y − Ŷ)/Ŷ`, clamped to ±[`RELATIVE_ERROR_LIMIT`]
///
/// A zero prediction yields the limit with the sign of the residual, or 0
/// when the observation is zero too.
pub fn relative_error(observed: f64, predicted: f64) -> f64 {
    let residual = observed - predicted;
    if predicted == 0.0 {
        return if residual == 0.0 {
            0.0
        } else {
            RELATIVE_ERROR_LIMIT.copysign(residual)
        };
    }
    (100.0 * residual / predicted).clamp(-RELATIVE_ERROR_LIMIT, RELATIVE_ERROR_LIMIT)
}

/// Draw the relative error of each fitted phase against object count
///
/// # Errors
///
/// - No phases
/// - A phase fitted on a different number of samples than `observations`
/// - Drawing or file errors
pub fn plot_relative_error(
    phases: &[Phase],
    observations: &Observations,
    output_path: &Path,
    config: Option<&ChartConfig>,
) -> Result<()> {
    if phases.is_empty() {
        return Err(AnalysisError::InvalidArgument("no phases to plot".to_string()));
    }

    let mut panels = Vec::with_capacity(phases.len());
    for phase in phases {
        if phase.response.len() != observations.len() {
            return Err(AnalysisError::ShapeMismatch {
                what: format!("{} fit versus observations", phase.name()),
                expected: observations.len(),
                found: phase.response.len(),
            });
        }

        let points = observations
            .objects
            .iter()
            .zip(phase.response.iter().zip(phase.predictions.iter()))
            .map(|(o, (y, y_hat))| (*o, relative_error(*y, *y_hat)))
            .collect();

        panels.push(Panel {
            title: phase.name().to_string(),
            xlabel: "# of objects".to_string(),
            ylabel: "relative error, %".to_string(),
            series: vec![Series {
                label: String::new(),
                points,
            }],
        });
    }

    let default_config = ChartConfig::relative_error(NO_TITLE);
    render_panels(&panels, output_path, config.unwrap_or(&default_config))
}

// =================================================================================================
// Tests
// =================================================================================================

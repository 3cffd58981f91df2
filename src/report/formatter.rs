//! Column-aligned phase report
//!
//! ```text
//! Scheduling: 0.0021⋅v⋅o² + 3.5⋅v⋅o − 12⋅v + 1000, R² = 0.998, Adjusted R² = 0.997
//! Total:         0.0049⋅v⋅o² + 7⋅v⋅o + 40⋅v + 250, R² =  0.99, Adjusted R² = 0.989
//! ```
//!
//! Names are left-justified, equations and metrics right-justified, each
//! column as wide as its widest entry.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::error::AnalysisError;
use crate::regression::{BasisTerm, Phase};

/// How coefficients are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoefficientStyle {
    /// Rounded to whole nanoseconds
    Integer,

    /// Shortest representation that round-trips the `f64`, in exponent form
    /// when very small or very large
    #[default]
    Full,
}

impl FromStr for CoefficientStyle {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "integer" | "int" => Ok(CoefficientStyle::Integer),
            "full" => Ok(CoefficientStyle::Full),
            other => Err(AnalysisError::InvalidArgument(format!(
                "coefficient style {:?}, expected integer or full",
                other
            ))),
        }
    }
}

impl fmt::Display for CoefficientStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoefficientStyle::Integer => f.write_str("integer"),
            CoefficientStyle::Full => f.write_str("full"),
        }
    }
}

/// Report settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportOptions {
    pub coefficients: CoefficientStyle,

    /// Append MAE and RMSE columns
    pub show_errors: bool,
}

/// Shortest round-trip text of `x`, switching to exponent form outside
/// `[1e-4, 1e16)` so a near-zero value cannot widen its column
pub fn format_float(x: f64) -> String {
    let magnitude = x.abs();
    if x == 0.0 || !x.is_finite() || (1e-4..1e16).contains(&magnitude) {
        x.to_string()
    } else {
        format!("{:e}", x)
    }
}

/// Split a coefficient into (is negative, magnitude text)
///
/// A value that displays as zero is never negative, so `-0` cannot appear.
fn signed_magnitude(coefficient: f64, style: CoefficientStyle) -> (bool, String) {
    let shown = match style {
        CoefficientStyle::Integer => coefficient.round(),
        CoefficientStyle::Full => coefficient,
    };
    let magnitude = match style {
        CoefficientStyle::Integer => format!("{:.0}", shown.abs()),
        CoefficientStyle::Full => format_float(shown.abs()),
    };
    (shown < 0.0, magnitude)
}

/// Render `c₁⋅t₁ ± c₂⋅t₂ ± …`
pub fn render_equation(terms: &[BasisTerm], coefficients: &[f64], style: CoefficientStyle) -> String {
    let mut equation = String::new();

    for (i, (term, coefficient)) in terms.iter().zip(coefficients).enumerate() {
        let (negative, magnitude) = signed_magnitude(*coefficient, style);
        let sign = match (i, negative) {
            (0, false) => "",
            (0, true) => "−",
            (_, false) => " + ",
            (_, true) => " − ",
        };
        equation.push_str(sign);
        equation.push_str(&magnitude);
        equation.push_str(term.fragment());
    }

    equation
}

/// Text cells of one report line, before alignment
#[derive(Debug, Clone, PartialEq)]
struct ReportRow {
    name: String,
    equation: String,
    r_squared: String,
    adjusted_r_squared: String,
    mae: String,
    rmse: String,
}

impl ReportRow {
    fn from_phase(phase: &Phase, options: &ReportOptions) -> Self {
        let coefficients: Vec<f64> = phase.coefficients.iter().copied().collect();
        Self {
            name: format!("{}:", phase.name()),
            equation: render_equation(&phase.terms, &coefficients, options.coefficients),
            r_squared: format_float(phase.metrics.r_squared),
            adjusted_r_squared: format_float(phase.metrics.adjusted_r_squared),
            mae: format_float(phase.metrics.mae),
            rmse: format_float(phase.metrics.rmse),
        }
    }
}

fn column_width<'a>(cells: impl Iterator<Item = &'a String>) -> usize {
    cells.map(|c| c.chars().count()).max().unwrap_or(0)
}

/// Render one aligned line per phase
pub fn format_report(phases: &[Phase], options: &ReportOptions) -> Vec<String> {
    let rows: Vec<ReportRow> = phases.iter().map(|p| ReportRow::from_phase(p, options)).collect();

    let name_w = column_width(rows.iter().map(|r| &r.name));
    let eq_w = column_width(rows.iter().map(|r| &r.equation));
    let r2_w = column_width(rows.iter().map(|r| &r.r_squared));
    let adj_w = column_width(rows.iter().map(|r| &r.adjusted_r_squared));
    let mae_w = column_width(rows.iter().map(|r| &r.mae));
    let rmse_w = column_width(rows.iter().map(|r| &r.rmse));

    rows.iter()
        .map(|r| {
            let mut line = format!(
                "{:<name_w$} {:>eq_w$}, R² = {:>r2_w$}, Adjusted R² = {:>adj_w$}",
                r.name, r.equation, r.r_squared, r.adjusted_r_squared
            );
            if options.show_errors {
                line.push_str(&format!(", MAE = {:>mae_w$}, RMSE = {:>rmse_w$}", r.mae, r.rmse));
            }
            line
        })
        .collect()
}

/// Write the report, one line per phase
pub fn write_report<W: Write>(writer: &mut W, phases: &[Phase], options: &ReportOptions) -> io::Result<()> {
    for line in format_report(phases, options) {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::{FitMetrics, PhaseKind};
    use nalgebra::DVector;

    fn phase(kind: PhaseKind, terms: &[BasisTerm], coefficients: &[f64], r2: f64, adj: f64) -> Phase {
        let y = DVector::from_vec(vec![0.0]);
        Phase {
            kind,
            terms: terms.to_vec(),
            coefficients: DVector::from_column_slice(coefficients),
            response: y.clone(),
            predictions: y,
            metrics: FitMetrics {
                mae: 0.5,
                rmse: 0.75,
                rss: 0.0,
                sst: 0.0,
                r_squared: r2,
                adjusted_r_squared: adj,
            },
        }
    }

    #[test]
    fn test_equation_sign_joining() {
        let terms = [BasisTerm::Objects, BasisTerm::Values, BasisTerm::Constant];
        assert_eq!(
            render_equation(&terms, &[20.0, -3.5, 10.0], CoefficientStyle::Full),
            "20⋅o − 3.5⋅v + 10"
        );
        assert_eq!(
            render_equation(&terms, &[-20.0, 3.5, -10.0], CoefficientStyle::Full),
            "−20⋅o + 3.5⋅v − 10"
        );
    }

    #[test]
    fn test_equation_integer_style() {
        let terms = [BasisTerm::ValuesObjectsSquared, BasisTerm::ObjectsSquared, BasisTerm::Constant];
        assert_eq!(
            render_equation(&terms, &[1234.56, -0.3, -7.5], CoefficientStyle::Integer),
            "1235⋅v⋅o² + 0⋅o² − 8"
        );
    }

    #[test]
    fn test_equation_never_prints_double_negative() {
        let terms = [BasisTerm::Objects, BasisTerm::Constant];
        let text = render_equation(&terms, &[-1.0, -2.0], CoefficientStyle::Full);
        assert!(!text.contains("− −") && !text.contains("−-") && !text.contains("+ -"));
    }

    #[test]
    fn test_format_float_switches_to_exponent() {
        assert_eq!(format_float(5.684341886080802e-14), "5.684341886080802e-14");
        assert_eq!(format_float(-2.5e-7), "-2.5e-7");
        assert_eq!(format_float(1e16), "1e16");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(123456.5), "123456.5");
        assert_eq!(format_float(0.0), "0");
    }

    #[test]
    fn test_near_zero_intercept_stays_compact() {
        let terms = [BasisTerm::Objects, BasisTerm::Constant];
        assert_eq!(
            render_equation(&terms, &[20.0, -5.684341886080802e-14], CoefficientStyle::Full),
            "20⋅o − 5.684341886080802e-14"
        );

        let mut tiny = phase(PhaseKind::Total, &[BasisTerm::Constant], &[1.0], 1.0, 1.0);
        tiny.metrics.mae = 3e-15;
        let options = ReportOptions {
            coefficients: CoefficientStyle::Full,
            show_errors: true,
        };
        assert_eq!(
            format_report(&[tiny], &options)[0],
            "Total: 1, R² = 1, Adjusted R² = 1, MAE = 3e-15, RMSE = 0.75"
        );
    }

    #[test]
    fn test_parse_style() {
        assert_eq!("integer".parse::<CoefficientStyle>().unwrap(), CoefficientStyle::Integer);
        assert_eq!("full".parse::<CoefficientStyle>().unwrap(), CoefficientStyle::Full);
        assert!("round".parse::<CoefficientStyle>().is_err());
    }

    #[test]
    fn test_report_columns_are_aligned() {
        let phases = vec![
            phase(PhaseKind::Scheduling, &[BasisTerm::Objects, BasisTerm::Constant], &[20.0, -10.0], 1.0, 1.0),
            phase(PhaseKind::Total, &[BasisTerm::Objects, BasisTerm::Constant], &[2.5, 300.0], 0.5, 0.25),
        ];
        let lines = format_report(&phases, &ReportOptions::default());

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Scheduling:   20⋅o − 10, R² =   1, Adjusted R² =    1");
        assert_eq!(lines[1], "Total:      2.5⋅o + 300, R² = 0.5, Adjusted R² = 0.25");
        assert_eq!(lines[0].chars().count(), lines[1].chars().count());
    }

    #[test]
    fn test_report_with_errors() {
        let phases = vec![phase(PhaseKind::Total, &[BasisTerm::Constant], &[4.0], 1.0, 1.0)];
        let options = ReportOptions {
            coefficients: CoefficientStyle::Integer,
            show_errors: true,
        };
        let lines = format_report(&phases, &options);
        assert_eq!(lines[0], "Total: 4, R² = 1, Adjusted R² = 1, MAE = 0.5, RMSE = 0.75");
    }

    #[test]
    fn test_write_report() {
        let phases = vec![phase(PhaseKind::Execution, &[BasisTerm::Values], &[1.5], 0.9, 0.8)];
        let mut out = Vec::new();
        write_report(&mut out, &phases, &ReportOptions::default()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Execution: 1.5⋅v, R² = 0.9, Adjusted R² = 0.8\n"
        );
    }
}

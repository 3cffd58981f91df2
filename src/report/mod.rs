//! Text reports of fitted phases
//!
//! One line per phase: the fitted equation with sign-aware joining, then R²
//! and adjusted R², every column aligned across phases. Coefficients are
//! printed either rounded to whole nanoseconds or at full precision
//! ([`CoefficientStyle`]).

pub mod formatter;

pub use formatter::{format_float, format_report, render_equation, write_report, CoefficientStyle, ReportOptions};

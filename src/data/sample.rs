//! Typed benchmark samples
//!
//! A benchmark run varies two parameters, the number of task-local values
//! (`v`) and the number of objects (`o`), and measures the time spent
//! scheduling the deinitialization and the total time of the operation.

use std::path::PathBuf;

use crate::error::{AnalysisError, Result};

// =================================================================================================
// Single-file convention
// =================================================================================================

/// One row of a `[values, objects, scheduling, total]` measurement file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Number of task-local values
    pub values: u64,

    /// Number of objects
    pub objects: u64,

    /// Wall time of the scheduling phase (ns)
    pub scheduling_ns: u64,

    /// Wall time of the whole operation (ns)
    pub total_ns: u64,
}

impl Sample {
    pub fn new(values: u64, objects: u64, scheduling_ns: u64, total_ns: u64) -> Self {
        Self {
            values,
            objects,
            scheduling_ns,
            total_ns,
        }
    }

    /// Time spent after scheduling, `total - scheduling`
    ///
    /// Signed: corrupt rows with `total < scheduling` come out negative.
    pub fn execution_ns(&self) -> i64 {
        self.total_ns as i64 - self.scheduling_ns as i64
    }

    /// `total >= scheduling`
    pub fn is_consistent(&self) -> bool {
        self.total_ns >= self.scheduling_ns
    }
}

/// What to do with samples whose total time is below their scheduling time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// Log a warning and fit anyway
    #[default]
    Warn,

    /// Fail the run
    Reject,
}

/// Samples read from one file, in file order
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Source file
    pub path: PathBuf,

    /// Samples in file order
    pub samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(path: impl Into<PathBuf>, samples: Vec<Sample>) -> Self {
        Self {
            path: path.into(),
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Keep only the samples inside `filter`, preserving order
    pub fn filtered(&self, filter: &RangeFilter) -> Dataset {
        Dataset {
            path: self.path.clone(),
            samples: self
                .samples
                .iter()
                .filter(|s| filter.contains(s.values, s.objects))
                .copied()
                .collect(),
        }
    }

    /// Check `total >= scheduling` on every sample
    ///
    /// Returns the number of inconsistent samples. Under
    /// [`ValidationPolicy::Reject`] the first one is an error instead.
    pub fn validate(&self, policy: ValidationPolicy) -> Result<usize> {
        let mut bad = self
            .samples
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_consistent());

        let Some((row, first)) = bad.next() else {
            return Ok(0);
        };

        match policy {
            ValidationPolicy::Reject => Err(AnalysisError::InvalidSample {
                path: self.path.clone(),
                row,
                scheduling: first.scheduling_ns,
                total: first.total_ns,
            }),
            ValidationPolicy::Warn => {
                let count = 1 + bad.count();
                log::warn!(
                    "{}: {} samples have total < scheduling (first: sample {}, v={} o={} s={} t={}), \
                     execution will be negative for them",
                    self.path.display(),
                    count,
                    row,
                    first.values,
                    first.objects,
                    first.scheduling_ns,
                    first.total_ns
                );
                Ok(count)
            }
        }
    }

    /// Regression view of the samples
    pub fn observations(&self) -> Observations {
        let mut obs = Observations::with_capacity(self.len());
        for s in &self.samples {
            obs.push(
                s.values as f64,
                s.objects as f64,
                s.scheduling_ns as f64,
                s.total_ns as f64,
            );
        }
        obs
    }
}

// =================================================================================================
// Two-file convention
// =================================================================================================

/// One row of an `inputs` file: the benchmark parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub values: u64,
    pub objects: u64,
}

/// One row of an `outputs` file: the measured times
///
/// Signed because a baseline-subtracted delta can be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub scheduling_ns: i64,
    pub total_ns: i64,
}

impl Measurement {
    /// `self - baseline`, or `None` if either column overflows `i64`
    pub fn checked_sub(self, baseline: Measurement) -> Option<Measurement> {
        Some(Measurement {
            scheduling_ns: self.scheduling_ns.checked_sub(baseline.scheduling_ns)?,
            total_ns: self.total_ns.checked_sub(baseline.total_ns)?,
        })
    }
}

/// Pair inputs with outputs row by row, optionally subtracting a baseline
///
/// The baseline is subtracted from the raw responses before anything else,
/// then the range filter drops rows by their input point together with the
/// matching measurement.
pub fn pair_measurements(
    points: &[Point],
    outputs: &[Measurement],
    baseline: Option<&[Measurement]>,
    filter: &RangeFilter,
) -> Result<Observations> {
    if outputs.len() != points.len() {
        return Err(AnalysisError::ShapeMismatch {
            what: "outputs rows versus inputs rows".to_string(),
            expected: points.len(),
            found: outputs.len(),
        });
    }

    if let Some(base) = baseline
        && base.len() != outputs.len()
    {
        return Err(AnalysisError::ShapeMismatch {
            what: "baseline rows versus outputs rows".to_string(),
            expected: outputs.len(),
            found: base.len(),
        });
    }

    let mut obs = Observations::with_capacity(points.len());
    for (i, (point, measured)) in points.iter().zip(outputs).enumerate() {
        let response = match baseline {
            Some(base) => measured.checked_sub(base[i]).ok_or_else(|| {
                AnalysisError::InvalidArgument(format!(
                    "baseline row {}: ({}, {}) minus ({}, {}) overflows",
                    i + 1,
                    measured.scheduling_ns,
                    measured.total_ns,
                    base[i].scheduling_ns,
                    base[i].total_ns
                ))
            })?,
            None => *measured,
        };
        if filter.contains(point.values, point.objects) {
            obs.push(
                point.values as f64,
                point.objects as f64,
                response.scheduling_ns as f64,
                response.total_ns as f64,
            );
        }
    }

    Ok(obs)
}

// =================================================================================================
// Range filtering
// =================================================================================================

/// Inclusive bounds on `values` and `objects`, each side optional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeFilter {
    pub min_values: Option<u64>,
    pub max_values: Option<u64>,
    pub min_objects: Option<u64>,
    pub max_objects: Option<u64>,
}

impl RangeFilter {
    /// No bounds at all
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Builder: bound `values` to `[min, max]`
    pub fn values(mut self, min: u64, max: u64) -> Self {
        self.min_values = Some(min);
        self.max_values = Some(max);
        self
    }

    /// Builder: bound `objects` to `[min, max]`
    pub fn objects(mut self, min: u64, max: u64) -> Self {
        self.min_objects = Some(min);
        self.max_objects = Some(max);
        self
    }

    /// True if `(values, objects)` lies inside every given bound
    pub fn contains(&self, values: u64, objects: u64) -> bool {
        self.min_values.is_none_or(|min| values >= min)
            && self.max_values.is_none_or(|max| values <= max)
            && self.min_objects.is_none_or(|min| objects >= min)
            && self.max_objects.is_none_or(|max| objects <= max)
    }

    /// Reject bounds that can never match
    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_values, self.max_values)
            && min > max
        {
            return Err(AnalysisError::InvalidArgument(format!(
                "min-values {} is above max-values {}",
                min, max
            )));
        }
        if let (Some(min), Some(max)) = (self.min_objects, self.max_objects)
            && min > max
        {
            return Err(AnalysisError::InvalidArgument(format!(
                "min-objects {} is above max-objects {}",
                min, max
            )));
        }
        Ok(())
    }
}

// =================================================================================================
// Regression view
// =================================================================================================

/// Column view of retained samples, ready for the regression engine
///
/// All four columns have the same length; row `i` of each belongs to the
/// same sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observations {
    pub values: Vec<f64>,
    pub objects: Vec<f64>,
    pub scheduling: Vec<f64>,
    pub total: Vec<f64>,
}

impl Observations {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            values: Vec::with_capacity(n),
            objects: Vec::with_capacity(n),
            scheduling: Vec::with_capacity(n),
            total: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, values: f64, objects: f64, scheduling: f64, total: f64) {
        self.values.push(values);
        self.objects.push(objects);
        self.scheduling.push(scheduling);
        self.total.push(total);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `total - scheduling`, row by row
    pub fn execution(&self) -> Vec<f64> {
        self.total
            .iter()
            .zip(&self.scheduling)
            .map(|(t, s)| t - s)
            .collect()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

//! Random benchmark points
//!
//! The benchmark harness consumes an `inputs` file listing the `(values,
//! objects)` combinations to measure. This module draws such points
//! uniformly from two inclusive ranges.

use std::ops::RangeInclusive;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::sample::Point;
use crate::error::{AnalysisError, Result};

/// Inclusive `MIN:MAX` range of a benchmark parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamRange {
    pub min: u64,
    pub max: u64,
}

impl ParamRange {
    pub fn new(min: u64, max: u64) -> Result<Self> {
        if min > max {
            return Err(AnalysisError::InvalidArgument(format!(
                "range {}:{} has MIN above MAX",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn as_inclusive(&self) -> RangeInclusive<u64> {
        self.min..=self.max
    }
}

impl FromStr for ParamRange {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AnalysisError::InvalidArgument(format!("expected MIN:MAX, got {:?}", s));

        let (min, max) = s.split_once(':').ok_or_else(invalid)?;
        let min = min.trim().parse::<u64>().map_err(|_| invalid())?;
        let max = max.trim().parse::<u64>().map_err(|_| invalid())?;
        Self::new(min, max)
    }
}

impl std::fmt::Display for ParamRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.min, self.max)
    }
}

/// Point generation settings
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Range of task-local values (default `0:200`)
    pub values: ParamRange,

    /// Range of objects (default `1:5000`)
    pub objects: ParamRange,

    /// Number of points (default 5000)
    pub points: usize,

    /// Fixed seed for reproducible output
    pub seed: Option<u64>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            values: ParamRange { min: 0, max: 200 },
            objects: ParamRange { min: 1, max: 5000 },
            points: 5000,
            seed: None,
        }
    }
}

/// Draw `config.points` uniform points
pub fn generate_points(config: &GenerateConfig) -> Vec<Point> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    (0..config.points)
        .map(|_| Point {
            values: rng.random_range(config.values.as_inclusive()),
            objects: rng.random_range(config.objects.as_inclusive()),
        })
        .collect()
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!("0:200".parse::<ParamRange>().unwrap(), ParamRange { min: 0, max: 200 });
        assert_eq!("7:7".parse::<ParamRange>().unwrap(), ParamRange { min: 7, max: 7 });
    }

    #[test]
    fn test_parse_range_rejects_malformed() {
        for bad in ["", "5", "1:2:3", "a:b", "-1:5", "9:3"] {
            assert!(bad.parse::<ParamRange>().is_err(), "{:?} should fail", bad);
        }
    }

    #[test]
    fn test_generated_points_stay_in_range() {
        let config = GenerateConfig {
            values: ParamRange { min: 3, max: 8 },
            objects: ParamRange { min: 10, max: 12 },
            points: 500,
            seed: Some(42),
        };
        let points = generate_points(&config);

        assert_eq!(points.len(), 500);
        assert!(points.iter().all(|p| (3..=8).contains(&p.values)));
        assert!(points.iter().all(|p| (10..=12).contains(&p.objects)));
    }

    #[test]
    fn test_seed_makes_output_reproducible() {
        let config = GenerateConfig {
            points: 50,
            seed: Some(7),
            ..Default::default()
        };
        assert_eq!(generate_points(&config), generate_points(&config));
    }
}

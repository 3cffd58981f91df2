//! Helper functions for integration tests

use std::fs;
use std::path::{Path, PathBuf};

use deinit_analysis::data::{write_dataset, Sample};

/// Cost model used to synthesize measurement files
///
/// Returns `(scheduling_ns, total_ns)` for `(values, objects)`.
pub type CostModel = fn(u64, u64) -> (u64, u64);

/// Samples on a `values × objects` grid
pub fn grid_samples(values: &[u64], objects: &[u64], model: CostModel) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(values.len() * objects.len());
    for &v in values {
        for &o in objects {
            let (scheduling, total) = model(v, o);
            samples.push(Sample::new(v, o, scheduling, total));
        }
    }
    samples
}

/// Write `samples` as `dir/name` with a one-line header
pub fn write_temp_dataset(dir: &Path, name: &str, samples: &[Sample]) -> PathBuf {
    let path = dir.join(name);
    write_dataset(&path, samples, &["values objects scheduling total"]).unwrap();
    path
}

/// Write raw text as `dir/name`
pub fn write_temp_text(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Relative error between computed and expected values
pub fn relative_error(computed: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        computed.abs()
    } else {
        ((computed - expected) / expected).abs()
    }
}

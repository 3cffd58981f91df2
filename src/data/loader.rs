//! Dataset loader
//!
//! Column meaning is positional and fixed:
//!
//! | File kind | Columns |
//! |-----------|---------|
//! | dataset   | `values objects scheduling_ns total_ns` |
//! | inputs    | `values objects` |
//! | outputs   | `scheduling_ns total_ns` |
//!
//! ```rust,ignore
//! use deinit_analysis::data::{load_dataset, RangeFilter};
//!
//! let dataset = load_dataset("data/async_tree-vs-values-100.txt".as_ref(), &RangeFilter::unbounded())?;
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::sample::{Dataset, Measurement, Point, RangeFilter, Sample};
use super::table::NumericTable;
use crate::error::{AnalysisError, Result};

/// Columns of a full dataset file
pub const DATASET_COLUMNS: usize = 4;

/// Columns of an `inputs` file
pub const INPUT_COLUMNS: usize = 2;

/// Columns of an `outputs` file
pub const OUTPUT_COLUMNS: usize = 2;

/// Load a `[values, objects, scheduling, total]` file, keeping the samples
/// inside `filter`
pub fn load_dataset(path: &Path, filter: &RangeFilter) -> Result<Dataset> {
    let table = NumericTable::read(path, DATASET_COLUMNS)?;
    let dataset = dataset_from_table(&table)?;
    let kept = dataset.filtered(filter);

    log::debug!(
        "{}: kept {} of {} samples",
        path.display(),
        kept.len(),
        dataset.len()
    );

    Ok(kept)
}

/// Convert a 4-column table into samples
pub fn dataset_from_table(table: &NumericTable) -> Result<Dataset> {
    if table.ncols() < DATASET_COLUMNS {
        return Err(AnalysisError::ShapeMismatch {
            what: format!("columns of {}", table.path.display()),
            expected: DATASET_COLUMNS,
            found: table.ncols(),
        });
    }

    let samples = (0..table.nrows())
        .map(|row| {
            Ok(Sample::new(
                table.unsigned(row, 0)?,
                table.unsigned(row, 1)?,
                table.unsigned(row, 2)?,
                table.unsigned(row, 3)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Dataset::new(table.path.clone(), samples))
}

/// Load an `inputs` file of `[values, objects]` pairs, unfiltered
pub fn load_inputs(path: &Path) -> Result<Vec<Point>> {
    let table = NumericTable::read(path, INPUT_COLUMNS)?;
    (0..table.nrows())
        .map(|row| {
            Ok(Point {
                values: table.unsigned(row, 0)?,
                objects: table.unsigned(row, 1)?,
            })
        })
        .collect()
}

/// Load an `outputs` (or baseline) file of `[scheduling, total]` pairs
pub fn load_measurements(path: &Path) -> Result<Vec<Measurement>> {
    let table = NumericTable::read(path, OUTPUT_COLUMNS)?;
    Ok(table
        .data
        .rows()
        .into_iter()
        .map(|row| Measurement {
            scheduling_ns: row[0],
            total_ns: row[1],
        })
        .collect())
}

/// Write samples in the documented tab-separated format
///
/// Each line of `header` is emitted as a `# ` comment before the data.
pub fn write_dataset(path: &Path, samples: &[Sample], header: &[&str]) -> Result<()> {
    let io_err = |e: std::io::Error| AnalysisError::io(path, e);
    let mut file = BufWriter::new(File::create(path).map_err(io_err)?);

    for line in header {
        writeln!(file, "# {}", line).map_err(io_err)?;
    }
    for s in samples {
        writeln!(
            file,
            "{}\t{}\t{}\t{}",
            s.values, s.objects, s.scheduling_ns, s.total_ns
        )
        .map_err(io_err)?;
    }

    file.flush().map_err(io_err)
}

/// Write `[values, objects]` points in the `inputs` format
pub fn write_points<W: Write>(writer: &mut W, points: &[Point], header: &[String]) -> std::io::Result<()> {
    for line in header {
        if line.is_empty() {
            writeln!(writer, "#")?;
        } else {
            writeln!(writer, "# {}", line)?;
        }
    }
    for p in points {
        writeln!(writer, "{}\t{}", p.values, p.objects)?;
    }
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

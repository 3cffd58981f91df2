//! Benchmark measurement data
//!
//! # Organization
//!
//! - **table**: raw integer tables read from text files (`NumericTable`)
//! - **sample**: typed rows (`Sample`, `Point`, `Measurement`), range filtering
//!   and the column view handed to the regression engine (`Observations`)
//! - **loader**: file-kind specific readers and writers
//! - **generate**: random `(values, objects)` points for the benchmark harness
//!
//! # File Format
//!
//! ```text
//! # optional comment lines, ignored
//! <values>\t<objects>\t<scheduling_ns>\t<total_ns>
//! ```

pub mod table;
pub mod sample;
pub mod loader;
pub mod generate;

pub use table::NumericTable;
pub use sample::{
    pair_measurements,
    Dataset,
    Measurement,
    Observations,
    Point,
    RangeFilter,
    Sample,
    ValidationPolicy,
};
pub use loader::{load_dataset, load_inputs, load_measurements, write_dataset, write_points};
pub use generate::{generate_points, GenerateConfig, ParamRange};

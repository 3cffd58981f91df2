//! Common utilities for integration tests

pub mod test_helpers;

// Re-export commonly used items
#[allow(unused_imports)]
pub use test_helpers::{
    grid_samples,
    relative_error,
    write_temp_dataset,
    write_temp_text,
    CostModel,
};

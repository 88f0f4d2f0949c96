//! Provides error definitions.
use thiserror::Error;

/// Errors reported by checked array indexing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An index component sits at or beyond its dimension's extent.
    #[error("index {index} out of bounds for axis {axis} with extent {extent}")]
    OutOfBounds {
        axis: usize,
        index: usize,
        extent: usize,
    },

    /// A flattened offset landed beyond the backing storage.
    #[error("offset {offset} out of range for array of {len} elements")]
    OutOfRange { offset: usize, len: usize },
}

//! Provides error definitions.
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A runtime element list whose length does not match the matrix size.
    #[error("expected {expected} row-major elements, got {got}")]
    BufferLength { expected: usize, got: usize },
}

//! Compile-time-shaped dense matrices and column vectors with elementary
//! arithmetic. Shape mismatches are rejected by the type system; no
//! operation allocates or dispatches at runtime.
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(test)]
extern crate std;

mod error;
mod fields;
mod matrix;
mod vector;

pub use error::*;
pub use fields::*;
pub use matrix::*;
pub use vector::*;

//! Numerical utilities: the least-squares kernel used by variable projection.

pub mod ols;

pub use ols::*;

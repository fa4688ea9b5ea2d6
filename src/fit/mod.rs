//! Critical-time fitting orchestration.
//!
//! Responsibilities:
//!
//! - draw randomized restart points for `(tc, m, ω)` from a seeded RNG
//! - run each restart through Nelder-Mead on the reduced objective (parallel)
//! - reduce surviving candidates deterministically (lowest SSR wins)

pub mod fitter;
pub mod objective;

pub use fitter::*;

//! `lppls` — critical-time estimation for log-periodic power-law
//! singularities.
//!
//! Fits the seven-parameter LPPLS model
//!
//! ```text
//! ln E[p(t)] = a + b(tc−t)^m + (tc−t)^m [c1 cos(ω ln(tc−t)) + c2 sin(ω ln(tc−t))]
//! ```
//!
//! to an ordered series of `(time index, log price)` observations and
//! reports the predicted critical time `tc`, using separable nonlinear
//! least squares: each candidate `(tc, m, ω)` solves the linear
//! coefficients `(a, b, c1, c2)` exactly by OLS, and the three nonlinear
//! parameters are searched with randomized-restart Nelder-Mead.
//!
//! The crate is a pure function of its inputs plus an injectable seed:
//! no I/O, no caching, no ambient randomness. Callers own price retrieval,
//! the date-to-ordinal encoding (see [`report`]), and any caching of
//! results.
//!
//! ```no_run
//! use lppls::{fit, FitOptions, Observation};
//!
//! let observations: Vec<Observation> = unimplemented!("(ordinal day, ln price) pairs");
//! let result = fit(&observations, &FitOptions::default())?;
//! println!("{}", lppls::report::format_fit_summary(&result));
//! # Ok::<(), lppls::FitError>(())
//! ```

pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod models;
pub mod report;

pub use domain::{
    FitOptions, FitQuality, FitResult, LpplsParams, Observation, QualifyingFilter, SearchBounds,
};
pub use error::FitError;
pub use fit::{MIN_OBSERVATIONS, fit};

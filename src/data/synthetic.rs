//! Synthetic LPPLS series generation.
//!
//! Used by the unit tests and by downstream consumers for calibration
//! checks: generate a series from known parameters, fit it, and compare.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{LpplsParams, Observation};
use crate::error::FitError;
use crate::models::lppls_value;

/// Generate `n` observations at unit time steps starting at `t_start`:
/// exact model values plus seeded Gaussian noise of standard deviation
/// `noise_sigma` (zero disables the noise).
///
/// The whole window must end strictly before `params.tc`, otherwise the
/// model is undefined at the tail of the series.
pub fn generate_series(
    params: &LpplsParams,
    t_start: f64,
    n: usize,
    noise_sigma: f64,
    seed: u64,
) -> Result<Vec<Observation>, FitError> {
    if n == 0 {
        return Err(FitError::InvalidInput(
            "Series length must be > 0.".to_string(),
        ));
    }
    if !noise_sigma.is_finite() || noise_sigma < 0.0 {
        return Err(FitError::InvalidInput(format!(
            "Invalid noise sigma: {noise_sigma}."
        )));
    }
    let t_end = t_start + (n - 1) as f64;
    if !(t_start.is_finite() && t_end < params.tc) {
        return Err(FitError::InvalidInput(format!(
            "Window {t_start}..{t_end} must end before tc={}.",
            params.tc
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, noise_sigma)
        .map_err(|e| FitError::InvalidInput(format!("Noise distribution error: {e}")))?;

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let t = t_start + i as f64;
        let value = lppls_value(t, params);
        if !value.is_finite() {
            return Err(FitError::InvalidInput(format!(
                "Model value not finite at t={t}."
            )));
        }
        out.push(Observation::new(t, value + normal.sample(&mut rng)));
    }
    Ok(out)
}

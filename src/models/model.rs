//! LPPLS model evaluation.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for fixed nonlinear parameters (for OLS on the
//!   linear coefficients)
//! - predict `ln p(t)` from a full parameter vector (for residuals)
//!
//! Decomposing `C·cos(ω ln(tc−t) + φ)` into `c1·cos(·) + c2·sin(·)` makes the
//! model linear in `(a, b, c1, c2)` once `(tc, m, ω)` are fixed; that is what
//! lets the search run on three parameters instead of seven.

use nalgebra::{DMatrix, DVector};

use crate::domain::{LpplsParams, Observation};
use crate::math::solve_least_squares;

/// Number of linear coefficients (`a, b, c1, c2`).
pub const N_LINEAR: usize = 4;

/// Evaluate the LPPLS model at time `t`.
///
/// Defined only for `t < tc`; returns NaN otherwise so that out-of-domain
/// evaluations can never masquerade as small residuals.
pub fn lppls_value(t: f64, p: &LpplsParams) -> f64 {
    let dt = p.tc - t;
    if dt <= 0.0 {
        return f64::NAN;
    }
    let dt_m = dt.powf(p.m);
    let log_dt = dt.ln();
    p.a + p.b * dt_m
        + dt_m * (p.c1 * (p.omega * log_dt).cos() + p.c2 * (p.omega * log_dt).sin())
}

/// Fill the design row `{1, (tc−t)^m, (tc−t)^m cos(ω ln(tc−t)), (tc−t)^m sin(ω ln(tc−t))}`.
///
/// Returns `false` when `tc − t ≤ 0` (row undefined); `out` is untouched in
/// that case. `out` must have length [`N_LINEAR`].
pub fn fill_design_row(t: f64, tc: f64, m: f64, omega: f64, out: &mut [f64]) -> bool {
    let dt = tc - t;
    if dt <= 0.0 {
        return false;
    }
    let dt_m = dt.powf(m);
    let log_dt = dt.ln();
    out[0] = 1.0;
    out[1] = dt_m;
    out[2] = dt_m * (omega * log_dt).cos();
    out[3] = dt_m * (omega * log_dt).sin();
    true
}

/// Residuals `p_i − f(t_i)` for each observation.
pub fn residuals(obs: &[Observation], p: &LpplsParams) -> Vec<f64> {
    obs.iter()
        .map(|o| o.log_price - lppls_value(o.t, p))
        .collect()
}

/// Solution of the linear subsystem for fixed `(tc, m, ω)`.
#[derive(Debug, Clone, Copy)]
pub struct LinearSolution {
    pub a: f64,
    pub b: f64,
    pub c1: f64,
    pub c2: f64,
    /// Sum of squared residuals at this solution.
    pub ssr: f64,
}

/// Ordinary least squares for `(a, b, c1, c2)` conditioned on `(tc, m, ω)`.
///
/// Returns `None` when any observation has `t ≥ tc` (the power/log terms are
/// undefined), when the design matrix is too ill-conditioned to solve, or
/// when the resulting SSR is not finite. Callers treat `None` as a discarded
/// candidate, never as a fatal error.
pub fn solve_linear(obs: &[Observation], tc: f64, m: f64, omega: f64) -> Option<LinearSolution> {
    let n = obs.len();
    if n < N_LINEAR {
        return None;
    }
    if !(tc.is_finite() && m.is_finite() && omega.is_finite()) {
        return None;
    }

    let mut x = DMatrix::<f64>::zeros(n, N_LINEAR);
    let mut y = DVector::<f64>::zeros(n);
    let mut row = [0.0; N_LINEAR];

    for (i, o) in obs.iter().enumerate() {
        if !fill_design_row(o.t, tc, m, omega, &mut row) {
            return None;
        }
        if row.iter().any(|v| !v.is_finite()) {
            return None;
        }
        for j in 0..N_LINEAR {
            x[(i, j)] = row[j];
        }
        y[i] = o.log_price;
    }

    let beta = solve_least_squares(&x, &y)?;

    let fitted = &x * &beta;
    let mut ssr = 0.0;
    for i in 0..n {
        let r = y[i] - fitted[i];
        ssr += r * r;
    }
    if !ssr.is_finite() {
        return None;
    }

    Some(LinearSolution {
        a: beta[0],
        b: beta[1],
        c1: beta[2],
        c2: beta[3],
        ssr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params() -> LpplsParams {
        LpplsParams {
            tc: 100.0,
            m: 0.5,
            omega: 6.0,
            a: 10.0,
            b: -0.5,
            c1: 0.01,
            c2: 0.01,
        }
    }

    #[test]
    fn lppls_value_guarded_past_tc() {
        let p = sample_params();
        assert!(lppls_value(99.9, &p).is_finite());
        assert!(lppls_value(100.0, &p).is_nan());
        assert!(lppls_value(150.0, &p).is_nan());
    }

    #[test]
    fn lppls_value_is_deterministic() {
        let p = sample_params();
        for &t in &[0.0, 13.7, 50.0, 99.0] {
            assert_eq!(lppls_value(t, &p).to_bits(), lppls_value(t, &p).to_bits());
        }
    }

    #[test]
    fn design_row_rejects_out_of_domain() {
        let mut row = [0.0; N_LINEAR];
        assert!(!fill_design_row(100.0, 100.0, 0.5, 6.0, &mut row));
        assert!(fill_design_row(99.0, 100.0, 0.5, 6.0, &mut row));
        assert_eq!(row[0], 1.0);
    }

    #[test]
    fn linear_solve_recovers_exact_coefficients() {
        // Noiseless data at the true (tc, m, omega) must give back
        // (a, b, c1, c2) to near machine precision.
        let p = sample_params();
        let obs: Vec<Observation> = (0..80)
            .map(|i| {
                let t = i as f64;
                Observation::new(t, lppls_value(t, &p))
            })
            .collect();

        let sol = solve_linear(&obs, p.tc, p.m, p.omega).unwrap();
        assert!((sol.a - p.a).abs() < 1e-8, "a: {}", sol.a);
        assert!((sol.b - p.b).abs() < 1e-8, "b: {}", sol.b);
        assert!((sol.c1 - p.c1).abs() < 1e-8, "c1: {}", sol.c1);
        assert!((sol.c2 - p.c2).abs() < 1e-8, "c2: {}", sol.c2);
        assert!(sol.ssr < 1e-12, "ssr should be near zero: {}", sol.ssr);
    }

    #[test]
    fn linear_solve_fails_when_tc_inside_window() {
        let p = sample_params();
        let obs: Vec<Observation> = (0..80)
            .map(|i| Observation::new(i as f64, 1.0 + i as f64 * 0.01))
            .collect();
        // tc inside the observed window: some rows are undefined.
        assert!(solve_linear(&obs, 40.0, p.m, p.omega).is_none());
    }
}

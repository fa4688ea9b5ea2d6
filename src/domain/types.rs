//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON by callers (dashboards, caches)
//! - reloaded later for comparisons across fitting windows

use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// One point of the series being fit.
///
/// `t` is a numeric time index; the reference encoding is the
/// proleptic-Gregorian ordinal day count (see [`crate::report::date_to_ordinal`]).
/// `log_price` is `ln(price)`. Both conversions happen at the boundary; the
/// numeric core never sees calendar dates or raw prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub t: f64,
    pub log_price: f64,
}

impl Observation {
    pub fn new(t: f64, log_price: f64) -> Self {
        Self { t, log_price }
    }
}

/// The seven LPPLS parameters.
///
/// ```text
/// ln E[p(t)] = a + b(tc−t)^m + (tc−t)^m [c1 cos(ω ln(tc−t)) + c2 sin(ω ln(tc−t))]
/// ```
///
/// `tc` is the critical time, `m` the power-law exponent, `omega` the angular
/// log-frequency; `a, b, c1, c2` are the linear coefficients solved by OLS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LpplsParams {
    pub tc: f64,
    pub m: f64,
    pub omega: f64,
    pub a: f64,
    pub b: f64,
    pub c1: f64,
    pub c2: f64,
}

impl LpplsParams {
    /// Amplitude of the oscillatory term: `c = sqrt(c1² + c2²)`.
    pub fn c_amplitude(&self) -> f64 {
        (self.c1 * self.c1 + self.c2 * self.c2).sqrt()
    }

    /// Phase of the oscillatory term: `φ = atan2(c2, c1)`.
    pub fn phi(&self) -> f64 {
        self.c2.atan2(self.c1)
    }

    /// Damping ratio `|m·b| / (ω·|c|)`.
    ///
    /// Infinite when the oscillation amplitude is zero (a pure power law has
    /// no oscillation to damp).
    pub fn damping(&self) -> f64 {
        let c_amp = self.c_amplitude();
        if c_amp == 0.0 {
            return f64::INFINITY;
        }
        (self.m * self.b).abs() / (self.omega * c_amp)
    }

    /// Number of log-periodic oscillations visible over `[t_first, t_last]`:
    /// `ω/2π · |ln((tc−t_first)/(tc−t_last))|`. Zero when the window touches
    /// or crosses `tc`.
    pub fn oscillation_count(&self, t_first: f64, t_last: f64) -> f64 {
        let dt_first = self.tc - t_first;
        let dt_last = self.tc - t_last;
        if dt_first <= 0.0 || dt_last <= 0.0 {
            return 0.0;
        }
        self.omega / (2.0 * std::f64::consts::PI) * (dt_first.ln() - dt_last.ln()).abs()
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    /// Sum of squared residuals.
    pub ssr: f64,
    /// Mean squared error (`ssr / n`).
    pub mse: f64,
    /// Number of observations in the window.
    pub n: usize,
}

/// Output of a successful fit. Immutable once produced; the library holds no
/// cross-call state, so callers re-invoke (and cache) per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub params: LpplsParams,
    pub quality: FitQuality,
    /// How many restarts converged and passed the validity filters.
    pub valid_restarts: usize,
}

/// Restart-draw window and validity filter for the nonlinear parameters.
///
/// Each restart draws `(tc₀, m₀, ω₀)` uniformly within these bounds, and a
/// converged restart is kept only if it lands strictly inside them. Defaults
/// (from the LPPLS literature, since the exact original ranges are not
/// observable): `m ∈ (0.1, 0.9)`, `ω ∈ (2, 25)`, and a `tc` window from
/// 20% of the observed span before the last observation to 50% past it.
/// Candidate draws with `tc` at or below the last observation simply cost
/// `+∞` (the model is undefined there) and get discarded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchBounds {
    pub tc_min: f64,
    pub tc_max: f64,
    pub m_min: f64,
    pub m_max: f64,
    pub omega_min: f64,
    pub omega_max: f64,
}

impl SearchBounds {
    /// Default bounds for a series observed on `[t_first, t_last]`.
    pub fn from_series(t_first: f64, t_last: f64) -> Self {
        let span = t_last - t_first;
        Self {
            tc_min: t_last - 0.2 * span,
            tc_max: t_last + 0.5 * span,
            m_min: 0.1,
            m_max: 0.9,
            omega_min: 2.0,
            omega_max: 25.0,
        }
    }

    /// Whether `(tc, m, ω)` lies strictly inside the bounds.
    pub fn contains(&self, tc: f64, m: f64, omega: f64) -> bool {
        tc > self.tc_min
            && tc < self.tc_max
            && m > self.m_min
            && m < self.m_max
            && omega > self.omega_min
            && omega < self.omega_max
    }

    pub fn validate(&self) -> Result<(), FitError> {
        let pairs = [
            ("tc", self.tc_min, self.tc_max),
            ("m", self.m_min, self.m_max),
            ("omega", self.omega_min, self.omega_max),
        ];
        for (name, lo, hi) in pairs {
            if !(lo.is_finite() && hi.is_finite() && hi > lo) {
                return Err(FitError::InvalidInput(format!(
                    "Invalid {name} bounds: {lo}..{hi} (must be finite with max > min)."
                )));
            }
        }
        Ok(())
    }
}

/// Fit configuration.
///
/// `seed` makes the randomized restarts reproducible; `None` seeds from OS
/// entropy. `bounds: None` derives [`SearchBounds`] from the observed span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Restart budget for the nonlinear search.
    pub max_searches: usize,
    pub seed: Option<u64>,
    pub bounds: Option<SearchBounds>,
    /// Iteration cap for each Nelder-Mead restart.
    pub nm_max_iters: u64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_searches: 30,
            seed: None,
            bounds: None,
            nm_max_iters: 600,
        }
    }
}

/// Sornette-style qualification constraints for a fitted window.
///
/// Fit validity (in-bounds parameters, finite SSR) is handled by the search
/// itself; this is a stricter post-hoc classification of whether a valid fit
/// carries the bubble signature worth flagging: super-exponential growth
/// (`b < 0`), damped oscillations, and enough oscillations in the window to
/// pin down `ω`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualifyingFilter {
    pub m_min: f64,
    pub m_max: f64,
    pub omega_min: f64,
    pub omega_max: f64,
    pub max_damping: f64,
    pub min_oscillations: f64,
}

impl Default for QualifyingFilter {
    fn default() -> Self {
        Self {
            m_min: 0.1,
            m_max: 0.9,
            omega_min: 6.0,
            omega_max: 13.0,
            max_damping: 0.7,
            min_oscillations: 2.5,
        }
    }
}

impl QualifyingFilter {
    /// Check a fitted parameter vector against all constraints.
    ///
    /// `t_first` and `t_last` are the endpoints of the fitting window, used
    /// for the oscillation count.
    pub fn qualifies(&self, params: &LpplsParams, t_first: f64, t_last: f64) -> bool {
        if params.m < self.m_min || params.m > self.m_max {
            return false;
        }
        if params.omega < self.omega_min || params.omega > self.omega_max {
            return false;
        }
        // Bubble signature requires super-exponential growth.
        if params.b >= 0.0 {
            return false;
        }
        if params.c_amplitude() > 0.0 && params.damping() > self.max_damping {
            return false;
        }
        params.oscillation_count(t_first, t_last) >= self.min_oscillations
    }
}

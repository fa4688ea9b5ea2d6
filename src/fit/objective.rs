//! Reduced three-parameter objective for the nonlinear search.
//!
//! Each evaluation of `(tc, m, ω)` projects out the linear coefficients with
//! an exact OLS solve and returns the resulting sum of squared residuals
//! (variable projection). Points outside the feasible region cost `+∞`, so
//! the simplex retreats from them without any special casing in the solver.

use argmin::core::{CostFunction, Error};

use crate::domain::{Observation, SearchBounds};
use crate::models::solve_linear;

pub(crate) struct ReducedObjective<'a> {
    pub obs: &'a [Observation],
    pub bounds: &'a SearchBounds,
}

impl CostFunction for ReducedObjective<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        let (tc, m, omega) = (x[0], x[1], x[2]);
        if !self.bounds.contains(tc, m, omega) {
            return Ok(f64::INFINITY);
        }
        // `solve_linear` also rejects tc at or below the last observation
        // (undefined power/log terms) and singular design matrices.
        match solve_linear(self.obs, tc, m, omega) {
            Some(sol) if sol.ssr.is_finite() => Ok(sol.ssr),
            _ => Ok(f64::INFINITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LpplsParams;
    use crate::models::lppls_value;

    #[test]
    fn objective_is_infinite_outside_bounds_and_finite_at_truth() {
        let p = LpplsParams {
            tc: 120.0,
            m: 0.5,
            omega: 8.0,
            a: 1.0,
            b: -0.02,
            c1: 0.01,
            c2: 0.01,
        };
        let obs: Vec<Observation> = (0..100)
            .map(|i| {
                let t = i as f64;
                Observation::new(t, lppls_value(t, &p))
            })
            .collect();
        let bounds = SearchBounds::from_series(0.0, 99.0);
        let objective = ReducedObjective {
            obs: &obs,
            bounds: &bounds,
        };

        let at_truth = objective.cost(&vec![p.tc, p.m, p.omega]).unwrap();
        assert!(at_truth < 1e-10, "SSR at the truth: {at_truth}");

        let out_of_bounds = objective.cost(&vec![p.tc, 0.99, p.omega]).unwrap();
        assert!(out_of_bounds.is_infinite());

        // tc inside the observed window: model undefined, cost infinite.
        let tc_in_window = objective.cost(&vec![90.0, p.m, p.omega]).unwrap();
        assert!(tc_in_window.is_infinite());
    }
}

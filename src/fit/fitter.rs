//! Randomized-restart nonlinear search for the LPPLS parameters.
//!
//! Given:
//! - observations `(t_i, ln p_i)`
//! - search bounds for `(tc, m, ω)`
//! - a restart budget
//!
//! each restart:
//! - draws `(tc₀, m₀, ω₀)` uniformly within the bounds
//! - runs a Nelder-Mead minimization of the reduced objective, which
//!   projects out `(a, b, c1, c2)` via an exact OLS solve per evaluation
//! - is kept only if the final point lies inside the bounds with a solvable
//!   linear subsystem and a finite SSR
//!
//! Restarts share no mutable state; the winner is selected by a pure fold
//! (lowest SSR, ties broken by restart index), so the result is a function
//! of the inputs and the seed alone, regardless of how rayon schedules the
//! work across threads.

use argmin::core::{Executor, State};
use argmin::solver::neldermead::NelderMead;
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::domain::{FitOptions, FitQuality, FitResult, LpplsParams, Observation, SearchBounds};
use crate::error::FitError;
use crate::fit::objective::ReducedObjective;
use crate::models::solve_linear;

/// Minimum observation count for a meaningful fit window.
pub const MIN_OBSERVATIONS: usize = 30;

/// Population variance below which the log-price series is treated as flat.
const VARIANCE_EPS: f64 = 1e-12;

/// Nelder-Mead stops when the simplex cost standard deviation drops below this.
const NM_SD_TOLERANCE: f64 = 1e-10;

/// Relative size of the initial simplex, as a fraction of each bound span.
const SIMPLEX_STEP_FRAC: f64 = 0.1;

#[derive(Debug, Clone)]
struct Candidate {
    idx: usize,
    params: LpplsParams,
    ssr: f64,
}

/// Fit the LPPLS model to an observation series.
///
/// Fails fast on series-level problems (too short, invalid, flat); returns
/// [`FitError::NonConvergent`] when every restart in the budget either
/// diverged or was rejected by the validity filters. Per-restart numeric
/// failures are recovered locally and never abort the search.
pub fn fit(obs: &[Observation], opts: &FitOptions) -> Result<FitResult, FitError> {
    validate_series(obs)?;
    if opts.max_searches == 0 {
        return Err(FitError::InvalidInput("max_searches must be > 0.".to_string()));
    }

    let t_first = obs[0].t;
    let t_last = obs[obs.len() - 1].t;
    let bounds = opts
        .bounds
        .unwrap_or_else(|| SearchBounds::from_series(t_first, t_last));
    bounds.validate()?;

    // Draw every initial point up front from a single RNG. The restart set
    // is then a pure function of the seed; the parallel evaluation below
    // cannot perturb it.
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let starts: Vec<[f64; 3]> = (0..opts.max_searches)
        .map(|_| draw_start(&bounds, &mut rng))
        .collect();

    // Evaluate each restart independently (parallel).
    let candidates: Vec<Candidate> = starts
        .par_iter()
        .enumerate()
        .filter_map(|(idx, x0)| {
            run_restart(obs, &bounds, x0, opts.nm_max_iters)
                .map(|(params, ssr)| Candidate { idx, params, ssr })
        })
        .collect();

    let valid_restarts = candidates.len();

    // Deterministic selection: minimum SSR, ties broken by restart index.
    // (`collect` preserves restart order, so a plain fold suffices.)
    let best = candidates.into_iter().reduce(|best, c| {
        if c.ssr < best.ssr || (c.ssr == best.ssr && c.idx < best.idx) {
            c
        } else {
            best
        }
    });

    let Some(best) = best else {
        return Err(FitError::NonConvergent {
            attempted: opts.max_searches,
        });
    };

    let n = obs.len();
    Ok(FitResult {
        params: best.params,
        quality: FitQuality {
            ssr: best.ssr,
            mse: best.ssr / n as f64,
            n,
        },
        valid_restarts,
    })
}

fn validate_series(obs: &[Observation]) -> Result<(), FitError> {
    if obs.len() < MIN_OBSERVATIONS {
        return Err(FitError::InsufficientData {
            n: obs.len(),
            required: MIN_OBSERVATIONS,
        });
    }
    for o in obs {
        if !(o.t.is_finite() && o.log_price.is_finite()) {
            return Err(FitError::InvalidInput(
                "Observations must be finite.".to_string(),
            ));
        }
    }
    for w in obs.windows(2) {
        if w[1].t <= w[0].t {
            return Err(FitError::InvalidInput(
                "Time index must be strictly increasing.".to_string(),
            ));
        }
    }

    let n = obs.len() as f64;
    let mean = obs.iter().map(|o| o.log_price).sum::<f64>() / n;
    let var = obs.iter().map(|o| (o.log_price - mean).powi(2)).sum::<f64>() / n;
    if var <= VARIANCE_EPS {
        return Err(FitError::DegenerateSeries);
    }
    Ok(())
}

fn draw_start(bounds: &SearchBounds, rng: &mut StdRng) -> [f64; 3] {
    [
        rng.gen_range(bounds.tc_min..bounds.tc_max),
        rng.gen_range(bounds.m_min..bounds.m_max),
        rng.gen_range(bounds.omega_min..bounds.omega_max),
    ]
}

/// Run one restart to convergence (or iteration cap).
///
/// Any failure — the solver erroring out, the final point leaving the
/// bounds, an unsolvable linear subsystem, a non-finite SSR — discards this
/// restart only.
fn run_restart(
    obs: &[Observation],
    bounds: &SearchBounds,
    x0: &[f64; 3],
    max_iters: u64,
) -> Option<(LpplsParams, f64)> {
    let problem = ReducedObjective { obs, bounds };
    let solver: NelderMead<Vec<f64>, f64> = NelderMead::new(initial_simplex(x0, bounds))
        .with_sd_tolerance(NM_SD_TOLERANCE)
        .ok()?;

    let res = Executor::new(problem, solver)
        .configure(|state| state.max_iters(max_iters))
        .run()
        .ok()?;

    let best = res.state().get_best_param()?.clone();
    let (tc, m, omega) = (best[0], best[1], best[2]);
    if !bounds.contains(tc, m, omega) {
        return None;
    }

    // Re-solve the linear subsystem at the final point rather than trusting
    // the solver's recorded cost.
    let sol = solve_linear(obs, tc, m, omega)?;
    if !sol.ssr.is_finite() {
        return None;
    }

    let params = LpplsParams {
        tc,
        m,
        omega,
        a: sol.a,
        b: sol.b,
        c1: sol.c1,
        c2: sol.c2,
    };
    Some((params, sol.ssr))
}

/// Initial simplex: the drawn point plus one inward perturbation per axis.
fn initial_simplex(x0: &[f64; 3], bounds: &SearchBounds) -> Vec<Vec<f64>> {
    let spans = [
        bounds.tc_max - bounds.tc_min,
        bounds.m_max - bounds.m_min,
        bounds.omega_max - bounds.omega_min,
    ];
    let uppers = [bounds.tc_max, bounds.m_max, bounds.omega_max];

    let mut simplex = Vec::with_capacity(4);
    simplex.push(x0.to_vec());
    for k in 0..3 {
        let step = SIMPLEX_STEP_FRAC * spans[k];
        let mut vertex = x0.to_vec();
        // Step toward the interior so the vertex stays inside the bounds.
        vertex[k] = if vertex[k] + step < uppers[k] {
            vertex[k] + step
        } else {
            vertex[k] - step
        };
        simplex.push(vertex);
    }
    simplex
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_series;
    use crate::domain::QualifyingFilter;

    fn true_params() -> LpplsParams {
        LpplsParams {
            tc: 250.0,
            m: 0.5,
            omega: 8.0,
            a: 1.0,
            b: -0.02,
            c1: 0.01,
            c2: 0.01,
        }
    }

    #[test]
    fn rejects_insufficient_data() {
        let obs: Vec<Observation> = (0..5)
            .map(|i| Observation::new(i as f64, 1.0 + i as f64 * 0.01))
            .collect();
        let err = fit(&obs, &FitOptions::default()).unwrap_err();
        assert_eq!(
            err,
            FitError::InsufficientData {
                n: 5,
                required: MIN_OBSERVATIONS
            }
        );
    }

    #[test]
    fn rejects_constant_series() {
        let obs: Vec<Observation> = (0..100)
            .map(|i| Observation::new(i as f64, 4.2))
            .collect();
        let err = fit(&obs, &FitOptions::default()).unwrap_err();
        assert_eq!(err, FitError::DegenerateSeries);
    }

    #[test]
    fn rejects_non_increasing_time_index() {
        let mut obs: Vec<Observation> = (0..100)
            .map(|i| Observation::new(i as f64, (i as f64 + 1.0).ln()))
            .collect();
        obs[50].t = obs[49].t;
        let err = fit(&obs, &FitOptions::default()).unwrap_err();
        assert!(matches!(err, FitError::InvalidInput(_)));
    }

    #[test]
    fn rejects_zero_search_budget() {
        let obs = generate_series(&true_params(), 1.0, 200, 0.0, 1).unwrap();
        let opts = FitOptions {
            max_searches: 0,
            ..FitOptions::default()
        };
        assert!(matches!(
            fit(&obs, &opts).unwrap_err(),
            FitError::InvalidInput(_)
        ));
    }

    #[test]
    fn non_convergent_when_bounds_exclude_any_valid_tc() {
        let obs = generate_series(&true_params(), 1.0, 200, 0.01, 11).unwrap();
        // tc window entirely inside the observed span: every candidate hits
        // undefined power/log terms and gets discarded.
        let bounds = SearchBounds {
            tc_min: 50.0,
            tc_max: 150.0,
            ..SearchBounds::from_series(1.0, 200.0)
        };
        let opts = FitOptions {
            max_searches: 10,
            seed: Some(1),
            bounds: Some(bounds),
            ..FitOptions::default()
        };
        let err = fit(&obs, &opts).unwrap_err();
        assert_eq!(err, FitError::NonConvergent { attempted: 10 });
    }

    #[test]
    fn recovers_known_parameters_end_to_end() {
        let truth = true_params();
        let obs = generate_series(&truth, 1.0, 200, 0.01, 7).unwrap();

        let opts = FitOptions {
            max_searches: 30,
            seed: Some(3),
            ..FitOptions::default()
        };
        let result = fit(&obs, &opts).unwrap();

        assert!(
            (result.params.tc - truth.tc).abs() <= 5.0,
            "tc: {} (true {})",
            result.params.tc,
            truth.tc
        );
        // 200 residuals at sigma = 0.01 put the noise-floor SSR near 0.02.
        assert!(result.quality.ssr < 0.05, "ssr: {}", result.quality.ssr);
        assert!(result.valid_restarts >= 1);
        assert_eq!(result.quality.n, 200);

        // A clean synthetic bubble should also pass the Sornette filter.
        assert!(QualifyingFilter::default().qualifies(&result.params, 1.0, 200.0));
    }

    #[test]
    fn identical_seed_gives_identical_result() {
        let obs = generate_series(&true_params(), 1.0, 200, 0.01, 7).unwrap();
        let opts = FitOptions {
            max_searches: 12,
            seed: Some(99),
            ..FitOptions::default()
        };
        let first = fit(&obs, &opts).unwrap();
        let second = fit(&obs, &opts).unwrap();
        assert_eq!(first, second);
    }
}

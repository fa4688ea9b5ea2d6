//! Least squares solver.
//!
//! Variable projection repeatedly solves small linear regression problems of
//! the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! The model is linear in `(a, b, c1, c2)` given fixed `(tc, m, ω)`, so we
//! solve for β once per objective evaluation during the nonlinear search.
//!
//! Implementation choices:
//! - We use SVD to solve the least-squares problem robustly even when the
//!   design matrix is tall (many observations, 4 columns).
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic
//!   for non-square matrices.)
//! - LPPLS basis columns become nearly collinear in parts of the search
//!   space — `(tc−t)^m` approaches the constant column as `m → 0`, and the
//!   cos/sin columns degenerate when `ω ln(tc−t)` barely rotates over the
//!   window — so we accept solutions at progressively looser tolerances
//!   before giving up.
//! - With only 4 columns, SVD cost is negligible next to the restart budget.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

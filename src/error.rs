/// Errors surfaced by the fitting pipeline.
///
/// Only series-level failures reach the caller. An individual restart that
/// diverges, produces non-finite residuals, or hits a singular linear solve
/// is discarded and the search continues with the remaining budget; that
/// recovery never appears in this type.
#[derive(Clone, PartialEq, Eq)]
pub enum FitError {
    /// Observation count below the minimum fitting window.
    InsufficientData { n: usize, required: usize },
    /// The series or configuration violates an input invariant
    /// (non-finite values, non-increasing time index, empty search budget,
    /// inverted bounds). Validation happens at the boundary; the numeric
    /// core assumes clean input.
    InvalidInput(String),
    /// Zero-variance log-price series. A flat line carries no singularity
    /// information, so no critical time is reported.
    DegenerateSeries,
    /// Every restart failed to converge or was rejected by the validity
    /// filters. `attempted` is the restart budget that was spent.
    NonConvergent { attempted: usize },
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::InsufficientData { n, required } => {
                write!(f, "Insufficient data: {n} observations, need at least {required}.")
            }
            FitError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            FitError::DegenerateSeries => {
                write!(f, "Degenerate series: log-price has zero variance.")
            }
            FitError::NonConvergent { attempted } => {
                write!(f, "No convergent fit found after {attempted} restarts.")
            }
        }
    }
}

impl std::fmt::Debug for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FitError({self})")
    }
}

impl std::error::Error for FitError {}

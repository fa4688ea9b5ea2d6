//! Formatted terminal output for fit results.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::FitResult;
use crate::report::dates::critical_date;

/// Format a fit summary for terminal display.
pub fn format_fit_summary(fit: &FitResult) -> String {
    let mut out = String::new();

    out.push_str("=== LPPLS fit ===\n");
    match critical_date(fit.params.tc) {
        Some(date) => out.push_str(&format!(
            "Critical time: tc={:.2} ({date})\n",
            fit.params.tc
        )),
        None => out.push_str(&format!(
            "Critical time: tc={:.2} (not a calendar date)\n",
            fit.params.tc
        )),
    }
    out.push_str(&format!(
        "Nonlinear: m={:.4}  omega={:.4}\n",
        fit.params.m, fit.params.omega
    ));
    out.push_str(&format!(
        "Linear: a={:.6}  b={:.6}  c1={:.6}  c2={:.6}\n",
        fit.params.a, fit.params.b, fit.params.c1, fit.params.c2
    ));
    out.push_str(&format!(
        "Oscillation: c={:.6}  phi={:.4}\n",
        fit.params.c_amplitude(),
        fit.params.phi()
    ));
    out.push_str(&format!(
        "Quality: ssr={:.6e}  mse={:.6e}  n={}  valid_restarts={}\n",
        fit.quality.ssr, fit.quality.mse, fit.quality.n, fit.valid_restarts
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitQuality, LpplsParams};
    use crate::report::dates::date_to_ordinal;
    use chrono::NaiveDate;

    #[test]
    fn summary_includes_critical_date() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let fit = FitResult {
            params: LpplsParams {
                tc: date_to_ordinal(date) as f64 + 0.4,
                m: 0.5,
                omega: 8.0,
                a: 1.0,
                b: -0.02,
                c1: 0.01,
                c2: 0.01,
            },
            quality: FitQuality {
                ssr: 0.02,
                mse: 1e-4,
                n: 200,
            },
            valid_restarts: 17,
        };
        let summary = format_fit_summary(&fit);
        assert!(summary.contains("2026-02-01"), "{summary}");
        assert!(summary.contains("valid_restarts=17"), "{summary}");
    }
}

//! Calendar conversion for the critical time.
//!
//! The numeric time index is the proleptic-Gregorian ordinal day count
//! (day 1 = 0001-01-01), i.e. the encoding produced by pandas'
//! `Timestamp.toordinal`. chrono's `num_days_from_ce` counts from the same
//! epoch, so the mapping is a direct passthrough and round-trips exactly.

use chrono::{Datelike, NaiveDate};

/// Ordinal day count for a calendar date.
pub fn date_to_ordinal(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

/// Calendar date for an ordinal day count.
///
/// `None` when the ordinal falls outside chrono's representable range.
pub fn ordinal_to_date(ordinal: i64) -> Option<NaiveDate> {
    let days = i32::try_from(ordinal).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days)
}

/// Calendar date of a fitted critical time.
///
/// Truncates the fractional ordinal the way the original decoding does
/// (`fromordinal(int(tc))`). `None` when `tc` is not finite or out of the
/// calendar range.
pub fn critical_date(tc: f64) -> Option<NaiveDate> {
    if !tc.is_finite() {
        return None;
    }
    ordinal_to_date(tc.trunc() as i64)
}

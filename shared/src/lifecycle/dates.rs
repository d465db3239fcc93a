//! Calendar arithmetic that never panics

use chrono::{Days, NaiveDate};

/// Whole days from `from` to `to`; negative when `to` is earlier
pub fn day_difference(to: NaiveDate, from: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Shift a date by a signed number of days, saturating at the calendar bounds
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude).unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(magnitude).unwrap_or(NaiveDate::MIN)
    }
}

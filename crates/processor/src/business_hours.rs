//! Business-hours elapsed time
//!
//! One fixed calendar: Monday to Friday, hours 09 through 16 of the
//! wall clock the timestamps carry. No holidays, no timezone conversion.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Weekday};
use common::models::Timestamp;

use crate::statistics::round2;

/// First hour-of-day counted as business time
pub const FIRST_BUSINESS_HOUR: u32 = 9;
/// Last hour-of-day counted as business time (inclusive)
pub const LAST_BUSINESS_HOUR: u32 = 16;

/// Whether the hour starting at `at` is a business hour
pub fn is_business_hour<Tz: TimeZone>(at: &DateTime<Tz>) -> bool {
    let weekday = at.weekday();
    weekday != Weekday::Sat
        && weekday != Weekday::Sun
        && (FIRST_BUSINESS_HOUR..=LAST_BUSINESS_HOUR).contains(&at.hour())
}

/// Business hours elapsed between two instants.
///
/// Steps from `start` in whole hours while the cursor is before `end`,
/// crediting one hour for each step that starts inside business time. At
/// most 8 hours are credited per weekday. Returns `None` if either end is
/// missing and `0.0` when `end` is not after `start`.
pub fn business_hours_between(start: Option<Timestamp>, end: Option<Timestamp>) -> Option<f64> {
    let (start, end) = (start?, end?);

    let mut hours: u32 = 0;
    let mut cursor = start;
    while cursor < end {
        if is_business_hour(&cursor) {
            hours += 1;
        }
        cursor += Duration::hours(1);
    }

    Some(round2(f64::from(hours)))
}

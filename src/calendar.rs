//! Gregorian validity checks for `(year, month, day)` triples.
//!
//! No bound is placed on the year here. Whatever range a year can take is decided by the digit
//! counts the [rules](crate::FormatRule) accept.

/// Offset between a Minguo (Republic of China) year and its Gregorian year. Minguo year 1 is 1912.
pub const MINGUO_BASE_YEAR: i32 = 1911;

/// Days in each month of a common year, January first.
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const FEBRUARY: u32 = 2;

/// Returns true if `year` is a Gregorian leap year: divisible by 4, except centuries that are not
/// divisible by 400.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Returns the number of days in `month` of `year`, or `None` if `month` is not in `1..=12`.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    let days = *DAYS_IN_MONTH.get(index)?;
    if month == FEBRUARY && is_leap_year(year) {
        Some(days + 1)
    } else {
        Some(days)
    }
}

/// Returns true if `(year, month, day)` names a real day on the Gregorian calendar.
pub fn is_valid(year: i32, month: u32, day: u32) -> bool {
    match days_in_month(year, month) {
        Some(max_day) => (1..=max_day).contains(&day),
        None => false,
    }
}

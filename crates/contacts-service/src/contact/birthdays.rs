//! Upcoming-birthday window arithmetic.

use chrono::{Datelike, NaiveDate};

/// Largest window accepted for the birthdays query.
pub const MAX_WINDOW_DAYS: i64 = 366;

/// The birthday's anniversary in `year`. Feb 29 falls on Mar 1 in common years.
fn anniversary(birthday: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// The first anniversary of `birthday` on or after `today`.
pub fn next_birthday(birthday: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = anniversary(birthday, today.year())?;
    if this_year >= today {
        Some(this_year)
    } else {
        anniversary(birthday, today.year() + 1)
    }
}

/// Whether the next birthday falls within `[today, today + days]`.
pub fn is_upcoming(birthday: NaiveDate, today: NaiveDate, days: i64) -> bool {
    next_birthday(birthday, today)
        .map(|next| (next - today).num_days() <= days)
        .unwrap_or(false)
}

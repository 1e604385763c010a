//! Aligned date windows ("periods") for day and week views.
//!
//! Periods are anchored to a fixed weekly grid: the anchor is the most recent
//! week-start day on or before the date, and the date's period is the
//! `period_days` chunk counted forward from that anchor which contains it.
//! Month boundaries play no part.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::{CalendarError, CalendarResult};
use crate::utils::date::{last_day_of_month, week_start, DateRange};

/// First day of the `period_days`-long period containing `date`.
///
/// Fails with `DateOutOfRange` when the week anchor lies before the earliest
/// representable date.
pub fn first_day_of_period_containing(
    date: NaiveDate,
    period_days: u32,
    week_starts_on: Weekday,
) -> CalendarResult<NaiveDate> {
    if period_days == 0 {
        return Err(CalendarError::InvalidConfiguration(
            "Period length must be at least one day".to_string(),
        ));
    }

    if period_days == 1 {
        return Ok(date);
    }

    let anchor = week_start(date, week_starts_on).ok_or(CalendarError::DateOutOfRange(date))?;
    let elapsed = (date - anchor).num_days();
    let chunks = elapsed / period_days as i64;

    anchor
        .checked_add_signed(Duration::days(chunks * period_days as i64))
        .ok_or(CalendarError::DateOutOfRange(date))
}

/// Inclusive range of the period containing `date`.
pub fn range_containing(
    date: NaiveDate,
    period_days: u32,
    week_starts_on: Weekday,
) -> CalendarResult<DateRange> {
    let start = first_day_of_period_containing(date, period_days, week_starts_on)?;
    let end = start
        .checked_add_signed(Duration::days(period_days as i64 - 1))
        .ok_or(CalendarError::DateOutOfRange(date))?;

    Ok(DateRange::new(start, end))
}

/// Whole weeks covering the month that contains `date`, as shown by a mini-month picker.
pub fn month_grid_range(date: NaiveDate, week_starts_on: Weekday) -> CalendarResult<DateRange> {
    let out_of_range = || CalendarError::DateOutOfRange(date);
    let first_of_month = date.with_day(1).ok_or_else(out_of_range)?;
    let last_of_month = last_day_of_month(date);

    let start = week_start(first_of_month, week_starts_on).ok_or_else(out_of_range)?;
    let end = week_start(last_of_month, week_starts_on)
        .and_then(|last_week| last_week.checked_add_signed(Duration::days(6)))
        .ok_or_else(out_of_range)?;

    Ok(DateRange::new(start, end))
}

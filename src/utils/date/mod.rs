// Date utility functions
// Inclusive date ranges and week alignment helpers

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range; the bounds are swapped if given in reverse.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the range, counting both ends.
    pub fn len_days(&self) -> u32 {
        ((self.end - self.start).num_days() + 1) as u32
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |date| *date <= end)
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = Box<dyn Iterator<Item = NaiveDate>>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.days())
    }
}

/// Map an ISO day number (1 = Monday .. 7 = Sunday) to a weekday.
pub fn weekday_from_iso(day: u8) -> Option<Weekday> {
    match day {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// The most recent `week_starts_on` day on or before `date`.
///
/// `None` when that day falls before the earliest representable date.
pub fn week_start(date: NaiveDate, week_starts_on: Weekday) -> Option<NaiveDate> {
    let weekday = date.weekday().num_days_from_monday() as i64;
    let first = week_starts_on.num_days_from_monday() as i64;
    let offset = (weekday - first + 7) % 7;
    date.checked_sub_signed(Duration::days(offset))
}

/// Last day of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_contains_and_len() {
        let range = DateRange::new(date(2024, 8, 26), date(2024, 9, 1));
        assert_eq!(range.len_days(), 7);
        assert!(range.contains(date(2024, 8, 26)));
        assert!(range.contains(date(2024, 9, 1)));
        assert!(!range.contains(date(2024, 9, 2)));
    }

    #[test]
    fn test_range_iterates_in_order() {
        let range = DateRange::new(date(2024, 2, 28), date(2024, 3, 1));
        let days: Vec<NaiveDate> = range.into_iter().collect();
        assert_eq!(days, vec![date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]);
    }

    #[test]
    fn test_reversed_bounds_are_swapped() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 2, 28));
        assert_eq!(range.start, date(2024, 2, 28));
    }

    #[test_case(Weekday::Mon, date(2024, 8, 26); "monday start")]
    #[test_case(Weekday::Sun, date(2024, 8, 25); "sunday start")]
    #[test_case(Weekday::Tue, date(2024, 8, 27); "same day")]
    #[test_case(Weekday::Wed, date(2024, 8, 21); "wednesday start")]
    fn test_week_start(first: Weekday, expected: NaiveDate) {
        assert_eq!(week_start(date(2024, 8, 27), first), Some(expected));
    }

    #[test]
    fn test_week_start_before_earliest_date() {
        let first = NaiveDate::MIN;
        assert_eq!(week_start(first, first.weekday()), Some(first));
        assert_eq!(week_start(first, first.weekday().succ()), None);
    }

    #[test]
    fn test_weekday_from_iso_bounds() {
        assert_eq!(weekday_from_iso(1), Some(Weekday::Mon));
        assert_eq!(weekday_from_iso(7), Some(Weekday::Sun));
        assert_eq!(weekday_from_iso(0), None);
        assert_eq!(weekday_from_iso(8), None);
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(date(2024, 2, 10)), date(2024, 2, 29));
        assert_eq!(last_day_of_month(date(2024, 12, 31)), date(2024, 12, 31));
        assert_eq!(last_day_of_month(NaiveDate::MAX), NaiveDate::MAX);
    }
}

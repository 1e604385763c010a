//! Time-of-day slots forming the vertical axis of day and week views.
//!
//! A grid is defined by its earliest and latest slot (both inclusive) and a
//! fixed slot duration. For a day running 09:00 to 17:00 in 15 minute slots,
//! the slots are 09:00, 09:15, ..., 16:45, 17:00.

use chrono::{Duration, NaiveTime};

use crate::error::{CalendarError, CalendarResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlotGrid {
    earliest: NaiveTime,
    latest: NaiveTime,
    slot_duration: Duration,
}

impl TimeSlotGrid {
    /// Build a grid, rejecting durations under a millisecond and inverted bounds.
    pub fn new(earliest: NaiveTime, latest: NaiveTime, slot_duration: Duration) -> CalendarResult<Self> {
        if slot_duration <= Duration::zero() {
            return Err(CalendarError::InvalidConfiguration(format!(
                "Slot duration must be positive, got {}",
                slot_duration
            )));
        }

        // Slot arithmetic works in whole milliseconds.
        if slot_duration < Duration::milliseconds(1) {
            return Err(CalendarError::InvalidConfiguration(format!(
                "Slot duration must be at least one millisecond, got {}",
                slot_duration
            )));
        }

        if earliest > latest {
            return Err(CalendarError::InvalidConfiguration(format!(
                "Earliest slot {} is after latest slot {}",
                earliest, latest
            )));
        }

        log::debug!(
            "Time slot grid {}-{} every {} minutes",
            earliest,
            latest,
            slot_duration.num_minutes()
        );

        Ok(Self {
            earliest,
            latest,
            slot_duration,
        })
    }

    /// Every slot from midnight to 23:59.
    pub fn all_hours(slot_duration: Duration) -> CalendarResult<Self> {
        Self::new(hm(0, 0), hm(23, 59), slot_duration)
    }

    /// 09:00 to 17:00 in 15 minute slots.
    pub fn typical_work_day() -> Self {
        Self {
            earliest: hm(9, 0),
            latest: hm(17, 0),
            slot_duration: Duration::minutes(15),
        }
    }

    /// Parse the compact `<earliest>-<latest>/<duration>` form, e.g. `09:00-17:00/PT15M`.
    ///
    /// Times are `HH:MM` (or `HH:MM:SS`); the duration is ISO-8601 and may only
    /// use fixed-length components.
    pub fn parse(spec: &str) -> CalendarResult<Self> {
        let invalid = |reason: &str| {
            CalendarError::InvalidConfiguration(format!("Invalid time slots '{}': {}", spec, reason))
        };

        let (earliest, rest) = spec
            .trim()
            .split_once('-')
            .ok_or_else(|| invalid("expected <earliest>-<latest>/<duration>"))?;
        let (latest, duration) = rest
            .split_once('/')
            .ok_or_else(|| invalid("missing /<duration>"))?;

        let earliest = parse_time(earliest).ok_or_else(|| invalid("bad earliest time"))?;
        let latest = parse_time(latest).ok_or_else(|| invalid("bad latest time"))?;
        let duration = parse_duration(duration).map_err(|reason| invalid(&reason))?;

        Self::new(earliest, latest, duration)
    }

    pub fn earliest(&self) -> NaiveTime {
        self.earliest
    }

    pub fn latest(&self) -> NaiveTime {
        self.latest
    }

    pub fn slot_duration(&self) -> Duration {
        self.slot_duration
    }

    /// Lazily walk the slots in order. Each call starts over from the earliest slot.
    pub fn iter(&self) -> TimeSlots {
        TimeSlots {
            next: Some(self.earliest),
            latest: self.latest,
            step: self.slot_duration,
        }
    }

    pub fn slots(&self) -> Vec<NaiveTime> {
        self.iter().collect()
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn index_of(&self, time: NaiveTime) -> Option<usize> {
        self.iter().position(|slot| slot == time)
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.index_of(time).is_some()
    }

    /// Slots needed to cover `duration`, rounding partial slots up. Never less than one.
    pub fn span_for(&self, duration: Duration) -> usize {
        let slot = self.slot_duration.num_milliseconds();
        let length = duration.num_milliseconds().max(0);
        let span = (length + slot - 1) / slot;
        span.max(1) as usize
    }
}

impl Default for TimeSlotGrid {
    /// 07:00 to 19:00 in 15 minute slots.
    fn default() -> Self {
        Self {
            earliest: hm(7, 0),
            latest: hm(19, 0),
            slot_duration: Duration::minutes(15),
        }
    }
}

impl<'a> IntoIterator for &'a TimeSlotGrid {
    type Item = NaiveTime;
    type IntoIter = TimeSlots;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the slots of a [`TimeSlotGrid`].
#[derive(Debug, Clone)]
pub struct TimeSlots {
    next: Option<NaiveTime>,
    latest: NaiveTime,
    step: Duration,
}

impl Iterator for TimeSlots {
    type Item = NaiveTime;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|time| *time <= self.latest)?;

        // Stop instead of wrapping past midnight.
        let (following, wrapped) = current.overflowing_add_signed(self.step);
        self.next = (wrapped == 0).then_some(following);

        Some(current)
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    match iso8601::duration(value.trim())? {
        iso8601::Duration::Weeks(weeks) => Ok(Duration::weeks(weeks as i64)),
        iso8601::Duration::YMDHMS {
            year,
            month,
            day,
            hour,
            minute,
            second,
            millisecond,
        } => {
            if year != 0 || month != 0 {
                return Err("years and months are not fixed-length".to_string());
            }

            Ok(Duration::days(day as i64)
                + Duration::hours(hour as i64)
                + Duration::minutes(minute as i64)
                + Duration::seconds(second as i64)
                + Duration::milliseconds(millisecond as i64))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_default_grid_has_49_slots() {
        let grid = TimeSlotGrid::new(hm(7, 0), hm(19, 0), Duration::minutes(15)).unwrap();
        let slots = grid.slots();
        assert_eq!(slots.len(), 49);
        assert_eq!(slots.first(), Some(&hm(7, 0)));
        assert_eq!(slots.last(), Some(&hm(19, 0)));
        assert_eq!(grid, TimeSlotGrid::default());
    }

    #[test]
    fn test_latest_excluded_when_not_on_step() {
        let grid = TimeSlotGrid::new(hm(9, 0), hm(10, 10), Duration::minutes(20)).unwrap();
        assert_eq!(grid.slots(), vec![hm(9, 0), hm(9, 20), hm(9, 40), hm(10, 0)]);
    }

    #[test]
    fn test_single_slot_grid() {
        let grid = TimeSlotGrid::new(hm(12, 0), hm(12, 0), Duration::hours(1)).unwrap();
        assert_eq!(grid.count(), 1);
    }

    #[test]
    fn test_all_hours_stops_at_midnight() {
        let grid = TimeSlotGrid::all_hours(Duration::minutes(15)).unwrap();
        assert_eq!(grid.count(), 96);
        assert_eq!(grid.slots().last(), Some(&hm(23, 45)));
    }

    #[test]
    fn test_iteration_is_restartable() {
        let grid = TimeSlotGrid::typical_work_day();
        let first: Vec<NaiveTime> = grid.iter().collect();
        let second: Vec<NaiveTime> = (&grid).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 33);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let result = TimeSlotGrid::new(hm(7, 0), hm(19, 0), Duration::zero());
        assert!(matches!(result, Err(CalendarError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let result = TimeSlotGrid::new(hm(7, 0), hm(19, 0), Duration::minutes(-15));
        assert!(result.is_err());
    }

    #[test]
    fn test_sub_millisecond_duration_rejected() {
        let result = TimeSlotGrid::new(hm(7, 0), hm(19, 0), Duration::microseconds(500));
        match result {
            Err(CalendarError::InvalidConfiguration(message)) => {
                assert!(message.contains("at least one millisecond"), "{message}");
            }
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let result = TimeSlotGrid::new(hm(19, 0), hm(7, 0), Duration::minutes(15));
        assert!(matches!(result, Err(CalendarError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_index_of() {
        let grid = TimeSlotGrid::default();
        assert_eq!(grid.index_of(hm(7, 0)), Some(0));
        assert_eq!(grid.index_of(hm(10, 15)), Some(13));
        assert_eq!(grid.index_of(hm(10, 20)), None);
        assert!(!grid.contains(hm(6, 45)));
    }

    #[test_case(Duration::minutes(45), 3; "exact multiple")]
    #[test_case(Duration::minutes(46), 4; "partial slot rounds up")]
    #[test_case(Duration::minutes(5), 1; "shorter than a slot")]
    #[test_case(Duration::zero(), 1; "zero length")]
    #[test_case(Duration::days(1), 96; "whole day")]
    fn test_span_for(duration: Duration, expected: usize) {
        assert_eq!(TimeSlotGrid::default().span_for(duration), expected);
    }

    #[test_case("09:00-17:00/PT15M", hm(9, 0), hm(17, 0), Duration::minutes(15); "quarter hours")]
    #[test_case("07:30-19:00/PT1H30M", hm(7, 30), hm(19, 0), Duration::minutes(90); "hours and minutes")]
    #[test_case(" 00:00-23:59/PT30M ", hm(0, 0), hm(23, 59), Duration::minutes(30); "surrounding whitespace")]
    fn test_parse(spec: &str, earliest: NaiveTime, latest: NaiveTime, duration: Duration) {
        let grid = TimeSlotGrid::parse(spec).unwrap();
        assert_eq!(grid.earliest(), earliest);
        assert_eq!(grid.latest(), latest);
        assert_eq!(grid.slot_duration(), duration);
    }

    #[test_case("09:00/PT15M"; "missing latest")]
    #[test_case("09:00-17:00"; "missing duration")]
    #[test_case("9am-17:00/PT15M"; "bad time")]
    #[test_case("09:00-17:00/P1M"; "month duration")]
    #[test_case("09:00-17:00/fifteen"; "unparseable duration")]
    #[test_case("09:00-17:00/PT0M"; "zero duration")]
    fn test_parse_rejects(spec: &str) {
        assert!(matches!(
            TimeSlotGrid::parse(spec),
            Err(CalendarError::InvalidConfiguration(_))
        ));
    }
}

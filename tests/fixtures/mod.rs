// Test fixtures - reusable test data
// Sample sources, clocks and settings shared by the integration tests

#![allow(dead_code)]

use calendar_grid::models::event::Event;
use calendar_grid::models::settings::Settings;
use calendar_grid::models::source::Source;
use calendar_grid::services::calendar::CalendarState;
use calendar_grid::services::clock::FixedClock;
use calendar_grid::services::registry::SourceRegistry;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}

/// Sample instants for testing
pub mod clocks {
    use super::*;

    /// Tuesday 27 Aug 2024, 09:00 UTC
    pub fn tuesday_morning() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 8, 27, 9, 0, 0).unwrap())
    }

    /// Sunday 1 Sep 2024, 23:30 UTC (already Monday in Sydney)
    pub fn sunday_night() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 9, 1, 23, 30, 0).unwrap())
    }
}

/// Sample sources, all in Sydney time
pub mod sources {
    use super::*;

    pub fn holidays() -> Source {
        let one_day = Duration::days(1);
        Source::new(
            "holidays",
            "Holidays",
            "178",
            vec![
                Event::new("1", "New Year's Day", at("2024-01-01T08:00:00+10:00"), one_day).unwrap(),
                Event::new("2", "Valentine's Day", at("2024-02-14T08:00:00+10:00"), one_day).unwrap(),
                Event::new("3", "Independence Day", at("2024-07-04T08:00:00+10:00"), Duration::minutes(15)).unwrap(),
                Event::new("4", "Christmas Day", at("2024-12-25T08:00:00+10:00"), one_day).unwrap(),
            ],
        )
    }

    pub fn birthdays() -> Source {
        Source::new(
            "birthdays",
            "Birthdays",
            "280",
            vec![Event::new("1", "test birthday", at("2024-08-23T13:15:00+10:00"), Duration::minutes(30)).unwrap()],
        )
    }

    pub fn work() -> Source {
        Source::new(
            "work",
            "Work",
            "0",
            vec![Event::new("1", "car lesson with me", at("2024-08-27T10:15:00+10:00"), Duration::minutes(45)).unwrap()],
        )
    }

    pub fn registry() -> SourceRegistry {
        SourceRegistry::from_sources([holidays(), birthdays(), work()])
    }
}

pub fn sydney_settings() -> Settings {
    Settings {
        time_zone: "Australia/Sydney".to_string(),
        ..Settings::default()
    }
}

/// Calendar on Tuesday 27 Aug 2024 with the sample sources and default settings
pub fn calendar() -> CalendarState {
    CalendarState::new(clocks::tuesday_morning(), sources::registry(), &Settings::default()).unwrap()
}

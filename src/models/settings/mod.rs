// Settings module
// Calendar configuration bag and its typed accessors

use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};
use crate::models::view::ViewType;
use crate::services::time_slots::TimeSlotGrid;
use crate::utils::date::weekday_from_iso;

pub const DEFAULT_TIME_ZONE: &str = "UTC";
pub const DEFAULT_WEEK_STARTS_ON: u8 = 1;
pub const DEFAULT_LOCALE: &str = "en_US";
pub const DEFAULT_TIME_SLOTS: &str = "07:00-19:00/PT15M";

/// Recognised calendar options. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// IANA zone id, e.g. "Australia/Sydney"
    pub time_zone: String,
    /// ISO day number: 1 = Monday .. 7 = Sunday
    pub week_starts_on: u8,
    pub view: String,
    pub locale: String,
    /// Compact slot grid, `<earliest>-<latest>/<duration>`
    pub time_slots: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            week_starts_on: DEFAULT_WEEK_STARTS_ON,
            view: ViewType::default().to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            time_slots: DEFAULT_TIME_SLOTS.to_string(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> CalendarResult<()> {
        self.time_zone()?;
        self.week_starts_on()?;
        self.view()?;
        self.time_slots()?;

        if self.locale.trim().is_empty() {
            return Err(CalendarError::InvalidConfiguration(
                "Locale cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn time_zone(&self) -> CalendarResult<Tz> {
        self.time_zone.parse::<Tz>().map_err(|_| {
            CalendarError::InvalidConfiguration(format!("Unknown time zone '{}'", self.time_zone))
        })
    }

    pub fn week_starts_on(&self) -> CalendarResult<Weekday> {
        weekday_from_iso(self.week_starts_on).ok_or_else(|| {
            CalendarError::InvalidConfiguration(format!(
                "Week start must be between 1 (Monday) and 7 (Sunday), got {}",
                self.week_starts_on
            ))
        })
    }

    pub fn view(&self) -> CalendarResult<ViewType> {
        self.view.parse()
    }

    pub fn time_slots(&self) -> CalendarResult<TimeSlotGrid> {
        TimeSlotGrid::parse(&self.time_slots)
    }
}

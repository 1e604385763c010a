// View Types
// Calendar view modes and the period each one displays

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// Calendar view types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    Agenda,
    Day,
    Week,
    Month,
}

impl ViewType {
    pub const ALL: [ViewType; 4] = [
        ViewType::Agenda,
        ViewType::Day,
        ViewType::Week,
        ViewType::Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Agenda => "agenda",
            ViewType::Day => "day",
            ViewType::Week => "week",
            ViewType::Month => "month",
        }
    }

    /// Number of days shown at once.
    ///
    /// Month and agenda fall back to a week until they get a layout of their own.
    pub fn period_days(&self) -> u32 {
        match self {
            ViewType::Day => 1,
            ViewType::Week | ViewType::Month | ViewType::Agenda => 7,
        }
    }

    /// Whether the time-grid layout can render this view.
    pub fn has_time_grid(&self) -> bool {
        matches!(self, ViewType::Day | ViewType::Week)
    }
}

impl Default for ViewType {
    fn default() -> Self {
        ViewType::Week
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewType::ALL
            .into_iter()
            .find(|view| view.as_str() == s)
            .ok_or_else(|| CalendarError::UnsupportedView(s.to_string()))
    }
}

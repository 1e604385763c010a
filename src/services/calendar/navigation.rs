// Period navigation for CalendarState
// Previous/next/today moves and the ranges a navigation bar links to

use chrono::{Duration, NaiveDate};

use super::CalendarState;
use crate::error::{CalendarError, CalendarResult};
use crate::services::period;
use crate::utils::date::DateRange;

impl CalendarState {
    fn period_step(&self) -> Duration {
        Duration::days(i64::from(self.period_days))
    }

    fn previous_period_date(&self) -> CalendarResult<NaiveDate> {
        self.selected_date
            .checked_sub_signed(self.period_step())
            .ok_or(CalendarError::DateOutOfRange(self.selected_date))
    }

    fn next_period_date(&self) -> CalendarResult<NaiveDate> {
        self.selected_date
            .checked_add_signed(self.period_step())
            .ok_or(CalendarError::DateOutOfRange(self.selected_date))
    }

    pub fn previous_period_range(&self) -> CalendarResult<DateRange> {
        self.date_range_including(self.previous_period_date()?)
    }

    pub fn next_period_range(&self) -> CalendarResult<DateRange> {
        self.date_range_including(self.next_period_date()?)
    }

    pub fn navigate_previous(&mut self) -> CalendarResult<&mut Self> {
        let date = self.previous_period_date()?;
        self.update(date)
    }

    pub fn navigate_next(&mut self) -> CalendarResult<&mut Self> {
        let date = self.next_period_date()?;
        self.update(date)
    }

    /// Jump back to today according to a fresh clock reading.
    pub fn navigate_today(&mut self) -> CalendarResult<&mut Self> {
        let today = self.clock.now().with_timezone(&self.time_zone).date_naive();
        self.update(today)
    }

    /// Whole weeks of the current month, for a mini-month picker.
    pub fn mini_month_range(&self) -> CalendarResult<DateRange> {
        period::month_grid_range(self.current_date, self.week_starts_on)
    }
}

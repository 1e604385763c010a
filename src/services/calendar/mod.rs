//! Calendar view state.
//!
//! Holds the clock snapshot, the selected view and date, and the date ranges
//! derived from them. Every transition recomputes the ranges before it
//! returns and announces itself through the state's [`EventDispatcher`].
//! One state serves one request; it is not meant to be shared across threads.

mod navigation;

use chrono::{DateTime, NaiveDate, Weekday};
use chrono_tz::Tz;

use crate::error::CalendarResult;
use crate::models::settings::Settings;
use crate::models::source::SharedSource;
use crate::models::view::ViewType;
use crate::services::clock::Clock;
use crate::services::dispatcher::{CalendarEvent, EventDispatcher};
use crate::services::layout::{GridLayoutEngine, LayoutPlan};
use crate::services::period;
use crate::services::registry::SourceRegistry;
use crate::services::time_slots::TimeSlotGrid;
use crate::utils::date::DateRange;

/// Already-parsed request values to apply in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub date: Option<NaiveDate>,
    pub view: Option<ViewType>,
    /// Source ids to show; empty means all of them.
    pub sources: Vec<String>,
}

pub struct CalendarState {
    clock: Box<dyn Clock>,
    sources: SourceRegistry,
    dispatcher: EventDispatcher,
    time_zone: Tz,
    week_starts_on: Weekday,
    locale: String,
    time_slots: TimeSlotGrid,
    widgets: Vec<String>,
    now: DateTime<Tz>,
    view: ViewType,
    period_days: u32,
    current_date: NaiveDate,
    current_date_range: DateRange,
    selected_date: NaiveDate,
    selected_date_range: DateRange,
}

impl CalendarState {
    /// Snapshot the clock, apply the settings, then select the configured view
    /// and today's date.
    pub fn new<C>(clock: C, sources: SourceRegistry, settings: &Settings) -> CalendarResult<Self>
    where
        C: Clock + 'static,
    {
        settings.validate()?;

        let time_zone = settings.time_zone()?;
        let week_starts_on = settings.week_starts_on()?;
        let view = settings.view()?;
        let now = clock.now().with_timezone(&time_zone);
        let today = now.date_naive();
        let range = period::range_containing(today, view.period_days(), week_starts_on)?;

        let mut state = Self {
            clock: Box::new(clock),
            sources,
            dispatcher: EventDispatcher::new(),
            time_zone,
            week_starts_on,
            locale: settings.locale.clone(),
            time_slots: settings.time_slots()?,
            widgets: Vec::new(),
            now,
            view,
            period_days: view.period_days(),
            current_date: today,
            current_date_range: range,
            selected_date: today,
            selected_date_range: range,
        };

        log::debug!(
            "Calendar state created at {} ({}, week starts {:?})",
            state.now,
            state.time_zone,
            state.week_starts_on
        );

        state.select_view(view)?;
        state.update(today)?;
        Ok(state)
    }

    /// Switch view, keeping the selected date, and announce `view.selected`.
    pub fn select_view(&mut self, view: ViewType) -> CalendarResult<&mut Self> {
        log::debug!("Selecting {} view", view);

        let previous = (self.view, self.period_days);
        self.view = view;
        self.period_days = view.period_days();
        if let Err(error) = self.update(self.selected_date) {
            (self.view, self.period_days) = previous;
            return Err(error);
        }
        self.dispatcher.dispatch(CalendarEvent::ViewSelected { view })?;
        Ok(self)
    }

    /// [`select_view`](Self::select_view) by name; unknown names fail with `UnsupportedView`.
    pub fn select_view_named(&mut self, name: &str) -> CalendarResult<&mut Self> {
        let view = name.parse::<ViewType>()?;
        self.select_view(view)
    }

    /// Re-snapshot the clock, select `date`, recompute both ranges and announce `datechange`.
    ///
    /// Leaves the state untouched when either range cannot be represented.
    pub fn update(&mut self, date: NaiveDate) -> CalendarResult<&mut Self> {
        let now = self.clock.now().with_timezone(&self.time_zone);
        let current_date = now.date_naive();
        let current_date_range = self.date_range_including(current_date)?;
        let selected_date_range = self.date_range_including(date)?;

        self.now = now;
        self.current_date = current_date;
        self.current_date_range = current_date_range;
        self.selected_date = date;
        self.selected_date_range = selected_date_range;

        log::debug!(
            "Selected {} in {}..={}",
            date,
            self.selected_date_range.start,
            self.selected_date_range.end
        );

        self.dispatcher.dispatch(CalendarEvent::DateChange { date })?;
        Ok(self)
    }

    /// The period of the active view that contains `date`.
    pub fn date_range_including(&self, date: NaiveDate) -> CalendarResult<DateRange> {
        period::range_containing(date, self.period_days, self.week_starts_on)
    }

    pub fn connect_source(&mut self, source: SharedSource) -> &mut Self {
        self.sources = self.sources.add(source);
        self
    }

    pub fn disconnect_source(&mut self, id: &str) -> &mut Self {
        self.sources = self.sources.remove(id);
        self
    }

    /// Show exactly the listed sources.
    pub fn select_sources(&mut self, ids: &[&str]) -> &mut Self {
        self.sources.select(ids);
        self
    }

    pub fn select_all_sources(&mut self) -> &mut Self {
        self.sources.select_all();
        self
    }

    /// Record a collaborator by its identifier and announce `widget`.
    pub fn attach_widget(&mut self, id: impl Into<String>) -> CalendarResult<&mut Self> {
        let id = id.into();
        self.widgets.push(id.clone());
        self.dispatcher.dispatch(CalendarEvent::Widget { widget: id })?;
        Ok(self)
    }

    /// Apply request values: date first, then view, then source selection.
    pub fn apply_selection(&mut self, selection: &Selection) -> CalendarResult<&mut Self> {
        if let Some(date) = selection.date {
            self.update(date)?;
        }

        if let Some(view) = selection.view {
            self.select_view(view)?;
        }

        if selection.sources.is_empty() {
            self.select_all_sources();
        } else {
            let ids: Vec<&str> = selection.sources.iter().map(String::as_str).collect();
            self.select_sources(&ids);
        }

        Ok(self)
    }

    /// Lay out the selected date range on the configured time slots.
    pub fn layout(&self) -> CalendarResult<LayoutPlan> {
        GridLayoutEngine::new(self.time_slots).layout(self)
    }

    pub fn is_today(&self, date: NaiveDate) -> bool {
        date == self.current_date
    }

    pub fn is_selected(&self, date: NaiveDate) -> bool {
        date == self.selected_date
    }

    pub fn now(&self) -> DateTime<Tz> {
        self.now
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    pub fn current_date_range(&self) -> DateRange {
        self.current_date_range
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn selected_date_range(&self) -> DateRange {
        self.selected_date_range
    }

    pub fn view(&self) -> ViewType {
        self.view
    }

    pub fn period_days(&self) -> u32 {
        self.period_days
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn week_starts_on(&self) -> Weekday {
        self.week_starts_on
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn time_slots(&self) -> &TimeSlotGrid {
        &self.time_slots
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    pub fn widgets(&self) -> &[String] {
        &self.widgets
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        &mut self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalendarError;
    use crate::models::source::Source;
    use crate::services::clock::{FixedClock, MockClock};
    use crate::services::dispatcher::{DATE_CHANGE, VIEW_SELECTED, WIDGET};
    use chrono::{Datelike, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Tuesday 27 August 2024, 09:00 UTC
    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 8, 27, 9, 0, 0).unwrap())
    }

    fn sources() -> SourceRegistry {
        SourceRegistry::from_sources([
            Source::new("holidays", "Holidays", "178", Vec::new()),
            Source::new("work", "Work", "0", Vec::new()),
        ])
    }

    fn state() -> CalendarState {
        CalendarState::new(clock(), sources(), &Settings::default()).unwrap()
    }

    #[test]
    fn test_defaults_after_construction() {
        let state = state();
        assert_eq!(state.view(), ViewType::Week);
        assert_eq!(state.period_days(), 7);
        assert_eq!(state.time_zone(), Tz::UTC);
        assert_eq!(state.week_starts_on(), Weekday::Mon);
        assert_eq!(state.locale(), "en_US");
        assert_eq!(state.current_date(), date(2024, 8, 27));
        assert_eq!(state.selected_date(), date(2024, 8, 27));
        assert_eq!(
            state.selected_date_range(),
            DateRange::new(date(2024, 8, 26), date(2024, 9, 1))
        );
        assert_eq!(state.current_date_range(), state.selected_date_range());
    }

    #[test]
    fn test_construction_dispatch_order() {
        let mut state = state();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for kind in [DATE_CHANGE, VIEW_SELECTED] {
            let sink = Rc::clone(&seen);
            state
                .dispatcher_mut()
                .subscribe(kind, move |event| sink.borrow_mut().push(event.clone()));
        }

        // Replay is per kind: all date changes first, then view selections.
        assert_eq!(
            *seen.borrow(),
            vec![
                CalendarEvent::DateChange { date: date(2024, 8, 27) },
                CalendarEvent::DateChange { date: date(2024, 8, 27) },
                CalendarEvent::ViewSelected { view: ViewType::Week },
            ]
        );
    }

    #[test]
    fn test_now_uses_configured_time_zone() {
        let settings = Settings {
            time_zone: "Australia/Sydney".to_string(),
            ..Settings::default()
        };
        // 2024-08-27T20:00Z is already the 28th in Sydney
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 8, 27, 20, 0, 0).unwrap());
        let state = CalendarState::new(clock, sources(), &settings).unwrap();
        assert_eq!(state.current_date(), date(2024, 8, 28));
        assert_eq!(state.now().timezone(), chrono_tz::Australia::Sydney);
    }

    #[test]
    fn test_select_day_view() {
        let mut state = state();
        state.select_view(ViewType::Day).unwrap();
        assert_eq!(state.period_days(), 1);
        assert_eq!(
            state.selected_date_range(),
            DateRange::new(date(2024, 8, 27), date(2024, 8, 27))
        );
    }

    #[test]
    fn test_select_unsupported_view() {
        let mut state = state();
        let result = state.select_view_named("quarter");
        assert_eq!(
            result.err(),
            Some(CalendarError::UnsupportedView("quarter".to_string()))
        );
        assert_eq!(state.view(), ViewType::Week);
    }

    #[test]
    fn test_month_view_is_a_week_for_now() {
        let mut state = state();
        state.select_view_named("month").unwrap();
        assert_eq!(state.view(), ViewType::Month);
        assert_eq!(state.period_days(), 7);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut state = state();
        state.update(date(2024, 9, 12)).unwrap();
        let first = state.selected_date_range();
        state.update(date(2024, 9, 12)).unwrap();
        assert_eq!(state.selected_date_range(), first);
        assert_eq!(first, DateRange::new(date(2024, 9, 9), date(2024, 9, 15)));
        assert_eq!(state.current_date(), date(2024, 8, 27));
    }

    #[test]
    fn test_update_resnapshots_clock() {
        let mut clock = MockClock::new();
        let mut calls = 0;
        clock.expect_now().returning(move || {
            calls += 1;
            if calls < 4 {
                Utc.with_ymd_and_hms(2024, 8, 27, 9, 0, 0).unwrap()
            } else {
                Utc.with_ymd_and_hms(2024, 9, 3, 9, 0, 0).unwrap()
            }
        });

        let mut state = CalendarState::new(clock, sources(), &Settings::default()).unwrap();
        assert_eq!(state.current_date(), date(2024, 8, 27));

        state.update(date(2024, 8, 27)).unwrap();
        assert_eq!(state.current_date(), date(2024, 9, 3));
        assert_eq!(
            state.current_date_range(),
            DateRange::new(date(2024, 9, 2), date(2024, 9, 8))
        );
    }

    #[test]
    fn test_week_start_from_settings() {
        let settings = Settings {
            week_starts_on: 7,
            ..Settings::default()
        };
        let state = CalendarState::new(clock(), sources(), &settings).unwrap();
        assert_eq!(state.selected_date_range().start, date(2024, 8, 25));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            time_slots: "19:00-07:00/PT15M".to_string(),
            ..Settings::default()
        };
        let result = CalendarState::new(clock(), sources(), &settings);
        assert!(matches!(result, Err(CalendarError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_connect_and_disconnect_sources() {
        let mut state = state();
        let before = state.sources().clone();

        state.connect_source(Source::new("family", "Family", "280", Vec::new()).shared());
        assert_eq!(state.sources().count(), 3);
        assert_eq!(before.count(), 2);

        state.disconnect_source("holidays");
        let ids: Vec<&str> = state.sources().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["work", "family"]);
    }

    #[test]
    fn test_attach_widget_dispatches() {
        let mut state = state();
        state.attach_widget("mini-month").unwrap();
        state.attach_widget("navigation").unwrap();

        assert_eq!(state.widgets(), &["mini-month".to_string(), "navigation".to_string()]);
        assert_eq!(state.dispatcher().history(WIDGET).len(), 2);
    }

    #[test]
    fn test_apply_selection() {
        let mut state = state();
        state
            .apply_selection(&Selection {
                date: Some(date(2024, 12, 25)),
                view: Some(ViewType::Day),
                sources: vec!["work".to_string()],
            })
            .unwrap();

        assert_eq!(state.selected_date(), date(2024, 12, 25));
        assert_eq!(state.view(), ViewType::Day);
        assert_eq!(state.sources().selected().count(), 1);

        state.apply_selection(&Selection::default()).unwrap();
        assert_eq!(state.sources().selected().count(), 2);
        assert_eq!(state.selected_date(), date(2024, 12, 25));
    }

    #[test]
    fn test_is_today_and_selected() {
        let mut state = state();
        state.update(date(2024, 8, 29)).unwrap();
        assert!(state.is_today(date(2024, 8, 27)));
        assert!(state.is_selected(date(2024, 8, 29)));
        assert!(!state.is_selected(date(2024, 8, 27)));
    }

    #[test]
    fn test_update_past_latest_week_keeps_state() {
        let last = NaiveDate::MAX;
        let settings = Settings {
            week_starts_on: last.weekday().number_from_monday() as u8,
            ..Settings::default()
        };
        let mut state = CalendarState::new(clock(), sources(), &settings).unwrap();
        let before = state.selected_date_range();

        let result = state.update(last).map(|_| ());
        assert_eq!(result, Err(CalendarError::DateOutOfRange(last)));
        assert_eq!(state.selected_date(), date(2024, 8, 27));
        assert_eq!(state.selected_date_range(), before);
        assert!(state.dispatcher().history(DATE_CHANGE).iter().all(|event| {
            !matches!(event, CalendarEvent::DateChange { date } if *date == last)
        }));
    }

    #[test]
    fn test_update_before_earliest_week_keeps_state() {
        let first = NaiveDate::MIN;
        let settings = Settings {
            week_starts_on: first.weekday().succ().number_from_monday() as u8,
            ..Settings::default()
        };
        let mut state = CalendarState::new(clock(), sources(), &settings).unwrap();
        let before = state.selected_date_range();

        let result = state.update(first).map(|_| ());
        assert_eq!(result, Err(CalendarError::DateOutOfRange(first)));
        assert_eq!(state.selected_date(), date(2024, 8, 27));
        assert_eq!(state.selected_date_range(), before);
    }

    #[test]
    fn test_failed_view_switch_keeps_view() {
        let last = NaiveDate::MAX;
        let settings = Settings {
            view: "day".to_string(),
            week_starts_on: last.weekday().number_from_monday() as u8,
            ..Settings::default()
        };
        let mut state = CalendarState::new(clock(), sources(), &settings).unwrap();
        state.update(last).unwrap();

        assert!(state.select_view(ViewType::Week).is_err());
        assert_eq!(state.view(), ViewType::Day);
        assert_eq!(state.period_days(), 1);
        assert_eq!(state.selected_date_range(), DateRange::new(last, last));
    }
}

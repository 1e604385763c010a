//! Grid layout for day and week views.
//!
//! For every day of the selected range and every selected source, the engine
//! walks the time slots and emits one cell per event (at the slot where the
//! event is first found) followed by one empty cell per slot no event covers.
//! Events in the same source may overlap; they are emitted as separate cells
//! and the occupancy bitmap only suppresses the empty cells beneath them.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::{CalendarError, CalendarResult};
use crate::models::event::{serialize_duration_seconds, Event};
use crate::models::source::Source;
use crate::models::view::ViewType;
use crate::services::calendar::CalendarState;
use crate::services::registry::SourceRegistry;
use crate::services::time_slots::TimeSlotGrid;
use crate::utils::date::DateRange;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPlan {
    pub view: ViewType,
    pub range: DateRange,
    pub slots: Vec<NaiveTime>,
    #[serde(serialize_with = "serialize_duration_seconds")]
    pub slot_duration: Duration,
    pub days: Vec<DayLayout>,
}

impl LayoutPlan {
    pub fn day(&self, date: NaiveDate) -> Option<&DayLayout> {
        self.days.iter().find(|day| day.date == date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayLayout {
    pub date: NaiveDate,
    pub is_selected: bool,
    pub is_today: bool,
    pub columns: Vec<SourceColumn>,
}

impl DayLayout {
    pub fn column(&self, source_id: &str) -> Option<&SourceColumn> {
        self.columns.iter().find(|column| column.source_id == source_id)
    }
}

/// Cells of one source on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceColumn {
    pub source_id: String,
    pub source_name: String,
    pub colour: String,
    /// 1-based position among the day's columns.
    pub column: usize,
    pub cells: Vec<LayoutCell>,
}

impl SourceColumn {
    pub fn events(&self) -> impl Iterator<Item = &LayoutCell> {
        self.cells.iter().filter(|cell| cell.is_event())
    }

    /// Slot indices left empty, ascending.
    pub fn empty_slots(&self) -> Vec<usize> {
        self.cells
            .iter()
            .filter_map(|cell| match cell {
                LayoutCell::Empty { slot, .. } => Some(*slot),
                LayoutCell::Event { .. } => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayoutCell {
    Event {
        event: Event,
        start_slot: usize,
        span: usize,
        time: NaiveTime,
    },
    Empty {
        slot: usize,
        time: NaiveTime,
    },
}

impl LayoutCell {
    pub fn is_event(&self) -> bool {
        matches!(self, LayoutCell::Event { .. })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GridLayoutEngine {
    time_slots: TimeSlotGrid,
}

impl GridLayoutEngine {
    pub fn new(time_slots: TimeSlotGrid) -> Self {
        Self { time_slots }
    }

    /// Lay out the state's selected range with its selected sources.
    ///
    /// Only views with a time grid can be laid out; month and agenda fail
    /// with `ViewNotImplemented`.
    pub fn layout(&self, state: &CalendarState) -> CalendarResult<LayoutPlan> {
        let view = state.view();
        if !view.has_time_grid() {
            return Err(CalendarError::ViewNotImplemented(view));
        }

        let range = state.selected_date_range();
        let sources = state.sources().selected();
        let days: Vec<DayLayout> = range
            .days()
            .map(|date| DayLayout {
                date,
                is_selected: state.is_selected(date),
                is_today: state.is_today(date),
                columns: self.layout_day(date, &sources),
            })
            .collect();

        log::debug!(
            "Laid out {} view for {}..={}: {} days x {} sources",
            view,
            range.start,
            range.end,
            days.len(),
            sources.len()
        );

        Ok(LayoutPlan {
            view,
            range,
            slots: self.time_slots.slots(),
            slot_duration: self.time_slots.slot_duration(),
            days,
        })
    }

    /// One column per source in registry order. Selection is not consulted here.
    pub fn layout_day(&self, date: NaiveDate, sources: &SourceRegistry) -> Vec<SourceColumn> {
        sources
            .iter()
            .enumerate()
            .map(|(index, source)| self.layout_column(index + 1, source, source.events_on(date)))
            .collect()
    }

    /// Place `events` on the slot grid for a single column.
    pub fn layout_column(&self, column: usize, source: &Source, events: Vec<Event>) -> SourceColumn {
        let slots = self.time_slots.slots();
        let mut occupied = vec![false; slots.len()];
        let mut pending: Vec<Option<Event>> = events.into_iter().map(Some).collect();
        let mut cells = Vec::new();

        for (index, slot) in slots.iter().enumerate() {
            for entry in pending.iter_mut() {
                let found = entry.as_ref().is_some_and(|event| event.occurs_at(*slot));
                if !found {
                    continue;
                }

                if let Some(event) = entry.take() {
                    let span = self.time_slots.span_for(event.duration);
                    let covered = (index + span).min(occupied.len());
                    occupied[index..covered].iter_mut().for_each(|used| *used = true);

                    cells.push(LayoutCell::Event {
                        event,
                        start_slot: index,
                        span,
                        time: *slot,
                    });
                }
            }
        }

        let unplaced = pending.iter().filter(|entry| entry.is_some()).count();
        if unplaced > 0 {
            log::trace!("{} events of '{}' fall outside the slot grid", unplaced, source.id);
        }

        cells.extend(
            occupied
                .iter()
                .zip(&slots)
                .enumerate()
                .filter(|(_, (used, _))| !**used)
                .map(|(slot, (_, time))| LayoutCell::Empty { slot, time: *time }),
        );

        SourceColumn {
            source_id: source.id.clone(),
            source_name: source.name.clone(),
            colour: source.colour.clone(),
            column,
            cells,
        }
    }
}

impl Default for GridLayoutEngine {
    fn default() -> Self {
        Self::new(TimeSlotGrid::default())
    }
}

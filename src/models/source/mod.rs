// Source module
// Named, coloured, selectable provider of events

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::models::event::Event;

/// Handle shared by every registry that contains the source.
///
/// Selection and appended events are visible through all holders of the handle.
pub type SharedSource = Rc<Source>;

/// In-memory event source.
#[derive(Debug)]
pub struct Source {
    pub id: String,
    pub name: String,
    /// Presentation token, passed through untouched.
    pub colour: String,
    selected: Cell<bool>,
    events: RefCell<Vec<Event>>,
}

impl Source {
    /// Create a source with an initial event list. Sources start out selected.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        colour: impl Into<String>,
        events: Vec<Event>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            colour: colour.into(),
            selected: Cell::new(true),
            events: RefCell::new(events),
        }
    }

    pub fn shared(self) -> SharedSource {
        Rc::new(self)
    }

    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    pub fn select(&self) -> &Self {
        self.selected.set(true);
        self
    }

    pub fn deselect(&self) -> &Self {
        self.selected.set(false);
        self
    }

    pub fn add_event(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    /// All events in insertion order.
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn events_between<Z1: TimeZone, Z2: TimeZone>(
        &self,
        from: &DateTime<Z1>,
        to: &DateTime<Z2>,
    ) -> Vec<Event> {
        self.filtered(|event| event.occurs_between(from, to))
    }

    /// Events that start and end on `date`, in insertion order.
    pub fn events_on(&self, date: NaiveDate) -> Vec<Event> {
        self.filtered(|event| event.occurs_on(date))
    }

    /// Events on the date of `instant`, taken in the instant's own zone.
    pub fn events_for<Z: TimeZone>(&self, instant: &DateTime<Z>) -> Vec<Event> {
        self.events_on(instant.date_naive())
    }

    /// Same identity as `other`. Ids are the only identity a source has.
    pub fn same_as(&self, other: &Source) -> bool {
        self.id == other.id
    }

    fn filtered(&self, predicate: impl Fn(&Event) -> bool) -> Vec<Event> {
        self.events
            .borrow()
            .iter()
            .filter(|event| predicate(event))
            .cloned()
            .collect()
    }
}

impl Clone for Source {
    /// Deep copy: the clone has its own selection flag and event list.
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            colour: self.colour.clone(),
            selected: Cell::new(self.selected.get()),
            events: RefCell::new(self.events.borrow().clone()),
        }
    }
}

//! Ordered, deduplicated collection of event sources.
//!
//! Structural operations (`add`, `remove`, `filter`, `map`) never touch the
//! registry they are called on; they return a new registry holding the same
//! source handles. Selection changes go through the handles themselves and so
//! show up in every registry sharing them. `deep_clone` breaks that sharing.

use std::rc::Rc;

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::error::{CalendarError, CalendarResult};
use crate::models::event::Event;
use crate::models::source::{SharedSource, Source};

#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<SharedSource>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from owned sources, dropping later duplicates of an id.
    pub fn from_sources<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Source>,
    {
        Self::from_shared(sources.into_iter().map(Rc::new))
    }

    /// Build from existing handles, dropping later duplicates of an id.
    pub fn from_shared<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = SharedSource>,
    {
        let mut registry = Self::new();
        for source in sources {
            registry.push_unique(source);
        }
        registry
    }

    /// New registry with `source` appended. A duplicate id is silently ignored.
    pub fn add(&self, source: SharedSource) -> Self {
        let mut copy = self.clone();
        copy.push_unique(source);
        copy
    }

    pub fn add_all<I>(&self, sources: I) -> Self
    where
        I: IntoIterator<Item = SharedSource>,
    {
        let mut copy = self.clone();
        for source in sources {
            copy.push_unique(source);
        }
        copy
    }

    /// Like [`add`](Self::add), but reports a duplicate id instead of ignoring it.
    pub fn try_add(&self, source: SharedSource) -> CalendarResult<Self> {
        if self.contains(&source.id) {
            return Err(CalendarError::DuplicateSourceId(source.id.clone()));
        }
        Ok(self.add(source))
    }

    /// New registry without the source carrying `id`.
    pub fn remove(&self, id: &str) -> Self {
        self.filter(|source| source.id != id)
    }

    pub fn filter(&self, predicate: impl Fn(&Source) -> bool) -> Self {
        Self {
            sources: self
                .sources
                .iter()
                .filter(|source| predicate(source))
                .cloned()
                .collect(),
        }
    }

    /// New registry of transformed handles, deduplicated again by id.
    pub fn map(&self, transform: impl Fn(&SharedSource) -> SharedSource) -> Self {
        Self::from_shared(self.sources.iter().map(transform))
    }

    /// Copy with freshly allocated sources; selection changes no longer propagate.
    pub fn deep_clone(&self) -> Self {
        Self {
            sources: self
                .sources
                .iter()
                .map(|source| Rc::new(Source::clone(source)))
                .collect(),
        }
    }

    pub fn find(&self, predicate: impl Fn(&Source) -> bool) -> Option<SharedSource> {
        self.sources.iter().find(|source| predicate(source)).cloned()
    }

    pub fn get(&self, id: &str) -> CalendarResult<SharedSource> {
        self.find(|source| source.id == id)
            .ok_or_else(|| CalendarError::SourceNotFound(id.to_string()))
    }

    pub fn get_by_name(&self, name: &str) -> CalendarResult<SharedSource> {
        self.find(|source| source.name == name)
            .ok_or_else(|| CalendarError::SourceNotFound(name.to_string()))
    }

    /// Sub-registry of the sources whose id is listed, in registry order.
    pub fn get_by_ids(&self, ids: &[&str]) -> Self {
        self.filter(|source| ids.contains(&source.id.as_str()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sources.iter().any(|source| source.id == id)
    }

    pub fn first(&self) -> Option<SharedSource> {
        self.sources.first().cloned()
    }

    pub fn last(&self) -> Option<SharedSource> {
        self.sources.last().cloned()
    }

    /// Select exactly the listed sources and deselect the rest.
    pub fn select(&self, ids: &[&str]) -> &Self {
        for source in &self.sources {
            if ids.contains(&source.id.as_str()) {
                source.select();
            } else {
                source.deselect();
            }
        }
        self
    }

    pub fn select_all(&self) -> &Self {
        for source in &self.sources {
            source.select();
        }
        self
    }

    pub fn deselect_all(&self) -> &Self {
        for source in &self.sources {
            source.deselect();
        }
        self
    }

    pub fn selected(&self) -> Self {
        self.filter(Source::is_selected)
    }

    pub fn unselected(&self) -> Self {
        self.filter(|source| !source.is_selected())
    }

    /// Whether the handle for `id` is also held outside this registry.
    pub fn is_shared(&self, id: &str) -> bool {
        self.sources
            .iter()
            .find(|source| source.id == id)
            .map(|source| Rc::strong_count(source) > 1)
            .unwrap_or(false)
    }

    /// Events on `date` per source, in registry order.
    pub fn events_on(&self, date: NaiveDate) -> Vec<(SharedSource, Vec<Event>)> {
        self.sources
            .iter()
            .map(|source| (Rc::clone(source), source.events_on(date)))
            .collect()
    }

    pub fn events_between<Z1: TimeZone, Z2: TimeZone>(
        &self,
        from: &DateTime<Z1>,
        to: &DateTime<Z2>,
    ) -> Vec<(SharedSource, Vec<Event>)> {
        self.sources
            .iter()
            .map(|source| (Rc::clone(source), source.events_between(from, to)))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SharedSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn count(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    fn push_unique(&mut self, source: SharedSource) {
        if self.contains(&source.id) {
            log::warn!("Ignoring source with duplicate id '{}'", source.id);
            return;
        }
        self.sources.push(source);
    }
}

impl<'a> IntoIterator for &'a SourceRegistry {
    type Item = &'a SharedSource;
    type IntoIter = std::slice::Iter<'a, SharedSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}

impl FromIterator<Source> for SourceRegistry {
    fn from_iter<I: IntoIterator<Item = Source>>(iter: I) -> Self {
        Self::from_sources(iter)
    }
}

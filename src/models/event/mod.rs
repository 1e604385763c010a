// Event module
// Immutable calendar occurrence with zone-aware occurrence predicates

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::error::{CalendarError, CalendarResult};

/// One occurrence provided by a source.
///
/// The start instant keeps the UTC offset it was created with; date and
/// time-of-day checks are made in that offset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub start: DateTime<FixedOffset>,
    #[serde(serialize_with = "serialize_duration_seconds")]
    pub duration: Duration,
    pub description: Option<String>,
    pub location: Option<String>,
    pub organiser: Option<String>,
    pub attendees: Vec<String>,
}

pub(crate) fn serialize_duration_seconds<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_i64(duration.num_seconds())
}

impl Event {
    /// Create a new event with required fields
    ///
    /// # Arguments
    /// * `id` - Identifier, unique within the owning source (non-empty)
    /// * `title` - Display name
    /// * `start` - Start instant with its UTC offset
    /// * `duration` - How long the event lasts (non-negative)
    ///
    /// # Examples
    /// ```
    /// use calendar_grid::models::event::Event;
    /// use chrono::{DateTime, Duration};
    ///
    /// let start = DateTime::parse_from_rfc3339("2024-08-27T10:15:00+10:00").unwrap();
    /// let event = Event::new("1", "Car lesson", start, Duration::minutes(45)).unwrap();
    /// assert_eq!(event.end().to_rfc3339(), "2024-08-27T11:00:00+10:00");
    /// ```
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<FixedOffset>,
        duration: Duration,
    ) -> CalendarResult<Self> {
        let event = Self {
            id: id.into(),
            title: title.into(),
            start,
            duration,
            description: None,
            location: None,
            organiser: None,
            attendees: Vec::new(),
        };

        event.validate()?;
        Ok(event)
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    pub fn validate(&self) -> CalendarResult<()> {
        if self.id.trim().is_empty() {
            return Err(CalendarError::InvalidEvent(
                "Event id cannot be empty".to_string(),
            ));
        }

        if self.duration < Duration::zero() {
            return Err(CalendarError::InvalidEvent(format!(
                "Event '{}' has a negative duration",
                self.id
            )));
        }

        if self.start.checked_add_signed(self.duration).is_none() {
            return Err(CalendarError::InvalidEvent(format!(
                "Event '{}' ends beyond the representable date range",
                self.id
            )));
        }

        Ok(())
    }

    /// Start plus duration. Only meaningful for an event that passed [`validate`](Self::validate).
    pub fn end(&self) -> DateTime<FixedOffset> {
        self.start + self.duration
    }

    /// True when the whole event lies within `[from, to]`.
    pub fn occurs_between<Z1: TimeZone, Z2: TimeZone>(
        &self,
        from: &DateTime<Z1>,
        to: &DateTime<Z2>,
    ) -> bool {
        let start = self.start.with_timezone(&Utc);
        let end = self.end().with_timezone(&Utc);

        start >= from.with_timezone(&Utc) && end <= to.with_timezone(&Utc)
    }

    /// True when the event both starts and ends on `date`.
    ///
    /// Events spanning midnight are not "on" any single date.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.start.date_naive() >= date && self.end().date_naive() <= date
    }

    /// True when `time` falls within the event's start and end time-of-day, inclusive.
    pub fn occurs_at(&self, time: NaiveTime) -> bool {
        self.start.time() <= time && self.end().time() >= time
    }
}

/// Builder for creating events with optional fields
#[derive(Default)]
pub struct EventBuilder {
    id: Option<String>,
    title: Option<String>,
    start: Option<DateTime<FixedOffset>>,
    duration: Option<Duration>,
    description: Option<String>,
    location: Option<String>,
    organiser: Option<String>,
    attendees: Vec<String>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn start(mut self, start: DateTime<FixedOffset>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the longer description shown in event details
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set where the event happens (address, meeting link, ...)
    pub fn attend_at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn organised_by(mut self, organiser: impl Into<String>) -> Self {
        self.organiser = Some(organiser.into());
        self
    }

    pub fn invite<I, S>(mut self, attendees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attendees.extend(attendees.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> CalendarResult<Event> {
        let missing = |field: &str| CalendarError::InvalidEvent(format!("Event {field} is required"));

        let event = Event {
            id: self.id.ok_or_else(|| missing("id"))?,
            title: self.title.ok_or_else(|| missing("title"))?,
            start: self.start.ok_or_else(|| missing("start time"))?,
            duration: self.duration.ok_or_else(|| missing("duration"))?,
            description: self.description,
            location: self.location,
            organiser: self.organiser,
            attendees: self.attendees,
        };

        event.validate()?;
        Ok(event)
    }
}

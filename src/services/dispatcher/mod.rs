//! Notification bus scoped to one calendar state.
//!
//! The calendar's own notifications are typed variants of [`CalendarEvent`].
//! Collaborators may register further kinds with a list of required parameter
//! names; those travel as [`CalendarEvent::Custom`] and have their parameters
//! checked against the registered contract on every dispatch. Kind names are
//! case-insensitive and stored lowercased.
//!
//! Every dispatched event is kept per kind, and a listener subscribing late is
//! immediately replayed that history in dispatch order. Delivery is
//! synchronous on the caller's thread.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::error::{CalendarError, CalendarResult};
use crate::models::view::ViewType;

pub const VIEW_REGISTERED: &str = "view.registered";
pub const VIEW_SELECTED: &str = "view.selected";
pub const PARAMETER: &str = "parameter";
pub const WIDGET: &str = "widget";
pub const DATE_CHANGE: &str = "datechange";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarEvent {
    ViewRegistered { view: ViewType },
    ViewSelected { view: ViewType },
    Parameter { name: String, value: String },
    Widget { widget: String },
    DateChange { date: NaiveDate },
    Custom {
        kind: String,
        params: BTreeMap<String, String>,
    },
}

impl CalendarEvent {
    pub fn kind(&self) -> &str {
        match self {
            CalendarEvent::ViewRegistered { .. } => VIEW_REGISTERED,
            CalendarEvent::ViewSelected { .. } => VIEW_SELECTED,
            CalendarEvent::Parameter { .. } => PARAMETER,
            CalendarEvent::Widget { .. } => WIDGET,
            CalendarEvent::DateChange { .. } => DATE_CHANGE,
            CalendarEvent::Custom { kind, .. } => kind.as_str(),
        }
    }
}

type Listener = Box<dyn FnMut(&CalendarEvent)>;

pub struct EventDispatcher {
    contracts: HashMap<String, Vec<String>>,
    listeners: HashMap<String, Vec<Listener>>,
    history: HashMap<String, Vec<CalendarEvent>>,
}

impl EventDispatcher {
    /// Dispatcher with the calendar's built-in kinds registered.
    pub fn new() -> Self {
        let mut dispatcher = Self::empty();
        let builtin: [(&str, &[&str]); 5] = [
            (VIEW_REGISTERED, &["view"]),
            (VIEW_SELECTED, &["view"]),
            (PARAMETER, &["name", "value"]),
            (WIDGET, &["widget"]),
            (DATE_CHANGE, &["date"]),
        ];

        for (kind, params) in builtin {
            dispatcher
                .contracts
                .insert(kind.to_string(), params.iter().map(|p| p.to_string()).collect());
        }

        dispatcher
    }

    /// Dispatcher with no kinds registered at all.
    pub fn empty() -> Self {
        Self {
            contracts: HashMap::new(),
            listeners: HashMap::new(),
            history: HashMap::new(),
        }
    }

    /// Register a kind and the exact parameter names its events must carry.
    /// Kind names are case-insensitive.
    pub fn register_kind(&mut self, kind: &str, required_params: &[&str]) -> CalendarResult<&mut Self> {
        let kind = kind.to_lowercase();
        if self.contracts.contains_key(&kind) {
            return Err(CalendarError::DuplicateEventKind(kind));
        }

        log::debug!("Registered event kind '{}' {:?}", kind, required_params);
        self.contracts.insert(
            kind,
            required_params.iter().map(|p| p.to_string()).collect(),
        );
        Ok(self)
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.contracts.contains_key(&kind.to_lowercase())
    }

    pub fn required_params(&self, kind: &str) -> Option<&[String]> {
        self.contracts.get(&kind.to_lowercase()).map(Vec::as_slice)
    }

    /// Build an event from loosely-typed parameters, enforcing the kind's contract.
    pub fn create_event<I, K, V>(&self, kind: &str, params: I) -> CalendarResult<CalendarEvent>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let kind = kind.to_lowercase();
        let contract = self
            .contracts
            .get(&kind)
            .ok_or_else(|| CalendarError::UnknownEventKind(kind.clone()))?;

        let mut params: BTreeMap<String, String> = params
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        let mut checked = BTreeMap::new();

        for name in contract {
            let value = params.remove(name).ok_or_else(|| CalendarError::MissingParameter {
                kind: kind.clone(),
                param: name.clone(),
            })?;
            checked.insert(name.clone(), value);
        }

        if !params.is_empty() {
            return Err(CalendarError::UnexpectedParameter {
                kind,
                params: params.into_keys().collect(),
            });
        }

        typed_event(kind, checked)
    }

    /// Deliver `event` to every listener of its kind, in subscription order, then record it.
    ///
    /// A `Custom` event goes through [`create_event`](Self::create_event) first, so one
    /// naming a built-in kind arrives as the matching typed variant.
    pub fn dispatch(&mut self, event: CalendarEvent) -> CalendarResult<()> {
        let event = match event {
            CalendarEvent::Custom { kind, params } => self.create_event(&kind, params)?,
            typed => typed,
        };

        let kind = event.kind().to_string();
        if !self.contracts.contains_key(&kind) {
            return Err(CalendarError::UnknownEventKind(kind));
        }

        if let Some(listeners) = self.listeners.get_mut(&kind) {
            for listener in listeners.iter_mut() {
                listener(&event);
            }
        }

        log::debug!("Dispatched {:?}", event);
        self.history.entry(kind).or_default().push(event);
        Ok(())
    }

    /// [`create_event`](Self::create_event) followed by [`dispatch`](Self::dispatch).
    pub fn dispatch_params<I, K, V>(&mut self, kind: &str, params: I) -> CalendarResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let event = self.create_event(kind, params)?;
        self.dispatch(event)
    }

    /// Add a listener for `kind`, replaying every earlier event of that kind to it first.
    pub fn subscribe<F>(&mut self, kind: &str, mut listener: F) -> &mut Self
    where
        F: FnMut(&CalendarEvent) + 'static,
    {
        let kind = kind.to_lowercase();

        if let Some(past) = self.history.get(&kind) {
            for event in past {
                listener(event);
            }
        }

        self.listeners.entry(kind).or_default().push(Box::new(listener));
        self
    }

    pub fn on_date_change<F>(&mut self, mut listener: F) -> &mut Self
    where
        F: FnMut(NaiveDate) + 'static,
    {
        self.subscribe(DATE_CHANGE, move |event| {
            if let CalendarEvent::DateChange { date } = event {
                listener(*date);
            }
        })
    }

    pub fn on_view_selected<F>(&mut self, mut listener: F) -> &mut Self
    where
        F: FnMut(ViewType) + 'static,
    {
        self.subscribe(VIEW_SELECTED, move |event| {
            if let CalendarEvent::ViewSelected { view } = event {
                listener(*view);
            }
        })
    }

    /// Events of `kind` dispatched so far, oldest first.
    pub fn history(&self, kind: &str) -> &[CalendarEvent] {
        self.history
            .get(&kind.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("contracts", &self.contracts)
            .field("listeners", &self.listeners.values().map(Vec::len).sum::<usize>())
            .field("history", &self.history.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}

fn typed_event(kind: String, mut params: BTreeMap<String, String>) -> CalendarResult<CalendarEvent> {
    let mut take = |name: &str| params.remove(name).unwrap_or_default();
    let invalid = |kind: &str, param: &str, value: String| CalendarError::InvalidParameter {
        kind: kind.to_string(),
        param: param.to_string(),
        value,
    };

    let event = match kind.as_str() {
        VIEW_REGISTERED | VIEW_SELECTED => {
            let value = take("view");
            let view = value
                .parse::<ViewType>()
                .map_err(|_| invalid(&kind, "view", value.clone()))?;
            if kind == VIEW_REGISTERED {
                CalendarEvent::ViewRegistered { view }
            } else {
                CalendarEvent::ViewSelected { view }
            }
        }
        PARAMETER => CalendarEvent::Parameter {
            name: take("name"),
            value: take("value"),
        },
        WIDGET => CalendarEvent::Widget {
            widget: take("widget"),
        },
        DATE_CHANGE => {
            let value = take("date");
            let date = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                .map_err(|_| invalid(&kind, "date", value.clone()))?;
            CalendarEvent::DateChange { date }
        }
        _ => CalendarEvent::Custom {
            kind: kind.clone(),
            params,
        },
    };

    Ok(event)
}

//! Error types for calendar layout and view-state operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::view::ViewType;

/// Errors raised by the calendar core.
///
/// All of these are deterministic programmer or configuration errors; nothing
/// in the core retries or recovers from them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("View type \"{0}\" not supported")]
    UnsupportedView(String),

    #[error("{0} view not implemented")]
    ViewNotImplemented(ViewType),

    #[error("Event kind '{0}' already registered")]
    DuplicateEventKind(String),

    #[error("Event kind '{0}' not registered")]
    UnknownEventKind(String),

    #[error("Missing required parameter '{param}' for event '{kind}'")]
    MissingParameter { kind: String, param: String },

    #[error("Unknown parameters for event '{kind}': {}", params.join(", "))]
    UnexpectedParameter { kind: String, params: Vec<String> },

    #[error("Invalid value '{value}' for parameter '{param}' of event '{kind}'")]
    InvalidParameter {
        kind: String,
        param: String,
        value: String,
    },

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Source '{0}' already exists")]
    DuplicateSourceId(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Date {0} is too close to the edge of the supported calendar range")]
    DateOutOfRange(NaiveDate),
}

/// Result type alias for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;

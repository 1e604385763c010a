// Calendar Grid Library
// View state, period arithmetic and slot-grid layout for day and week calendars

pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{CalendarError, CalendarResult};

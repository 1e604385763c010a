// Service module exports

pub mod calendar;
pub mod clock;
pub mod dispatcher;
pub mod layout;
pub mod period;
pub mod registry;
pub mod settings;
pub mod time_slots;

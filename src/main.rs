// Calendar Grid demo
// Builds a calendar from sample sources and prints this week's layout as JSON

use anyhow::{Context, Result};
use chrono::{DateTime, Duration};

use calendar_grid::models::event::Event;
use calendar_grid::models::source::Source;
use calendar_grid::services::calendar::CalendarState;
use calendar_grid::services::clock::SystemClock;
use calendar_grid::services::registry::SourceRegistry;
use calendar_grid::services::settings::SettingsService;

const WIDGETS: [&str; 5] = [
    "mini-month",
    "source-selector",
    "view-selector",
    "navigation",
    "date-display",
];

fn main() -> Result<()> {
    env_logger::init();

    log::info!("Starting calendar grid demo");

    let settings = SettingsService::at_default_location()?.load_or_default()?;
    let mut calendar = CalendarState::new(SystemClock, demo_sources()?, &settings)
        .context("Failed to set up calendar")?;

    for widget in WIDGETS {
        calendar.attach_widget(widget)?;
    }

    let plan = calendar.layout().context("Failed to lay out calendar")?;
    println!("{}", serde_json::to_string_pretty(&plan)?);

    Ok(())
}

fn event(id: &str, title: &str, start: &str, duration: Duration) -> Result<Event> {
    let start = DateTime::parse_from_rfc3339(start)
        .with_context(|| format!("Bad start time for '{}'", title))?;
    Ok(Event::new(id, title, start, duration)?)
}

fn demo_sources() -> Result<SourceRegistry> {
    let one_day = Duration::days(1);

    let holidays = Source::new(
        "holidays",
        "Holidays",
        "178",
        vec![
            event("1", "New Year's Day", "2024-01-01T08:00:00+10:00", one_day)?,
            event("2", "Valentine's Day", "2024-02-14T08:00:00+10:00", one_day)?,
            event("3", "Independence Day", "2024-07-04T08:00:00+10:00", Duration::minutes(15))?,
            event("4", "Christmas Day", "2024-12-25T08:00:00+10:00", one_day)?,
        ],
    );

    let birthdays = Source::new(
        "birthdays",
        "Birthdays",
        "280",
        vec![event("1", "test birthday", "2024-08-23T13:15:00+10:00", Duration::minutes(30))?],
    );

    let work = Source::new(
        "work",
        "Work",
        "0",
        vec![event("1", "car lesson with me", "2024-08-27T10:15:00+10:00", Duration::minutes(45))?],
    );

    Ok(SourceRegistry::from_sources([holidays, birthdays, work]))
}

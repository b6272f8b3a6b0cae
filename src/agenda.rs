use std::fmt;

use serde::Serialize;

use crate::extract::Event;

/// How many events the upcoming list shows by default.
pub const DEFAULT_AGENDA_LIMIT: usize = 5;

/// One entry of an "upcoming events" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaLine {
    pub start: String,
    pub summary: String,
}

impl fmt::Display for AgendaLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.summary)
    }
}

impl From<&Event> for AgendaLine {
    fn from(event: &Event) -> Self {
        AgendaLine {
            start: event.start.clone(),
            summary: event.summary.clone(),
        }
    }
}

/// The first `limit` events, in feed order.
///
/// Events are neither sorted nor filtered by date, feeds are expected to list
/// them in the order they should be shown.
pub fn upcoming(events: &[Event], limit: usize) -> Vec<AgendaLine> {
    events.iter().take(limit).map(AgendaLine::from).collect()
}

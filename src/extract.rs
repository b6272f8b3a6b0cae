use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, trace};

use crate::timestamp::normalize_timestamp;

const BEGIN_EVENT: &str = "BEGIN:VEVENT";
const END_EVENT: &str = "END:VEVENT";

/// An event scraped out of a `VEVENT` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// The `SUMMARY` of the event. Never empty.
    pub summary: String,
    /// The raw `DTSTART` value. Never empty.
    pub start: String,
    /// The raw `DTEND` value, or an empty string if the event had none.
    pub end: String,
    /// `start` as a UTC instant, if it looked like an ICS timestamp.
    pub start_date: Option<DateTime<Utc>>,
}

impl Event {
    /// Build an event from the body of a single `VEVENT` block.
    ///
    /// Returns `None` unless both a summary and a start are present.
    fn from_body(body: &str) -> Option<Event> {
        let summary = find_field(body, Field::Summary)
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let start = find_field(body, Field::Start)
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let (summary, start) = match (summary, start) {
            (Some(summary), Some(start)) => (summary, start),
            (summary, start) => {
                debug!(
                    has_summary = summary.is_some(),
                    has_start = start.is_some(),
                    "Skipping VEVENT block"
                );
                return None;
            }
        };

        let end = find_field(body, Field::End).map_or("", str::trim);

        let start_date = normalize_timestamp(Some(start));
        if start_date.is_none() {
            trace!(start, "DTSTART is not an ICS timestamp");
        }

        Some(Event {
            summary: summary.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            start_date,
        })
    }
}

/// Scrape the events out of an ICS document.
///
/// This does not parse the document. Everything outside of
/// `BEGIN:VEVENT`/`END:VEVENT` pairs is ignored, and within a block only
/// `SUMMARY`, `DTSTART` and `DTEND` are looked at. Blocks without a summary or
/// a start are dropped.
pub fn extract_events(text: &str) -> Vec<Event> {
    text.split(BEGIN_EVENT)
        .skip(1)
        .filter_map(|block| {
            // Anything after the closing marker belongs to something else.
            let body = block.split(END_EVENT).next().unwrap_or(block);
            Event::from_body(body)
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Summary,
    Start,
    End,
}

impl Field {
    fn marker(self) -> &'static str {
        match self {
            Field::Summary => "SUMMARY:",
            Field::Start => "DTSTART",
            Field::End => "DTEND",
        }
    }

    /// Pull the value out of the text directly following the marker.
    fn value_after_marker(self, rest: &str) -> Option<&str> {
        match self {
            Field::Summary => Some(rest).filter(|v| !v.is_empty()),
            Field::Start | Field::End => parameterised_value(rest),
        }
    }
}

/// Skip an optional `;PARAM=...` list and return what follows the `:`.
fn parameterised_value(rest: &str) -> Option<&str> {
    let value = if let Some(params) = rest.strip_prefix(';') {
        match params.find(':') {
            Some(0) | None => return None,
            Some(colon) => &params[colon + 1..],
        }
    } else {
        rest.strip_prefix(':')?
    };

    Some(value).filter(|v| !v.is_empty())
}

/// Find the first value for the field, scanning line by line.
///
/// The marker may appear anywhere in a line, and an occurrence that isn't
/// followed by a usable value doesn't stop the search.
fn find_field(body: &str, field: Field) -> Option<&str> {
    let marker = field.marker();

    body.split(|c: char| c == '\n' || c == '\r').find_map(|line| {
        line.match_indices(marker)
            .find_map(|(idx, _)| field.value_after_marker(&line[idx + marker.len()..]))
    })
}

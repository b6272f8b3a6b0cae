//! Scrape events out of iCalendar feeds and bucket them by day.
//!
//! This is deliberately not an iCalendar parser. Only the `SUMMARY`, `DTSTART`
//! and `DTEND` of each `VEVENT` are looked at, and timestamps are always read
//! as UTC. Anything that can't be made sense of is skipped rather than
//! reported.

pub mod agenda;
pub mod extract;
pub mod group;
pub mod timestamp;

pub use agenda::{upcoming, AgendaLine, DEFAULT_AGENDA_LIMIT};
pub use extract::{extract_events, Event};
pub use group::{group_by_day, DayBuckets};
pub use timestamp::normalize_timestamp;

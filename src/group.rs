use std::borrow::Borrow;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::extract::Event;

/// Events bucketed by the UTC day they start on, keyed by `YYYY-MM-DD`.
///
/// Days are kept in the order they were first seen, and events within a day
/// keep their original order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DayBuckets {
    days: IndexMap<String, Vec<Event>>,
}

impl DayBuckets {
    pub fn get(&self, day: &str) -> Option<&[Event]> {
        self.days.get(day).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.days.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Event])> {
        self.days
            .iter()
            .map(|(day, events)| (day.as_str(), events.as_slice()))
    }

    /// Number of days with at least one event.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, Vec<Event>> {
        self.days
    }
}

impl IntoIterator for DayBuckets {
    type Item = (String, Vec<Event>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<Event>>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.into_iter()
    }
}

/// Group events by the UTC calendar day of their `start_date`.
///
/// Events without a `start_date` are left out entirely.
pub fn group_by_day<I>(events: I) -> DayBuckets
where
    I: IntoIterator,
    I::Item: Borrow<Event>,
{
    let mut days: IndexMap<String, Vec<Event>> = IndexMap::new();

    for event in events {
        let event = event.borrow();
        if let Some(start_date) = &event.start_date {
            days.entry(day_key(start_date))
                .or_default()
                .push(event.clone());
        }
    }

    DayBuckets { days }
}

fn day_key(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

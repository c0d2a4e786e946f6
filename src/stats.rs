use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime, Utc};

use crate::model::{CalendarStats, Category, EventRecord};

/// Compute feed statistics against the current UTC calendar date.
pub fn stats(events: &[EventRecord]) -> CalendarStats {
    stats_at(events, Utc::now().date_naive())
}

/// Compute feed statistics against an explicit "today".
///
/// "Upcoming" is a date-only comparison: an event later today counts even
/// if its time-of-day has already passed. For the next-event pick, all-day
/// events sort as midnight and therefore come before any timed event on
/// the same date.
pub fn stats_at(events: &[EventRecord], today: NaiveDate) -> CalendarStats {
    let mut events_by_category: BTreeMap<Category, usize> = BTreeMap::new();
    for event in events {
        *events_by_category
            .entry(Category::from_icon(&event.icon))
            .or_insert(0) += 1;
    }

    let upcoming_events = events
        .iter()
        .filter(|event| event.event_date >= today)
        .count();

    let next_event = events
        .iter()
        .filter(|event| event.event_date >= today)
        .min_by_key(|event| {
            (
                event.event_date,
                event.event_time.unwrap_or(NaiveTime::MIN),
            )
        })
        .cloned();

    CalendarStats {
        total_events: events.len(),
        upcoming_events,
        events_by_category,
        next_event,
    }
}

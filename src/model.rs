use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A calendar event as delivered by the storage layer.
///
/// Records arrive already validated and normalized (non-empty title, real
/// calendar date). This crate treats them as immutable input and does not
/// re-check field constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: i64,
    pub title: String,
    pub event_date: NaiveDate,
    /// Absent means the event is all-day.
    pub event_time: Option<NaiveTime>,
    /// Symbolic tag ("work", "meeting", "birthday", ...) used to derive
    /// calendar metadata, never rendered as a literal glyph.
    pub icon: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category assigned to an event, derived from its icon tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Business,
    Meeting,
    Personal,
    Vacation,
    Education,
    Appointment,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Business,
        Category::Meeting,
        Category::Personal,
        Category::Vacation,
        Category::Education,
        Category::Appointment,
    ];

    /// Map an icon tag to its category. Total: unknown tags fall back to
    /// `Personal`, so callers never have to handle a missing mapping.
    pub fn from_icon(icon: &str) -> Self {
        match icon {
            "work" | "project" | "deadline" => Category::Business,
            "meeting" | "call" => Category::Meeting,
            "holiday" | "vacation" | "travel" => Category::Vacation,
            "school" | "education" | "study" => Category::Education,
            "doctor" | "dentist" | "appointment" => Category::Appointment,
            _ => Category::Personal,
        }
    }

    /// The CATEGORIES property text for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "BUSINESS",
            Category::Meeting => "MEETING",
            Category::Personal => "PERSONAL",
            Category::Vacation => "VACATION",
            Category::Education => "EDUCATION",
            Category::Appointment => "APPOINTMENT",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// iCalendar PRIORITY bucket, derived from an event's icon tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Normal,
    Low,
}

impl Priority {
    /// Map an icon tag to its priority. Total, like `Category::from_icon`.
    pub fn from_icon(icon: &str) -> Self {
        match icon {
            "meeting" | "doctor" | "dentist" | "deadline" => Priority::High,
            "birthday" | "holiday" | "vacation" | "sport" => Priority::Low,
            _ => Priority::Normal,
        }
    }

    /// Numeric PRIORITY value per RFC 5545 (1 = highest, 9 = lowest).
    pub fn value(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Normal => 5,
            Priority::Low => 9,
        }
    }
}

/// Aggregate statistics over an event list, for display in a UI.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarStats {
    pub total_events: usize,
    pub upcoming_events: usize,
    pub events_by_category: BTreeMap<Category, usize>,
    pub next_event: Option<EventRecord>,
}

/// Outcome of a structural check over a generated calendar document.
/// Always returned as data; an invalid-looking document is an expected,
/// inspectable result, not an exception.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

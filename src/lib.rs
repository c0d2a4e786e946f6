//! iCalendar feed generation for calendar event records.
//!
//! This crate turns a list of already-validated event records into an
//! RFC 5545 calendar document suitable for serving as a subscribable
//! `.ics` feed, plus aggregate statistics for display and a structural
//! validation report over generated documents.
//!
//! The component is pure and synchronous: no I/O, no shared mutable
//! state. Fetching event records from storage and serving the document
//! over HTTP are the embedding application's concerns.
//!
//! ```
//! use calfeed::{CalendarFeedBuilder, FeedConfig};
//!
//! let builder = CalendarFeedBuilder::new(FeedConfig::default()).unwrap();
//! let document = builder.generate(&[], "a1b2c3d4e5f6");
//! let report = calfeed::validate_calendar(&document);
//! assert!(report.is_valid);
//! ```

pub mod config;
pub mod error;
pub mod ical;
pub mod model;
pub mod stats;

pub use config::FeedConfig;
pub use error::{FeedError, FeedResult};
pub use ical::builder::{escape_text, CalendarFeedBuilder};
pub use ical::validate::validate_calendar;
pub use model::{CalendarStats, Category, EventRecord, Priority, ValidationReport};
pub use stats::{stats, stats_at};

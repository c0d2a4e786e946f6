use chrono::{DateTime, Duration, Utc};

use crate::config::FeedConfig;
use crate::error::FeedResult;
use crate::model::{Category, EventRecord, Priority};

/// Domain suffix for event UIDs. Fixed so a regenerated feed keeps the same
/// identity for every event.
const UID_DOMAIN: &str = "calfeed.app";

/// UTC timestamps in iCalendar basic format, e.g. `20240301T090000Z`.
const UTC_BASIC: &str = "%Y%m%dT%H%M%SZ";

/// Zone-local datetimes without a zone suffix, qualified via `TZID=`.
const LOCAL_BASIC: &str = "%Y%m%dT%H%M%S";

/// Builds RFC 5545 calendar documents from event records.
///
/// Pure and stateless: each call only reads its input and the fixed
/// configuration, so a single builder is safely shared across threads.
#[derive(Debug, Clone)]
pub struct CalendarFeedBuilder {
    config: FeedConfig,
}

impl CalendarFeedBuilder {
    /// Create a builder, rejecting a configuration with empty fields.
    pub fn new(config: FeedConfig) -> FeedResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Generate the feed for `user_id` stamped with the current instant.
    pub fn generate(&self, events: &[EventRecord], user_id: &str) -> String {
        self.generate_at(events, user_id, Utc::now())
    }

    /// Generate the feed with an explicit "generated at" instant. With a
    /// frozen instant the output is byte-for-byte deterministic.
    pub fn generate_at(
        &self,
        events: &[EventRecord],
        user_id: &str,
        now: DateTime<Utc>,
    ) -> String {
        tracing::debug!(
            events = events.len(),
            user = %short_identifier(user_id),
            "generating calendar feed"
        );

        let stamp = now.format(UTC_BASIC).to_string();
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", self.config.product_id),
            "CALSCALE:GREGORIAN".to_string(),
            "METHOD:PUBLISH".to_string(),
            format!(
                "X-WR-CALNAME:{} ({})",
                escape_text(&self.config.calendar_name),
                short_identifier(user_id)
            ),
            format!("X-WR-CALDESC:{}", escape_text(&self.config.description)),
            format!("X-WR-TIMEZONE:{}", self.config.timezone_id),
            "REFRESH-INTERVAL;VALUE=DURATION:PT1H".to_string(),
            "X-PUBLISHED-TTL:PT1H".to_string(),
            format!("URL:{}", self.feed_url(user_id)),
        ];

        self.push_vtimezone(&mut lines);

        // Events are emitted in input order; callers control ordering.
        for event in events {
            self.push_event(&mut lines, event, user_id, &stamp);
        }

        lines.push("END:VCALENDAR".to_string());
        lines.join("\r\n") + "\r\n"
    }

    /// Canonical URL of this user's feed.
    pub fn feed_url(&self, user_id: &str) -> String {
        format!("{}/api/calendar/{user_id}.ics", self.config.base_url())
    }

    /// The feed URL with the `webcal://` scheme, for subscribe links.
    pub fn webcal_url(&self, user_id: &str) -> String {
        let url = self.feed_url(user_id);
        let stripped = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(&url);
        format!("webcal://{stripped}")
    }

    /// Emit a rule-based VTIMEZONE for the configured zone.
    ///
    /// One EU-style transition pair (last Sunday of March / October) with a
    /// static offset lookup. Deliberately not a timezone database; adding a
    /// zone outside the lookup falls back to +0000.
    fn push_vtimezone(&self, lines: &mut Vec<String>) {
        let tz = &self.config.timezone_id;
        lines.push("BEGIN:VTIMEZONE".to_string());
        lines.push(format!("TZID:{tz}"));
        lines.push("BEGIN:DAYLIGHT".to_string());
        lines.push("DTSTART:19700329T020000".to_string());
        lines.push("RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU".to_string());
        lines.push(format!("TZOFFSETFROM:{}", tz_std_offset(tz)));
        lines.push(format!("TZOFFSETTO:{}", tz_dst_offset(tz)));
        lines.push("END:DAYLIGHT".to_string());
        lines.push("BEGIN:STANDARD".to_string());
        lines.push("DTSTART:19701025T030000".to_string());
        lines.push("RRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU".to_string());
        lines.push(format!("TZOFFSETFROM:{}", tz_dst_offset(tz)));
        lines.push(format!("TZOFFSETTO:{}", tz_std_offset(tz)));
        lines.push("END:STANDARD".to_string());
        lines.push("END:VTIMEZONE".to_string());
    }

    fn push_event(
        &self,
        lines: &mut Vec<String>,
        event: &EventRecord,
        user_id: &str,
        stamp: &str,
    ) {
        let tz = &self.config.timezone_id;

        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}-{user_id}@{UID_DOMAIN}", event.id));
        lines.push(format!("DTSTAMP:{stamp}"));
        lines.push(format!("CREATED:{}", event.created_at.format(UTC_BASIC)));
        lines.push(format!(
            "LAST-MODIFIED:{}",
            event.updated_at.format(UTC_BASIC)
        ));

        match event.event_time {
            Some(time) => {
                // Timed events get a synthesized 1-hour duration.
                let start = event.event_date.and_time(time);
                let end = start + Duration::hours(1);
                lines.push(format!("DTSTART;TZID={tz}:{}", start.format(LOCAL_BASIC)));
                lines.push(format!("DTEND;TZID={tz}:{}", end.format(LOCAL_BASIC)));
            }
            None => {
                // All-day: exclusive end, one calendar day after the start.
                let end = event.event_date + Duration::days(1);
                lines.push(format!(
                    "DTSTART;VALUE=DATE:{}",
                    event.event_date.format("%Y%m%d")
                ));
                lines.push(format!("DTEND;VALUE=DATE:{}", end.format("%Y%m%d")));
            }
        }

        lines.push(format!("SUMMARY:{}", escape_text(&event.title)));
        if let Some(ref description) = event.description {
            lines.push(format!("DESCRIPTION:{}", escape_text(description)));
        }
        lines.push(format!("CATEGORIES:{}", Category::from_icon(&event.icon)));
        lines.push(format!(
            "PRIORITY:{}",
            Priority::from_icon(&event.icon).value()
        ));
        lines.push("STATUS:CONFIRMED".to_string());
        lines.push("TRANSP:OPAQUE".to_string());
        lines.push("CLASS:PRIVATE".to_string());
        lines.push("SEQUENCE:0".to_string());
        lines.push(format!("URL:{}/?user={user_id}", self.config.base_url()));
        lines.push(format!("X-CALFEED-ICON:{}", escape_text(&event.icon)));
        lines.push(format!("X-CALFEED-EVENT-ID:{}", event.id));
        lines.push("END:VEVENT".to_string());
    }
}

/// Escape a text value for insertion into an iCalendar property.
///
/// Backslashes are escaped first; any other order would double-escape the
/// backslashes introduced by the later replacements. Carriage returns are
/// stripped and the result is truncated to 1000 characters.
pub fn escape_text(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\r', "")
        .replace('\n', "\\n");
    escaped.chars().take(1000).collect()
}

/// Short prefix of the user identifier, for human recognition in the
/// calendar display name and logs. Never used for authorization.
fn short_identifier(user_id: &str) -> String {
    user_id.chars().take(8).collect()
}

/// Standard (winter) UTC offset for a timezone.
fn tz_std_offset(tz: &str) -> &'static str {
    match tz {
        "Europe/London" | "Europe/Lisbon" | "Europe/Dublin" => "+0000",
        "Europe/Berlin" | "Europe/Paris" | "Europe/Rome" | "Europe/Madrid"
        | "Europe/Vienna" | "Europe/Amsterdam" => "+0100",
        "Europe/Helsinki" | "Europe/Athens" | "Europe/Bucharest" => "+0200",
        _ => "+0000",
    }
}

/// Daylight-saving (summer) UTC offset for a timezone.
fn tz_dst_offset(tz: &str) -> &'static str {
    match tz {
        "Europe/London" | "Europe/Lisbon" | "Europe/Dublin" => "+0100",
        "Europe/Berlin" | "Europe/Paris" | "Europe/Rome" | "Europe/Madrid"
        | "Europe/Vienna" | "Europe/Amsterdam" => "+0200",
        "Europe/Helsinki" | "Europe/Athens" | "Europe/Bucharest" => "+0300",
        _ => "+0000",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

    use super::*;
    use crate::model::EventRecord;

    fn builder() -> CalendarFeedBuilder {
        CalendarFeedBuilder::new(FeedConfig::default()).unwrap()
    }

    fn record(id: i64, title: &str, date: NaiveDate, time: Option<NaiveTime>) -> EventRecord {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 0).unwrap();
        EventRecord {
            id,
            title: title.to_string(),
            event_date: date,
            event_time: time,
            icon: "work".to_string(),
            description: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn frozen_now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_envelope_fields() {
        let ical = builder().generate_at(&[], "abcdef1234567890", frozen_now());

        assert!(ical.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ical.ends_with("END:VCALENDAR\r\n"));
        assert!(ical.contains("VERSION:2.0"));
        assert!(ical.contains("PRODID:-//Calfeed//Calendar Feed//EN"));
        assert!(ical.contains("CALSCALE:GREGORIAN"));
        assert!(ical.contains("METHOD:PUBLISH"));
        assert!(ical.contains("REFRESH-INTERVAL;VALUE=DURATION:PT1H"));
        assert!(ical.contains("URL:https://calfeed.app/api/calendar/abcdef1234567890.ics"));
    }

    #[test]
    fn test_calname_embeds_short_identifier_only() {
        let ical = builder().generate_at(&[], "abcdef1234567890", frozen_now());
        assert!(ical.contains("X-WR-CALNAME:Calfeed Calendar (abcdef12)"));
        // The full identifier appears in URLs, never in the display name.
        assert!(!ical.contains("X-WR-CALNAME:Calfeed Calendar (abcdef1234567890)"));
    }

    #[test]
    fn test_vtimezone_berlin_rules() {
        let ical = builder().generate_at(&[], "u1", frozen_now());
        assert!(ical.contains("BEGIN:VTIMEZONE"));
        assert!(ical.contains("TZID:Europe/Berlin"));
        assert!(ical.contains("RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU"));
        assert!(ical.contains("RRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU"));
        assert!(ical.contains("TZOFFSETFROM:+0100"));
        assert!(ical.contains("TZOFFSETTO:+0200"));
    }

    #[test]
    fn test_vtimezone_unknown_zone_falls_back() {
        let config = FeedConfig {
            timezone_id: "Pacific/Fake".to_string(),
            ..FeedConfig::default()
        };
        let ical = CalendarFeedBuilder::new(config)
            .unwrap()
            .generate_at(&[], "u1", frozen_now());
        assert!(ical.contains("TZID:Pacific/Fake"));
        assert!(ical.contains("TZOFFSETFROM:+0000"));
    }

    #[test]
    fn test_timed_event_one_hour_duration() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        let ical = builder().generate_at(&[record(7, "Standup", date, Some(time))], "u1", frozen_now());

        assert!(ical.contains("DTSTART;TZID=Europe/Berlin:20240310T093000"));
        assert!(ical.contains("DTEND;TZID=Europe/Berlin:20240310T103000"));
    }

    #[test]
    fn test_all_day_event_exclusive_end() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let ical = builder().generate_at(&[record(8, "Offsite", date, None)], "u1", frozen_now());

        assert!(ical.contains("DTSTART;VALUE=DATE:20240310"));
        assert!(ical.contains("DTEND;VALUE=DATE:20240311"));
        assert!(!ical.contains("DTSTART;TZID="));
    }

    #[test]
    fn test_uid_is_deterministic() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let events = [record(42, "Review", date, None)];
        let a = builder().generate_at(&events, "u1", frozen_now());
        let b = builder().generate_at(&events, "u1", frozen_now());

        assert!(a.contains("UID:42-u1@calfeed.app"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_event_metadata_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let mut event = record(9, "Checkup", date, None);
        event.icon = "doctor".to_string();
        event.description = Some("Bring referral".to_string());
        let ical = builder().generate_at(&[event], "u1", frozen_now());

        assert!(ical.contains("CATEGORIES:APPOINTMENT"));
        assert!(ical.contains("PRIORITY:1"));
        assert!(ical.contains("STATUS:CONFIRMED"));
        assert!(ical.contains("TRANSP:OPAQUE"));
        assert!(ical.contains("CLASS:PRIVATE"));
        assert!(ical.contains("SEQUENCE:0"));
        assert!(ical.contains("DESCRIPTION:Bring referral"));
        assert!(ical.contains("URL:https://calfeed.app/?user=u1"));
        assert!(ical.contains("X-CALFEED-ICON:doctor"));
        assert!(ical.contains("X-CALFEED-EVENT-ID:9"));
        assert!(ical.contains("CREATED:20240115T123000Z"));
        assert!(ical.contains("LAST-MODIFIED:20240115T123000Z"));
    }

    #[test]
    fn test_escape_text_order() {
        assert_eq!(escape_text("a,b;c\\d\ne"), "a\\,b\\;c\\\\d\\ne");
        // Backslash-first: the semicolon escape's backslash survives as-is.
        assert_eq!(escape_text("\\;"), "\\\\\\;");
    }

    #[test]
    fn test_escape_text_strips_cr_and_truncates() {
        assert_eq!(escape_text("line\r\nnext"), "line\\nnext");
        let long = "x".repeat(2000);
        assert_eq!(escape_text(&long).chars().count(), 1000);
    }

    #[test]
    fn test_webcal_url() {
        assert_eq!(
            builder().webcal_url("u1"),
            "webcal://calfeed.app/api/calendar/u1.ics"
        );
    }

    #[test]
    fn test_output_uses_crlf() {
        let ical = builder().generate_at(&[], "u1", frozen_now());
        assert!(ical.ends_with("\r\n"));
        assert!(!ical.replace("\r\n", "").contains('\n'));
    }
}

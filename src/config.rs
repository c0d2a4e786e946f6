use crate::error::{FeedError, FeedResult};

/// Feed configuration with sensible defaults.
///
/// Every field is required to be non-empty; `CalendarFeedBuilder::new`
/// rejects a bad configuration up front rather than emitting a broken
/// document later.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// PRODID vendor string.
    pub product_id: String,
    /// Display name embedded in X-WR-CALNAME.
    pub calendar_name: String,
    /// Calendar description embedded in X-WR-CALDESC.
    pub description: String,
    /// IANA timezone name used for timed events and the VTIMEZONE block.
    pub timezone_id: String,
    /// Base URL of the web application, used for back-links and the
    /// feed's own canonical URL.
    pub publish_url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            product_id: "-//Calfeed//Calendar Feed//EN".to_string(),
            calendar_name: "Calfeed Calendar".to_string(),
            description: "Personal events, subscribable from any calendar client".to_string(),
            timezone_id: "Europe/Berlin".to_string(),
            publish_url: "https://calfeed.app".to_string(),
        }
    }
}

impl FeedConfig {
    pub(crate) fn validate(&self) -> FeedResult<()> {
        let fields = [
            ("product_id", &self.product_id),
            ("calendar_name", &self.calendar_name),
            ("description", &self.description),
            ("timezone_id", &self.timezone_id),
            ("publish_url", &self.publish_url),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(FeedError::Config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }

    /// Publish URL without a trailing slash, for joining paths onto.
    pub(crate) fn base_url(&self) -> &str {
        self.publish_url.trim_end_matches('/')
    }
}

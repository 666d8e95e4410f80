use chrono::{DateTime, SecondsFormat};
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;

/// Simplified calendar event representation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub start_date_time: Option<String>,
    pub end_date_time: Option<String>,
    /// Link to the event in the Google Calendar UI
    pub html_link: Option<String>,
}

impl CalendarEvent {
    /// Convert an event resource returned by the Calendar API
    pub fn from_json(event: &Value) -> Self {
        let text = |key: &str| event.get(key).and_then(|v| v.as_str()).map(|s| s.to_string());
        let nested = |outer: &str, inner: &str| {
            event
                .get(outer)
                .and_then(|o| o.as_object())
                .and_then(|o| o.get(inner))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        CalendarEvent {
            id: text("id").unwrap_or_default(),
            summary: text("summary"),
            start_date_time: nested("start", "dateTime"),
            end_date_time: nested("end", "dateTime"),
            html_link: text("htmlLink"),
        }
    }
}

/// Half-open interval `[start, end)` used for event list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self { start, end }
    }

    /// Whether `[start, end)` of an event intersects this window
    pub fn overlaps<A: chrono::TimeZone, B: chrono::TimeZone>(
        &self,
        start: &DateTime<A>,
        end: &DateTime<B>,
    ) -> bool {
        *start < self.end && *end > self.start
    }
}

/// Format an instant the way the Calendar API expects it
pub fn to_rfc3339(instant: &DateTime<Tz>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Start or end of an event with explicit zone
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

impl EventDateTime {
    pub fn from_instant(instant: &DateTime<Tz>) -> Self {
        Self {
            date_time: to_rfc3339(instant),
            time_zone: instant.timezone().name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attendee {
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Email,
    Popup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderOverride {
    pub method: ReminderMethod,
    /// Minutes before the event start
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

/// Body of an `events.insert` request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPayload {
    pub summary: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub attendees: Vec<Attendee>,
    pub reminders: Reminders,
}

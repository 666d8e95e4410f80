use crate::components::google_calendar::TimeWindow;
use crate::error::{validation_error, BookingResult};
use chrono::DateTime;
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]{2,}$").expect("email pattern is valid");
}

/// Booking request as sent by the chat bot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRequest {
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM, 24-hour
    pub time: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AppointmentRequest {
    /// Check the contact fields; date and time are checked during normalization
    pub fn validate(&self, locale: &str) -> BookingResult<()> {
        if self.name.trim().is_empty() {
            return Err(validation_error(&t!("validation.missing_name", locale = locale)));
        }
        if !EMAIL_PATTERN.is_match(self.email.trim()) {
            return Err(validation_error(&t!(
                "validation.invalid_email",
                locale = locale,
                value = self.email.as_str()
            )));
        }
        Ok(())
    }
}

/// Reason a slot cannot be booked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    OutsideBusinessHours,
    NotAWorkday,
    SlotTaken,
}

/// Outcome of an availability check
#[derive(Debug, Clone, PartialEq)]
pub struct Availability {
    pub available: bool,
    pub message: String,
    /// Set when the slot is free
    pub slot: Option<TimeWindow>,
    /// Set when the slot is not free
    pub reason: Option<UnavailableReason>,
}

/// A booking accepted by the remote calendar
#[derive(Debug, Clone, PartialEq)]
pub struct BookedAppointment {
    /// Remote event id, needed for cancellation
    pub id: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub html_link: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedAppointment {
    pub deleted: bool,
    pub id: String,
}

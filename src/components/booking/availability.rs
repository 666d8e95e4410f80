use super::models::{Availability, UnavailableReason};
use super::policy::{check_policy, padded_window, slot_window, PolicyViolation};
use crate::components::google_calendar::CalendarApi;
use crate::error::BookingResult;
use chrono::DateTime;
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, info};

/// Decides whether a normalized start time can be booked
#[derive(Clone)]
pub struct AvailabilityChecker {
    calendar: Arc<dyn CalendarApi>,
    locale: String,
}

impl AvailabilityChecker {
    pub fn new(calendar: Arc<dyn CalendarApi>, locale: &str) -> Self {
        Self {
            calendar,
            locale: locale.to_string(),
        }
    }

    /// Apply the booking policy, then look for events in the padded window.
    /// Policy rejections never reach the calendar.
    pub async fn check(&self, start: DateTime<Tz>) -> BookingResult<Availability> {
        info!("Checking availability for {} ({})", start, start.format("%A"));

        if let Err(violation) = check_policy(&start) {
            debug!("{} rejected by policy: {:?}", start, violation);
            let reason = match violation {
                PolicyViolation::OutsideBusinessHours => UnavailableReason::OutsideBusinessHours,
                PolicyViolation::NotAWorkday => UnavailableReason::NotAWorkday,
            };
            return Ok(self.unavailable(reason));
        }

        let slot = slot_window(start);
        let padded = padded_window(&slot);
        let events = self.calendar.list_events(&padded).await?;

        if !events.is_empty() {
            let first = &events[0];
            debug!(
                "{} conflicts with {} event(s), first: {} '{}' at {}",
                start,
                events.len(),
                first.id,
                first.summary.as_deref().unwrap_or("(no title)"),
                first.start_date_time.as_deref().unwrap_or("all day")
            );
            return Ok(self.unavailable(UnavailableReason::SlotTaken));
        }

        Ok(Availability {
            available: true,
            message: t!("availability.slot_available", locale = self.locale.as_str()).to_string(),
            slot: Some(slot),
            reason: None,
        })
    }

    fn unavailable(&self, reason: UnavailableReason) -> Availability {
        let locale = self.locale.as_str();
        let message = match reason {
            UnavailableReason::OutsideBusinessHours => {
                t!("availability.outside_business_hours", locale = locale)
            }
            UnavailableReason::NotAWorkday => t!("availability.not_a_workday", locale = locale),
            UnavailableReason::SlotTaken => t!("availability.slot_taken", locale = locale),
        };

        Availability {
            available: false,
            message: message.to_string(),
            slot: None,
            reason: Some(reason),
        }
    }
}

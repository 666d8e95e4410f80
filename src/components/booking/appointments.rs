use super::availability::AvailabilityChecker;
use super::models::{AppointmentRequest, BookedAppointment, DeletedAppointment};
use super::policy::{EMAIL_REMINDER_MINUTES, POPUP_REMINDER_MINUTES};
use crate::components::google_calendar::models::{
    Attendee, EventDateTime, ReminderMethod, ReminderOverride, Reminders,
};
use crate::components::google_calendar::{CalendarApi, EventPayload, TimeWindow};
use crate::error::{conflict_error, validation_error, BookingResult};
use chrono::DateTime;
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{info, warn};

/// Writes bookings and cancellations to the remote calendar.
///
/// Availability is checked and the event inserted in two separate remote
/// calls; two concurrent bookings of overlapping slots can both pass the
/// check.
#[derive(Clone)]
pub struct AppointmentWriter {
    calendar: Arc<dyn CalendarApi>,
    checker: AvailabilityChecker,
    locale: String,
}

impl AppointmentWriter {
    pub fn new(calendar: Arc<dyn CalendarApi>, checker: AvailabilityChecker, locale: &str) -> Self {
        Self {
            calendar,
            checker,
            locale: locale.to_string(),
        }
    }

    /// Book `request` at the already normalized `start`
    pub async fn create(
        &self,
        start: DateTime<Tz>,
        request: &AppointmentRequest,
    ) -> BookingResult<BookedAppointment> {
        let availability = self.checker.check(start).await?;
        let slot = match availability.slot {
            Some(slot) if availability.available => slot,
            _ => {
                warn!("Refusing booking at {}: {}", start, availability.message);
                return Err(conflict_error(&availability.message));
            }
        };

        let payload = self.build_payload(&slot, request);
        let event = self.calendar.insert_event(&payload).await?;

        info!("Booked appointment {} for {} at {}", event.id, request.name, slot.start);

        Ok(BookedAppointment {
            id: event.id,
            start: slot.start,
            end: slot.end,
            html_link: event.html_link,
            message: t!("appointment.created", locale = self.locale.as_str()).to_string(),
        })
    }

    /// Event body for a booking. Missing optional fields are spelled out.
    pub fn build_payload(&self, slot: &TimeWindow, request: &AppointmentRequest) -> EventPayload {
        let locale = self.locale.as_str();
        let not_provided = t!("appointment.not_provided", locale = locale);
        let provided = |field: &Option<String>| {
            field
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| not_provided.to_string())
        };

        let name = request.name.trim();
        let email = request.email.trim();

        EventPayload {
            summary: t!("appointment.summary", locale = locale, name = name).to_string(),
            description: t!(
                "appointment.description",
                locale = locale,
                name = name,
                email = email,
                phone = provided(&request.phone),
                notes = provided(&request.notes)
            )
            .to_string(),
            start: EventDateTime::from_instant(&slot.start),
            end: EventDateTime::from_instant(&slot.end),
            attendees: vec![Attendee {
                email: email.to_string(),
            }],
            reminders: Reminders {
                use_default: false,
                overrides: vec![
                    ReminderOverride {
                        method: ReminderMethod::Email,
                        minutes: EMAIL_REMINDER_MINUTES,
                    },
                    ReminderOverride {
                        method: ReminderMethod::Popup,
                        minutes: POPUP_REMINDER_MINUTES,
                    },
                ],
            },
        }
    }

    /// Cancel by remote id; the remote service decides whether the id exists
    pub async fn delete(&self, event_id: &str) -> BookingResult<DeletedAppointment> {
        if event_id.is_empty() {
            return Err(validation_error(&t!(
                "validation.missing_id",
                locale = self.locale.as_str()
            )));
        }

        self.calendar.delete_event(event_id).await?;
        info!("Cancelled appointment {}", event_id);

        Ok(DeletedAppointment {
            deleted: true,
            id: event_id.to_string(),
        })
    }
}

use super::appointments::AppointmentWriter;
use super::availability::AvailabilityChecker;
use super::models::{
    AppointmentRequest, Availability, BookedAppointment, DeletedAppointment,
};
use super::time::{normalize, Clock, SystemClock};
use crate::components::google_calendar::CalendarApi;
use crate::config::Config;
use crate::error::BookingResult;
use chrono::DateTime;
use chrono_tz::Tz;
use std::sync::Arc;

/// Entry point for availability checks, bookings and cancellations
#[derive(Clone)]
pub struct BookingHandle {
    timezone: Tz,
    locale: String,
    clock: Arc<dyn Clock>,
    checker: AvailabilityChecker,
    writer: AppointmentWriter,
}

impl BookingHandle {
    /// Create a handle that reads the host clock
    pub fn new(config: &Config, calendar: Arc<dyn CalendarApi>) -> Self {
        Self::with_clock(config, calendar, Arc::new(SystemClock))
    }

    /// Create a handle with an explicit clock
    pub fn with_clock(
        config: &Config,
        calendar: Arc<dyn CalendarApi>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let locale = config.bot_locale.as_str();
        let checker = AvailabilityChecker::new(Arc::clone(&calendar), locale);
        let writer = AppointmentWriter::new(calendar, checker.clone(), locale);

        Self {
            timezone: config.timezone,
            locale: locale.to_string(),
            clock,
            checker,
            writer,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Resolve a client date/time to a bookable instant in the configured zone
    pub fn normalize(&self, date: &str, time: &str) -> BookingResult<DateTime<Tz>> {
        normalize(date, time, self.timezone, self.clock.now(), &self.locale)
    }

    pub async fn check_availability(
        &self,
        date: &str,
        time: &str,
    ) -> BookingResult<Availability> {
        let start = self.normalize(date, time)?;
        self.checker.check(start).await
    }

    pub async fn create_appointment(
        &self,
        request: &AppointmentRequest,
    ) -> BookingResult<BookedAppointment> {
        request.validate(&self.locale)?;
        let start = self.normalize(&request.date, &request.time)?;
        self.writer.create(start, request).await
    }

    pub async fn delete_appointment(
        &self,
        event_id: &str,
    ) -> BookingResult<DeletedAppointment> {
        self.writer.delete(event_id).await
    }
}

use crate::components::google_calendar::TimeWindow;
use chrono::{DateTime, Datelike, Duration, Timelike, Weekday};
use chrono_tz::Tz;

/// First bookable hour (inclusive)
pub const OPENING_HOUR: u32 = 9;
/// Closing hour (exclusive for start times)
pub const CLOSING_HOUR: u32 = 17;
pub const APPOINTMENT_MINUTES: i64 = 60;
/// Free time required before and after every appointment
pub const BUFFER_MINUTES: i64 = 30;
pub const EMAIL_REMINDER_MINUTES: u32 = 24 * 60;
pub const POPUP_REMINDER_MINUTES: u32 = 30;

/// Why a start time is rejected before the calendar is consulted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyViolation {
    OutsideBusinessHours,
    NotAWorkday,
}

pub fn within_business_hours(start: &DateTime<Tz>) -> bool {
    (OPENING_HOUR..CLOSING_HOUR).contains(&start.hour())
}

pub fn is_workday(start: &DateTime<Tz>) -> bool {
    !matches!(start.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Business hours first, then the weekday
pub fn check_policy(start: &DateTime<Tz>) -> Result<(), PolicyViolation> {
    if !within_business_hours(start) {
        return Err(PolicyViolation::OutsideBusinessHours);
    }
    if !is_workday(start) {
        return Err(PolicyViolation::NotAWorkday);
    }
    Ok(())
}

/// The appointment itself
pub fn slot_window(start: DateTime<Tz>) -> TimeWindow {
    TimeWindow::new(start, start + Duration::minutes(APPOINTMENT_MINUTES))
}

/// The slot widened by the buffer on both sides
pub fn padded_window(slot: &TimeWindow) -> TimeWindow {
    let buffer = Duration::minutes(BUFFER_MINUTES);
    TimeWindow::new(slot.start - buffer, slot.end + buffer)
}

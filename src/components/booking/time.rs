use crate::error::{validation_error, BookingResult};
use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock of the host
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Parse date string in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    if date_str.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<NaiveTime> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 || parts.iter().any(|p| p.len() != 2) {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Attach `tz` to a wall-clock time. Folds resolve to the earlier instant,
/// gaps yield `None`.
pub fn localize(tz: Tz, naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => None,
    }
}

/// Turn a client date/time pair into an instant in `tz` that is not before `now`.
///
/// A past request keeps its time-of-day and moves to the first later date on
/// which that wall-clock time is not before `now`, so "today 10:00" asked at
/// 11:00 becomes "tomorrow 10:00".
pub fn normalize(
    date_str: &str,
    time_str: &str,
    tz: Tz,
    now: DateTime<Utc>,
    locale: &str,
) -> BookingResult<DateTime<Tz>> {
    let date = parse_date(date_str).ok_or_else(|| {
        validation_error(&t!("validation.invalid_date", locale = locale, value = date_str))
    })?;
    let time = parse_time(time_str).ok_or_else(|| {
        validation_error(&t!("validation.invalid_time", locale = locale, value = time_str))
    })?;

    let now = now.with_timezone(&tz);
    let today = now.date_naive();
    match localize(tz, &date.and_time(time)) {
        Some(requested) if requested >= now => return Ok(requested),
        Some(_) => {}
        // A gap on a past date is rolled over like any other stale request
        None if date < today => {}
        None => {
            return Err(validation_error(&t!(
                "validation.nonexistent_time",
                locale = locale,
                date = date_str,
                time = time_str
            )))
        }
    }

    // Every date before today is entirely in the past
    let mut day = date.max(today);
    loop {
        if let Some(candidate) = localize(tz, &day.and_time(time)) {
            if candidate >= now {
                return Ok(candidate);
            }
        }
        day = day.succ_opt().ok_or_else(|| {
            validation_error(&t!("validation.invalid_date", locale = locale, value = date_str))
        })?;
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Europe::Berlin;
use chrono_tz::Tz;
use reqwest::StatusCode;
use solar_calendar::components::booking::{BookingHandle, Clock};
use solar_calendar::components::google_calendar::models::to_rfc3339;
use solar_calendar::components::google_calendar::{
    CalendarApi, CalendarEvent, EventPayload, TimeWindow,
};
use solar_calendar::config::Config;
use solar_calendar::error::{google_calendar_error, google_status_error, BookingResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const API_KEY: &str = "test-api-key";

/// Clock frozen at a single instant
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn berlin(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
    Berlin.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Test configuration; `overrides` replace or add variables
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("API_KEY", API_KEY),
        ("GOOGLE_CLIENT_ID", "test_client_id"),
        ("GOOGLE_CLIENT_SECRET", "test_client_secret"),
        ("GOOGLE_REFRESH_TOKEN", "test_refresh_token"),
        ("GOOGLE_CALENDAR_ID", "primary"),
        ("TIMEZONE", "Europe/Berlin"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// Failure the fake should return for every call
#[derive(Debug, Clone, Copy)]
pub enum FakeFailure {
    Transport,
    Status(StatusCode),
}

/// In-memory stand-in for the Google Calendar API that records every call
#[derive(Default)]
pub struct FakeCalendar {
    events: Mutex<Vec<(DateTime<Tz>, DateTime<Tz>, CalendarEvent)>>,
    pub list_calls: Mutex<Vec<TimeWindow>>,
    pub inserted: Mutex<Vec<EventPayload>>,
    pub deleted: Mutex<Vec<String>>,
    failure: Mutex<Option<FakeFailure>>,
}

impl FakeCalendar {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed an existing booking
    pub fn add_event(&self, id: &str, start: DateTime<Tz>, end: DateTime<Tz>) {
        let event = CalendarEvent {
            id: id.to_string(),
            summary: Some(format!("Existing {}", id)),
            start_date_time: Some(to_rfc3339(&start)),
            end_date_time: Some(to_rfc3339(&end)),
            ..Default::default()
        };
        self.events.lock().unwrap().push((start, end, event));
    }

    pub fn fail_with(&self, failure: FakeFailure) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }

    pub fn insert_count(&self) -> usize {
        self.inserted.lock().unwrap().len()
    }

    fn check_failure(&self) -> BookingResult<()> {
        match *self.failure.lock().unwrap() {
            None => Ok(()),
            Some(FakeFailure::Transport) => Err(google_calendar_error("connection reset by peer")),
            Some(FakeFailure::Status(status)) => Err(google_status_error(status, "remote said no")),
        }
    }
}

#[async_trait]
impl CalendarApi for FakeCalendar {
    async fn list_events(&self, window: &TimeWindow) -> BookingResult<Vec<CalendarEvent>> {
        self.list_calls.lock().unwrap().push(*window);
        self.check_failure()?;

        let mut matching: Vec<_> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|(start, end, _)| window.overlaps(start, end))
            .cloned()
            .collect();
        matching.sort_by_key(|(start, _, _)| *start);
        Ok(matching.into_iter().map(|(_, _, event)| event).collect())
    }

    async fn insert_event(&self, payload: &EventPayload) -> BookingResult<CalendarEvent> {
        self.check_failure()?;
        let mut inserted = self.inserted.lock().unwrap();
        inserted.push(payload.clone());
        let id = format!("evt{}", inserted.len());
        Ok(CalendarEvent {
            html_link: Some(format!("https://calendar.google.com/event?eid={}", id)),
            id,
            summary: Some(payload.summary.clone()),
            start_date_time: Some(payload.start.date_time.clone()),
            end_date_time: Some(payload.end.date_time.clone()),
            ..Default::default()
        })
    }

    async fn delete_event(&self, event_id: &str) -> BookingResult<()> {
        self.check_failure()?;
        self.deleted.lock().unwrap().push(event_id.to_string());
        Ok(())
    }
}

/// Booking handle over `calendar` with the clock frozen at `now`
pub fn booking_at(
    calendar: Arc<FakeCalendar>,
    now: DateTime<Tz>,
    config: &Config,
) -> BookingHandle {
    BookingHandle::with_clock(
        config,
        calendar as Arc<dyn CalendarApi>,
        Arc::new(FixedClock(now.with_timezone(&Utc))),
    )
}

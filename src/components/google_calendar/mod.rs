mod client;
pub mod models;
pub mod token;

pub use client::GoogleCalendarClient;
pub use models::{CalendarEvent, EventPayload, TimeWindow};

use crate::error::BookingResult;
use async_trait::async_trait;

/// The remote calendar operations the booking logic relies on
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Events intersecting `window`, recurring instances expanded, ordered by start time
    async fn list_events(&self, window: &TimeWindow) -> BookingResult<Vec<CalendarEvent>>;

    /// Create an event and notify its attendees
    async fn insert_event(&self, payload: &EventPayload) -> BookingResult<CalendarEvent>;

    /// Delete an event by id and notify its attendees
    async fn delete_event(&self, event_id: &str) -> BookingResult<()>;
}

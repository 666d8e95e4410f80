use super::models::{to_rfc3339, CalendarEvent, EventPayload, TimeWindow};
use super::token::TokenManager;
use super::CalendarApi;
use crate::config::Config;
use crate::error::{google_calendar_error, google_status_error, BookingResult, Error};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Google Calendar v3 REST client for a single calendar
#[derive(Clone)]
pub struct GoogleCalendarClient {
    config: Arc<Config>,
    token_manager: TokenManager,
    client: Client,
}

impl GoogleCalendarClient {
    /// Create a client whose requests are bounded by the configured timeout
    pub fn new(config: Arc<Config>) -> BookingResult<Self> {
        let client = Client::builder()
            .timeout(config.google_api_timeout)
            .build()
            .map_err(|e| google_calendar_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            token_manager: TokenManager::new(Arc::clone(&config), client.clone()),
            config,
            client,
        })
    }

    /// `.../calendars/{calendarId}/events[/{eventId}]` with each segment escaped
    fn events_url(&self, event_id: Option<&str>) -> BookingResult<Url> {
        let mut url = Url::parse(&self.config.google_calendar_api_base)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| google_calendar_error("Calendar API base URL cannot be a base"))?;
            segments
                .pop_if_empty()
                .push("calendars")
                .push(&self.config.google_calendar_id)
                .push("events");
            if let Some(id) = event_id {
                segments.push(id);
            }
        }

        Ok(url)
    }

    /// Attach the bearer token and send
    async fn send(&self, request: RequestBuilder, action: &str) -> BookingResult<Response> {
        let access_token = self.token_manager.access_token().await?;

        let response = request
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Error::GoogleCalendar {
                status: e.status(),
                message: format!("Failed to {}: {}", action, e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_status_error(
                status,
                &format!("Failed to {}: {}", action, error_body),
            ));
        }

        Ok(response)
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn list_events(&self, window: &TimeWindow) -> BookingResult<Vec<CalendarEvent>> {
        let mut url = self.events_url(None)?;
        url.query_pairs_mut()
            .append_pair("timeMin", &to_rfc3339(&window.start))
            .append_pair("timeMax", &to_rfc3339(&window.end))
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        debug!("Listing events between {} and {}", window.start, window.end);
        let response = self.send(self.client.get(url), "fetch events").await?;

        let response_data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| {
                google_calendar_error(&format!("Failed to parse events response: {}", e))
            })?;

        // An empty calendar may omit `items` entirely
        let events = match response_data.get("items") {
            None => Vec::new(),
            Some(items) => items
                .as_array()
                .ok_or_else(|| google_calendar_error("Malformed items in events response"))?
                .iter()
                .map(CalendarEvent::from_json)
                .collect(),
        };

        Ok(events)
    }

    async fn insert_event(&self, payload: &EventPayload) -> BookingResult<CalendarEvent> {
        let mut url = self.events_url(None)?;
        url.query_pairs_mut().append_pair("sendUpdates", "all");

        let response = self
            .send(self.client.post(url).json(payload), "insert event")
            .await?;

        let created: serde_json::Value = response
            .json()
            .await
            .map_err(|e| {
                google_calendar_error(&format!("Failed to parse insert response: {}", e))
            })?;

        let event = CalendarEvent::from_json(&created);
        if event.id.is_empty() {
            return Err(google_calendar_error("Insert response did not contain an event id"));
        }

        info!("Created calendar event {}", event.id);
        Ok(event)
    }

    async fn delete_event(&self, event_id: &str) -> BookingResult<()> {
        let mut url = self.events_url(Some(event_id))?;
        url.query_pairs_mut().append_pair("sendUpdates", "all");

        self.send(self.client.delete(url), "delete event").await?;

        info!("Deleted calendar event {}", event_id);
        Ok(())
    }
}

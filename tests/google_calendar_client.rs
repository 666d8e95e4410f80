mod common;

use common::{berlin, test_config};
use serde_json::json;
use solar_calendar::components::google_calendar::models::{
    Attendee, EventDateTime, ReminderMethod, ReminderOverride, Reminders,
};
use solar_calendar::components::google_calendar::{
    CalendarApi, EventPayload, GoogleCalendarClient, TimeWindow,
};
use solar_calendar::error::Error;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{
    body_partial_json, body_string_contains, header, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer, extra: &[(&str, &str)]) -> GoogleCalendarClient {
    let token_uri = format!("{}/token", server.uri());
    let mut vars = vec![
        ("GOOGLE_CALENDAR_API_BASE", server.uri()),
        ("GOOGLE_TOKEN_URI", token_uri),
    ];
    vars.extend(extra.iter().map(|(k, v)| (*k, v.to_string())));
    let vars: Vec<(&str, &str)> = vars.iter().map(|(k, v)| (*k, v.as_str())).collect();
    GoogleCalendarClient::new(Arc::new(test_config(&vars))).unwrap()
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=test_refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn window() -> TimeWindow {
    TimeWindow::new(berlin(2024, 12, 10, 9, 30), berlin(2024, 12, 10, 11, 30))
}

fn payload() -> EventPayload {
    let start = berlin(2024, 12, 10, 10, 0);
    let end = berlin(2024, 12, 10, 11, 0);
    EventPayload {
        summary: "Appointment: Anna".to_string(),
        description: "Name: Anna".to_string(),
        start: EventDateTime::from_instant(&start),
        end: EventDateTime::from_instant(&end),
        attendees: vec![Attendee {
            email: "anna@example.com".to_string(),
        }],
        reminders: Reminders {
            use_default: false,
            overrides: vec![ReminderOverride {
                method: ReminderMethod::Popup,
                minutes: 30,
            }],
        },
    }
}

#[tokio::test]
async fn list_events_sends_window_and_parses_items() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .and(header("authorization", "Bearer access-1"))
        .and(query_param("timeMin", "2024-12-10T09:30:00+01:00"))
        .and(query_param("timeMax", "2024-12-10T11:30:00+01:00"))
        .and(query_param("singleEvents", "true"))
        .and(query_param("orderBy", "startTime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "existing",
                "summary": "Site visit",
                "htmlLink": "https://calendar.google.com/event?eid=existing",
                "start": { "dateTime": "2024-12-10T09:00:00+01:00" },
                "end": { "dateTime": "2024-12-10T09:45:00+01:00" }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &[]).await;
    let events = client.list_events(&window()).await.unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "existing");
    assert_eq!(events[0].summary.as_deref(), Some("Site visit"));
    assert_eq!(events[0].start_date_time.as_deref(), Some("2024-12-10T09:00:00+01:00"));
    assert_eq!(events[0].end_date_time.as_deref(), Some("2024-12-10T09:45:00+01:00"));
}

#[tokio::test]
async fn list_events_without_items_is_empty() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "kind": "calendar#events" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, &[]).await;
    assert!(client.list_events(&window()).await.unwrap().is_empty());
}

#[tokio::test]
async fn access_token_is_reused_between_calls() {
    let server = MockServer::start().await;
    // `expect(1)` is verified when the server drops
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, &[]).await;
    client.list_events(&window()).await.unwrap();
    client.list_events(&window()).await.unwrap();
}

#[tokio::test]
async fn insert_event_posts_payload_and_notifies_attendees() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .and(query_param("sendUpdates", "all"))
        .and(body_partial_json(json!({
            "summary": "Appointment: Anna",
            "start": { "dateTime": "2024-12-10T10:00:00+01:00", "timeZone": "Europe/Berlin" },
            "attendees": [{ "email": "anna@example.com" }],
            "reminders": {
                "useDefault": false,
                "overrides": [{ "method": "popup", "minutes": 30 }]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "new-event",
            "htmlLink": "https://calendar.google.com/event?eid=new-event",
            "start": { "dateTime": "2024-12-10T10:00:00+01:00", "timeZone": "Europe/Berlin" },
            "end": { "dateTime": "2024-12-10T11:00:00+01:00", "timeZone": "Europe/Berlin" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &[]).await;
    let event = client.insert_event(&payload()).await.unwrap();

    assert_eq!(event.id, "new-event");
    assert_eq!(
        event.html_link.as_deref(),
        Some("https://calendar.google.com/event?eid=new-event")
    );
}

#[tokio::test]
async fn delete_event_targets_event_path() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/calendars/primary/events/abc123"))
        .and(query_param("sendUpdates", "all"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &[]).await;
    client.delete_event("abc123").await.unwrap();
}

#[tokio::test]
async fn delete_of_missing_event_keeps_remote_status() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/calendars/primary/events/gone"))
        .respond_with(ResponseTemplate::new(410).set_body_json(json!({
            "error": { "code": 410, "message": "Resource has been deleted" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, &[]).await;
    let err = client.delete_event("gone").await.unwrap_err();
    assert!(err.is_remote_not_found());
}

#[tokio::test]
async fn rejected_refresh_token_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })))
        .mount(&server)
        .await;

    let client = client_for(&server, &[]).await;
    let err = client.list_events(&window()).await.unwrap_err();
    assert!(matches!(
        &err,
        Error::GoogleCalendar { status: None, message } if message.contains("invalid_grant")
    ));
}

#[tokio::test]
async fn slow_calendar_times_out() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, &[("GOOGLE_API_TIMEOUT_SECS", "1")]).await;
    let err = client.list_events(&window()).await.unwrap_err();
    assert!(matches!(err, Error::GoogleCalendar { .. }));
    assert!(!err.is_remote_not_found());
}

#[tokio::test]
async fn unusable_token_lifetime_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "expires_in": i64::MAX
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, &[]).await;
    let err = client.list_events(&window()).await.unwrap_err();
    assert!(matches!(
        &err,
        Error::GoogleCalendar { status: None, message } if message.contains("expires_in")
    ));
}

use super::{ApiError, AppState};
use crate::components::booking::{AppointmentRequest, DeletedAppointment};
use crate::components::google_calendar::models::to_rfc3339;
use crate::error::validation_error;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDetails {
    pub start: String,
    pub end: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub id: String,
    pub created: bool,
    pub message: String,
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    pub details: AppointmentDetails,
}

/// Handler for the public status endpoint
pub async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    let message = t!("api.running", locale = state.locale.as_ref()).to_string();
    Json(json!({ "message": message }))
}

/// Handler for `GET /calendar/availability`
pub async fn availability_handler(
    State(state): State<AppState>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        state.reject(validation_error(&t!(
            "validation.invalid_query",
            locale = state.locale.as_ref(),
            reason = rejection.body_text()
        )))
    })?;
    let availability = state
        .booking
        .check_availability(&query.date, &query.time)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(AvailabilityResponse {
        available: availability.available,
        message: availability.message,
        start: availability.slot.map(|slot| to_rfc3339(&slot.start)),
        end: availability.slot.map(|slot| to_rfc3339(&slot.end)),
    }))
}

/// Handler for `POST /calendar/appointments`
pub async fn create_appointment_handler(
    State(state): State<AppState>,
    request: Result<Json<AppointmentRequest>, JsonRejection>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let Json(request) = request.map_err(|rejection| {
        state.reject(validation_error(&t!(
            "validation.invalid_body",
            locale = state.locale.as_ref(),
            reason = rejection.body_text()
        )))
    })?;
    let booked = state
        .booking
        .create_appointment(&request)
        .await
        .map_err(|e| state.reject(e))?;

    let start = to_rfc3339(&booked.start);
    let end = to_rfc3339(&booked.end);

    Ok(Json(AppointmentResponse {
        id: booked.id,
        created: true,
        message: booked.message,
        start: start.clone(),
        end: end.clone(),
        html_link: booked.html_link,
        details: AppointmentDetails {
            start,
            end,
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
        },
    }))
}

/// Handler for `DELETE /calendar/appointments/{id}`
pub async fn delete_appointment_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedAppointment>, ApiError> {
    info!("Cancellation requested for {}", id);
    let deleted = state
        .booking
        .delete_appointment(&id)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(deleted))
}

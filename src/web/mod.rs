mod auth;
mod handlers;

pub use auth::API_KEY_HEADER;
pub use handlers::{
    AppointmentDetails, AppointmentResponse, AvailabilityQuery, AvailabilityResponse,
};

use crate::components::BookingHandle;
use crate::error::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{middleware, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, warn};

#[derive(Clone)]
pub struct AppState {
    /// Booking logic shared by all requests
    pub booking: BookingHandle,
    /// Expected value of the `X-API-Key` header
    pub api_key: Arc<str>,
    /// Locale for boundary messages
    pub locale: Arc<str>,
}

impl AppState {
    pub fn new(booking: BookingHandle, api_key: &str) -> Self {
        let locale = Arc::from(booking.locale());
        Self {
            booking,
            api_key: Arc::from(api_key),
            locale,
        }
    }

    /// Wrap an error for the HTTP response
    fn reject(&self, error: Error) -> ApiError {
        ApiError {
            error,
            locale: Arc::clone(&self.locale),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let calendar = Router::new()
        .route("/calendar/availability", get(handlers::availability_handler))
        .route("/calendar/appointments", post(handlers::create_appointment_handler))
        .route(
            "/calendar/appointments/{id}",
            delete(handlers::delete_appointment_handler),
        )
        // Apply API key check to everything under /api/v1
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_api_key));

    Router::new()
        .route("/", get(handlers::root_handler))
        .nest("/api/v1", calendar)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// An error on its way to the client
#[derive(Debug)]
pub struct ApiError {
    error: Error,
    locale: Arc<str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let locale = self.locale.as_ref();
        let (status, detail) = match self.error {
            Error::Validation(message) => {
                warn!("Rejected invalid request: {}", message);
                (StatusCode::BAD_REQUEST, message)
            }
            Error::Conflict(message) => {
                warn!("Rejected booking: {}", message);
                (StatusCode::CONFLICT, message)
            }
            err if err.is_remote_not_found() => {
                warn!("Remote calendar reported not found: {}", err);
                (StatusCode::NOT_FOUND, t!("errors.not_found", locale = locale).to_string())
            }
            err @ Error::GoogleCalendar { .. } => {
                error!("Calendar request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    t!("errors.upstream", locale = locale).to_string(),
                )
            }
            err => {
                error!("Unexpected error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    t!("errors.internal", locale = locale).to_string(),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

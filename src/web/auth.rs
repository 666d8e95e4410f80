use super::AppState;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Authentication error
#[derive(Debug)]
enum AuthError {
    /// Header is missing
    MissingKey,
    /// Header does not match the configured key
    InvalidKey,
}

/// Reject requests without the configured API key before any handler runs
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match check_key(&req, &state.api_key) {
        Ok(()) => next.run(req).await,
        Err(err) => {
            warn!("Unauthorized request to {}: {:?}", req.uri().path(), err);
            let locale = state.locale.as_ref();
            let detail = match err {
                AuthError::MissingKey => t!("auth.missing_key", locale = locale),
                AuthError::InvalidKey => t!("auth.invalid_key", locale = locale),
            };
            (StatusCode::UNAUTHORIZED, Json(json!({ "detail": detail }))).into_response()
        }
    }
}

fn check_key(req: &Request, expected: &str) -> Result<(), AuthError> {
    let provided = match req.headers().get(API_KEY_HEADER) {
        Some(value) => value.to_str().map_err(|_| AuthError::InvalidKey)?,
        None => return Err(AuthError::MissingKey),
    };

    if provided.is_empty() {
        return Err(AuthError::MissingKey);
    }
    if provided != expected {
        return Err(AuthError::InvalidKey);
    }
    Ok(())
}

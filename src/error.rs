use miette::{Diagnostic, Result};
use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// Client input could not be parsed or is malformed
    #[error("{0}")]
    #[diagnostic(code(solar_calendar::validation))]
    Validation(String),

    /// Requested slot violates booking policy or is already taken
    #[error("{0}")]
    #[diagnostic(code(solar_calendar::conflict))]
    Conflict(String),

    #[error("Google Calendar API error: {message}")]
    #[diagnostic(code(solar_calendar::google_calendar))]
    GoogleCalendar {
        /// HTTP status reported by the remote service, if a response arrived
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Environment error: {0}")]
    #[diagnostic(code(solar_calendar::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(solar_calendar::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(solar_calendar::io))]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    #[diagnostic(code(solar_calendar::other))]
    Other(String),
}

impl Error {
    /// Whether the remote calendar reported the referenced resource as missing
    pub fn is_remote_not_found(&self) -> bool {
        match self {
            Error::GoogleCalendar {
                status: Some(status),
                ..
            } => *status == StatusCode::NOT_FOUND || *status == StatusCode::GONE,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("Request timed out: {}", err)
        } else {
            err.to_string()
        };
        Error::GoogleCalendar {
            status: err.status(),
            message,
        }
    }
}

/// Type alias for Result with our Error type
pub type BookingResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create conflict errors
pub fn conflict_error(message: &str) -> Error {
    Error::Conflict(message.to_string())
}

/// Helper to create Google Calendar errors without a response status
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar {
        status: None,
        message: message.to_string(),
    }
}

/// Helper to create Google Calendar errors for a non-success HTTP response
pub fn google_status_error(status: StatusCode, message: &str) -> Error {
    Error::GoogleCalendar {
        status: Some(status),
        message: format!("HTTP {} - {}", status, message),
    }
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}

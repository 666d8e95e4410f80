use crate::error::{config_error, env_error, BookingResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Default zone for all appointments
pub const DEFAULT_TIMEZONE: &str = "Europe/Berlin";

/// Default Google Calendar REST endpoint
pub const DEFAULT_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Default OAuth token endpoint
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Locales shipped in `locales/`
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "de"];

/// Main configuration structure for the service
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret expected in the `X-API-Key` header
    pub api_key: String,
    /// Google Calendar API client ID
    pub google_client_id: String,
    /// Google Calendar API client secret
    pub google_client_secret: String,
    /// Long-lived refresh token obtained with `get_calendar_token`
    pub google_refresh_token: String,
    /// Google Calendar ID holding the appointments
    pub google_calendar_id: String,
    /// Fixed local zone every appointment is interpreted in
    pub timezone: Tz,
    /// Locale for user-facing messages
    pub bot_locale: String,
    /// Address the HTTP server binds to
    pub host: String,
    pub port: u16,
    /// Upper bound for a single request to Google
    pub google_api_timeout: Duration,
    pub google_calendar_api_base: String,
    pub google_token_uri: String,
}

impl Config {
    /// Load configuration from `.env` and the process environment
    pub fn load() -> BookingResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> BookingResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| env_error(key));

        // Required environment variables
        let api_key = required("API_KEY")?;
        let google_client_id = required("GOOGLE_CLIENT_ID")?;
        let google_client_secret = required("GOOGLE_CLIENT_SECRET")?;
        let google_refresh_token = required("GOOGLE_REFRESH_TOKEN")?;
        let google_calendar_id = required("GOOGLE_CALENDAR_ID")?;

        let timezone_name = lookup("TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = timezone_name
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown TIMEZONE: {}", timezone_name)))?;

        let bot_locale = lookup("BOT_LOCALE").unwrap_or_else(|| "en".to_string());
        if !SUPPORTED_LOCALES.contains(&bot_locale.as_str()) {
            return Err(config_error(&format!("Unsupported BOT_LOCALE: {}", bot_locale)));
        }

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| config_error("Invalid PORT format"))?,
            None => 10000,
        };

        let timeout_secs = match lookup("GOOGLE_API_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| config_error("Invalid GOOGLE_API_TIMEOUT_SECS format"))?,
            None => 10,
        };

        let google_calendar_api_base = lookup("GOOGLE_CALENDAR_API_BASE")
            .unwrap_or_else(|| DEFAULT_CALENDAR_API_BASE.to_string());
        let google_token_uri =
            lookup("GOOGLE_TOKEN_URI").unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string());

        Ok(Config {
            api_key,
            google_client_id,
            google_client_secret,
            google_refresh_token,
            google_calendar_id,
            timezone,
            bot_locale,
            host,
            port,
            google_api_timeout: Duration::from_secs(timeout_secs),
            google_calendar_api_base,
            google_token_uri,
        })
    }

    /// Socket address string for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

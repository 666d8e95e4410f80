use crate::config::Config;
use crate::error::{google_calendar_error, BookingResult};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error};

/// Refresh this long before Google's reported expiry
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

/// Exchanges the configured refresh token for short-lived access tokens
#[derive(Clone)]
pub struct TokenManager {
    config: Arc<Config>,
    client: Client,
    cached: Arc<RwLock<Option<AccessToken>>>,
}

impl TokenManager {
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self {
            config,
            client,
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Get a valid access token, refreshing it if needed
    pub async fn access_token(&self) -> BookingResult<String> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref().filter(|t| Self::is_fresh(t)) {
                return Ok(token.value.clone());
            }
        }

        let mut cached = self.cached.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref().filter(|t| Self::is_fresh(t)) {
            return Ok(token.value.clone());
        }

        let token = self.refresh().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    fn is_fresh(token: &AccessToken) -> bool {
        token
            .expires_at
            .checked_sub_signed(Duration::seconds(EXPIRY_MARGIN_SECS))
            .is_some_and(|refresh_at| refresh_at > Utc::now())
    }

    /// Run the refresh-token grant against the token endpoint
    async fn refresh(&self) -> BookingResult<AccessToken> {
        debug!("Refreshing Google access token");

        let params = [
            ("client_id", self.config.google_client_id.as_str()),
            ("client_secret", self.config.google_client_secret.as_str()),
            ("refresh_token", self.config.google_refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(&self.config.google_token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            error!("Token refresh rejected: HTTP {} - {}", status, error_body);
            return Err(google_calendar_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))?;

        let expires_at = expiry_after(Utc::now(), token.expires_in.unwrap_or(3600))?;
        Ok(AccessToken {
            value: token.access_token,
            expires_at,
        })
    }
}

/// Instant `expires_in` seconds after `now`, rejecting values chrono cannot represent
fn expiry_after(now: DateTime<Utc>, expires_in: i64) -> BookingResult<DateTime<Utc>> {
    Duration::try_seconds(expires_in)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            google_calendar_error(&format!(
                "Token response has an unusable expires_in: {}",
                expires_in
            ))
        })
}

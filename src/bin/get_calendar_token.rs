use solar_calendar::config::DEFAULT_TOKEN_URI;
use solar_calendar::error::{env_error, other_error, BookingResult};
use std::env;
use url::Url;

const REDIRECT_URI: &str = "http://localhost:8080";
const AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// Read/write access is needed to insert and delete events
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Run the OAuth consent flow once and print the refresh token for `.env`
#[tokio::main]
async fn main() -> BookingResult<()> {
    dotenvy::dotenv().ok();

    // Get client ID and secret
    let client_id = env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
    let client_secret =
        env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;
    let token_uri = env::var("GOOGLE_TOKEN_URI").unwrap_or_else(|_| DEFAULT_TOKEN_URI.to_string());

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();

    // Construct authorization URL
    let auth_url = Url::parse_with_params(
        AUTH_URI,
        &[
            ("client_id", client_id.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("response_type", "code"),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("scope", CALENDAR_SCOPE),
            ("state", state.as_str()),
        ],
    )
    .map_err(|e| other_error(&format!("Failed to build authorization URL: {}", e)))?;

    // Open browser for authorization
    println!("Opening browser for Google Calendar authorization...");
    if webbrowser::open(auth_url.as_str()).is_err() {
        println!("Could not open a browser. Visit this URL manually:\n{}", auth_url);
    }

    // Start local server to receive the callback
    let server = tiny_http::Server::http("127.0.0.1:8080")
        .map_err(|e| other_error(&format!("Failed to start callback listener: {}", e)))?;
    println!("Waiting for authorization callback...");

    // Handle the callback
    let request = server.recv()?;
    let callback = Url::parse(&format!("{}{}", REDIRECT_URI, request.url()))
        .map_err(|e| other_error(&format!("Malformed callback URL: {}", e)))?;

    let param = |name: &str| {
        callback
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    if param("state").as_deref() != Some(state.as_str()) {
        request.respond(tiny_http::Response::from_string("State mismatch, please retry."))?;
        return Err(other_error("OAuth state mismatch in callback"));
    }

    // Parse the authorization code from the URL
    let code = param("code").ok_or_else(|| other_error("No authorization code found in callback"))?;

    // Exchange code for tokens
    let client = reqwest::Client::new();
    let response = client
        .post(&token_uri)
        .form(&[
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(other_error(&format!("Failed to get token: {}", error_text)));
    }

    let token_data: serde_json::Value = response.json().await?;
    let refresh_token = token_data
        .get("refresh_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| other_error("Token response did not include a refresh token"))?;

    // Send success response to browser
    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request.respond(response)?;

    println!("\nAuthentication successful! Add this line to your .env file:\n");
    println!("GOOGLE_REFRESH_TOKEN={}", refresh_token);

    Ok(())
}

use crate::components::{BookingHandle, CalendarApi, GoogleCalendarClient};
use crate::config::Config;
use crate::error::Error;
use crate::shutdown;
use crate::web::{router, AppState};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(config)),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Wire the Google client into the booking logic and serve HTTP until a signal arrives
pub async fn start_server(config: Arc<Config>) -> miette::Result<()> {
    info!(
        "Using calendar {} in zone {} with locale {}",
        config.google_calendar_id, config.timezone, config.bot_locale
    );

    let calendar: Arc<dyn CalendarApi> = Arc::new(GoogleCalendarClient::new(Arc::clone(&config))?);
    let booking = BookingHandle::new(&config, calendar);
    let app = router(AppState::new(booking, &config.api_key));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(Error::from)?;
    info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(Error::from)?;

    info!("Server shut down");
    Ok(())
}

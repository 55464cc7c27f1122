use crate::components::booking::{BookingScreenHandle, ScreenOptions};
use crate::components::shifts::ApiClient;
use crate::config::Config;
use crate::error::{BookingResult, Error};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config and apply its locale
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => {
            crate::utils::i18n::set_locale(&config.locale);
            info!("Setting locale to {}", config.locale);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Open a booking screen talking to the configured API
pub fn open_screen(config: &Config) -> BookingResult<BookingScreenHandle> {
    let client = ApiClient::from_config(config)?;
    info!("Using booking API at {}", config.api_base_url);

    let options = ScreenOptions::from_config(config)?;
    Ok(BookingScreenHandle::new(Arc::new(client), options))
}

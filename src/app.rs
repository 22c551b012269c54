use std::error::Error;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::Settings;

pub async fn run() -> Result<(), Box<dyn Error>> {
    let _ = dotenvy::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let settings = Settings::load().map_err(|err| {
        error!(error = %err, "Failed to load settings");
        err
    })?;

    let state = crate::infrastructure::bootstrap::setup(&settings)?;
    let server = crate::interfaces::http::start_server(state, &settings.bind_host, settings.port)
        .map_err(|err| {
            error!(error = %err, host = %settings.bind_host, port = settings.port, "Failed to bind HTTP server");
            err
        })?;

    info!(host = %settings.bind_host, port = settings.port, "Feedback service listening");
    server.await?;
    Ok(())
}

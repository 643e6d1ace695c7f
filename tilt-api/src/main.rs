//! Tilt API - Main entry point.

use anyhow::Result;
use tilt_common::config::Config;
use tilt_common::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    tracing::info!("Tilt API v{}", env!("CARGO_PKG_VERSION"));

    // Start the API server
    tilt_api::start_server(&config).await
}

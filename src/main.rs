use bookstore::app_system::{setup_tracing, BookstoreSystem};
use bookstore::config::AppConfig;
use bookstore::BookstoreError;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), BookstoreError> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = AppConfig::from_env()?;
    info!("Starting bookstore");

    let system = BookstoreSystem::new(config.channel_buffer);

    if let Some(path) = &config.seed_file {
        let span = tracing::info_span!("seed_catalogue", path = %path.display());
        system.seed_books(path).instrument(span).await?;
    }

    let reclaimer = system
        .reclaimer()
        .with_config(config.reclaimer_config())
        .start();

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Could not listen for shutdown signal");
    }
    info!("Shutdown requested");

    let stats = reclaimer.stop().await?;
    info!(sweeps = stats.sweeps, reclaimed = stats.reclaimed, "Reclaimer stopped");

    system.shutdown().await?;
    info!("Bookstore stopped");
    Ok(())
}

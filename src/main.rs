mod config;
mod dates;
mod error;
mod fitx_client;
mod scheduler;
mod sheets_client;
mod sync;

use std::sync::Arc;

use anyhow::Result;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::fitx_client::FitxClient;
use crate::scheduler::CheckinScheduler;
use crate::sheets_client::SheetsClient;
use crate::sync::SheetStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "checkin_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting check-in sync service");

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let fitx = Arc::new(FitxClient::new(config.portal.clone())?);
    let sheet: Arc<dyn SheetStore> = Arc::new(SheetsClient::new(&config.sheet).await?);

    tracing::info!("Run at startup: {}", config.run_at_startup);
    if config.run_at_startup {
        sync::run_job(&fitx, sheet.as_ref()).await;
    }

    let mut scheduler = CheckinScheduler::new(config.schedule.clone(), fitx, sheet);
    scheduler.start().await?;
    tracing::info!("Scheduled check-in sync job ({})", config.schedule);

    // Wait for shutdown signal
    signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping...");

    scheduler.stop().await?;
    tracing::info!("Check-in sync service stopped");
    Ok(())
}

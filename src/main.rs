mod api;
mod config;
mod error;
mod estimator;
mod models;
mod pipeline;
mod price;
mod provider;
mod sessions;

use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();

    info!("Chemo sessions service starting...");

    let cfg = config::load()?;
    info!("  Provider: {}", cfg.provider_url);
    info!("  Port: {}", cfg.port);
    info!("  History window: {} blocks", cfg.history_window_blocks);
    info!("  Session cost: {} USD", cfg.session_cost_usd);

    let api_handle = tokio::spawn(api::serve(cfg));

    tokio::select! {
        res = api_handle => match res {
            Ok(Ok(_)) => info!("API exited cleanly"),
            Ok(Err(e)) => error!("API error: {:?}", e),
            Err(e) => error!("API task panicked: {:?}", e),
        },
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received, stopping...");
        }
    }

    info!("Chemo sessions service stopped.");
    Ok(())
}

use lot_monitor::config::MonitorConfig;
use lot_monitor::errors::MonitorError;
use lot_monitor::lot_store::LotStore;
use lot_monitor::monitor::Monitor;
use lot_monitor::scraper_client::ScraperClient;
use log::{info, warn};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), MonitorError> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .init();

    let config = MonitorConfig::default();

    let store = LotStore::open(&config.db_path)?;
    match store.latest()?.first() {
        Some(last) => info!(
            "Opened {} (last check at {})",
            config.db_path.display(),
            last.checked_at
        ),
        None => info!("Opened {} (no observations yet)", config.db_path.display()),
    }

    let scraper_client = ScraperClient::new(&config)?;
    let mut monitor = Monitor::new(scraper_client, store, &config);

    let shutdown = CancellationToken::new();
    let ct = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        ct.cancel();
    });

    monitor.run(shutdown).await?;
    Ok(())
}

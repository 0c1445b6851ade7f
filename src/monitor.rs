use crate::config::MonitorConfig;
use crate::errors::{FailureReason, ScraperError, StoreError};
use crate::lot_processor::{parse_lot_status, LotStatus};
use crate::lot_store::LotStore;
use crate::scraper_client::PageSource;
use chrono::{DateTime, Local, Utc};
use log::{info, warn};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// What happened in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Recorded {
        checked_at: DateTime<Utc>,
        rows: usize,
    },
    Skipped(FailureReason),
}

/// Drives fetch, parse and record, sleeping a fixed interval between cycles.
pub struct Monitor<S> {
    source: S,
    store: LotStore,
    config: MonitorConfig,
}

impl<S: PageSource + Send> Monitor<S> {
    pub fn new(source: S, store: LotStore, config: &MonitorConfig) -> Self {
        Self {
            source,
            store,
            config: config.clone(),
        }
    }

    async fn current_status(&mut self) -> Result<LotStatus, ScraperError> {
        let page = self.source.fetch_page().await?;
        parse_lot_status(&page)
    }

    /// Run a single cycle.
    ///
    /// Fetch and parse failures are logged and reported as `Skipped`; nothing is
    /// written for that cycle. Store failures are returned to the caller.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, StoreError> {
        let status = match self.current_status().await {
            Ok(status) => status,
            Err(e) => {
                warn!("failed to get lot status at {}: {}", Local::now(), e);
                return Ok(CycleOutcome::Skipped(e.reason()));
            }
        };

        let checked_at = Utc::now();
        let rows = self.store.record(checked_at, &status)?;
        info!("Recorded {} lots at {}", rows, checked_at);

        Ok(CycleOutcome::Recorded { checked_at, rows })
    }

    /// Sleep, cycle, repeat until `shutdown` is cancelled.
    ///
    /// Every sleep lasts the full interval, counted from the end of the previous
    /// cycle, and the first fetch happens one interval after the call.
    /// Cancellation is only noticed between cycles. A store failure ends the loop
    /// with an error.
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<(), StoreError> {
        let interval = self.config.interval;
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Checking lot status every {:?}", interval);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested, stopping monitor");
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }
            self.run_cycle().await?;
            ticker.reset();
        }
    }

    pub fn store(&self) -> &LotStore {
        &self.store
    }
}

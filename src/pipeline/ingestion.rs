//! Ingestion loop - polling, gap backfill, and window maintenance
//!
//! One loop owns the window store and produces every mutation. The tick body runs
//! inline in the timer loop, so a slow pass delays the next tick instead of
//! overlapping it; there is never more than one ingestion pass in flight.
//!
//! Lifecycle:
//! 1. Fetch the latest height H0 and backfill `[max(H0 - N + 1, 1), H0]`
//!    concurrently (fan-out/fan-in; each height is independent and idempotent).
//!    Heights that fail to fetch are skipped, not retried.
//! 2. Every tick, fetch the latest height H1. The first tick ingests only H1.
//!    If H1 has advanced by more than one since the last tick, backfill the
//!    missed heights in ascending order before ingesting H1.
//! 3. After each pass: evict down to N heights, publish the re-ranked totals.
//! 4. A shutdown signal stops the loop; in-flight work is abandoned.

use crate::codec::relay_records_from_base64_tx;
use crate::error::FetchError;
use crate::gateway::{BlockData, BlockFetcher};
use crate::pipeline::aggregator::aggregate_block;
use crate::pipeline::ranking::{rank, RankedRow};
use crate::pipeline::window::WindowStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

/// Polling ingestion loop over a block fetcher
///
/// Publishes the ranked top-k chains through a watch channel after every pass.
pub struct IngestionLoop {
    fetcher: Arc<dyn BlockFetcher>,
    store: WindowStore,
    window_size: usize,
    top_k: usize,
    last_seen_height: Option<u64>,
    rankings_tx: watch::Sender<Vec<RankedRow>>,
}

impl IngestionLoop {
    pub fn new(
        fetcher: Arc<dyn BlockFetcher>,
        window_size: usize,
        top_k: usize,
    ) -> (Self, watch::Receiver<Vec<RankedRow>>) {
        let (rankings_tx, rankings_rx) = watch::channel(Vec::new());
        (
            Self {
                fetcher,
                store: WindowStore::new(),
                window_size: window_size.max(1),
                top_k,
                last_seen_height: None,
                rankings_tx,
            },
            rankings_rx,
        )
    }

    /// Run until the shutdown signal fires
    ///
    /// The signal is checked first on every wakeup, and an in-flight pass is
    /// dropped mid-fetch rather than awaited to completion: late results are
    /// discarded with the loop, never applied to a torn-down store.
    pub async fn run(mut self, tick_interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let initial_fill = async {
            match self.fetcher.fetch_latest().await {
                Ok(latest) => self.initial_backfill(latest).await,
                Err(e) => {
                    // Startup is not aborted; the first tick retries "latest"
                    log::warn!("⚠️  Initial latest-block fetch failed: {}", e);
                }
            }
        };
        tokio::select! {
            biased;
            _ = shutdown.changed() => {
                log::info!("🛑 Shutdown signal received, abandoning initial fill");
                return;
            }
            _ = initial_fill => {}
        }

        let mut timer = interval(tick_interval);
        // A slow pass delays subsequent ticks rather than bursting to catch up
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval fires immediately; consume the first tick so polling starts
        // one interval after the initial fill
        timer.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => {
                    log::info!("🛑 Shutdown signal received, stopping ingestion");
                    break;
                }
                _ = timer.tick() => {
                    tokio::select! {
                        biased;
                        _ = shutdown.changed() => {
                            log::info!("🛑 Shutdown signal received, abandoning in-flight pass");
                            break;
                        }
                        _ = self.run_tick() => {}
                    }
                }
            }
        }

        log::info!("✅ Ingestion stopped");
    }

    /// Fill the window with the most recent N heights
    ///
    /// The latest block is already in hand; the rest of the range is fetched
    /// concurrently. Failed heights are logged and skipped without blocking the
    /// transition to steady-state polling.
    pub async fn initial_backfill(&mut self, latest: BlockData) {
        let h0 = latest.height;
        let span = self.window_size as u64;
        let start = h0.saturating_sub(span - 1).max(1);

        log::info!("⏪ Initial backfill: heights {}..={}", start, h0);

        let fetches = (start..h0).map(|height| {
            let fetcher = Arc::clone(&self.fetcher);
            async move { (height, fetcher.fetch_by_height(height).await) }
        });

        for (height, result) in futures::future::join_all(fetches).await {
            match result {
                Ok(block) => self.ingest_block(&block),
                Err(e) => {
                    log::warn!("⚠️  Skipping height {} during initial backfill: {}", height, e);
                }
            }
        }

        self.ingest_block(&latest);
        self.store.evict_to_capacity(self.window_size);
        self.publish();

        log::info!("✅ Initial fill complete: {} heights in window", self.store.len());
    }

    /// One polling pass: fetch latest, backfill any gap, ingest, evict, publish
    ///
    /// A failed latest-fetch makes the whole tick a no-op (no height advance, no
    /// ingestion); the next tick retries.
    pub async fn run_tick(&mut self) {
        let latest = match self.fetcher.fetch_latest().await {
            Ok(block) => block,
            Err(e) => {
                log::warn!("⚠️  Latest block fetch failed, skipping tick: {}", e);
                return;
            }
        };
        let h1 = latest.height;

        if let Some(last) = self.last_seen_height {
            if h1 > last + 1 {
                // Polling can be coarser than block production; recover the
                // missed heights in ascending order before the newest one
                log::info!("⏪ Gap detected: backfilling heights {}..{}", last + 1, h1);
                for height in (last + 1)..h1 {
                    if let Err(e) = self.ingest_height(height).await {
                        log::warn!("⚠️  Skipping height {} during backfill: {}", height, e);
                    }
                }
            }
        }

        // Re-ingesting an unchanged height is a no-op on totals (replace-on-upsert)
        self.ingest_block(&latest);
        self.last_seen_height = Some(h1);
        self.store.evict_to_capacity(self.window_size);
        self.publish();
    }

    /// Fetch one height and merge its relay activity into the window
    async fn ingest_height(&mut self, height: u64) -> Result<(), FetchError> {
        let block = self.fetcher.fetch_by_height(height).await?;
        self.ingest_block(&block);
        Ok(())
    }

    /// Decode a fetched block's transactions and upsert its chain map
    ///
    /// Transactions that fail to decode are skipped individually; a block with no
    /// relay-payment messages contributes an empty map, which is a normal outcome.
    fn ingest_block(&mut self, block: &BlockData) {
        let mut records = Vec::new();
        for tx in &block.txs {
            match relay_records_from_base64_tx(tx) {
                Ok(mut tx_records) => records.append(&mut tx_records),
                Err(e) => {
                    log::warn!(
                        "⚠️  Undecodable transaction in block {}: {}",
                        block.height,
                        e
                    );
                }
            }
        }

        let map = aggregate_block(&records);
        log::debug!(
            "📥 Ingested height {}: {} chains, {} relay records",
            block.height,
            map.len(),
            records.len()
        );
        self.store.upsert(block.height, map);
    }

    fn publish(&mut self) {
        let rankings = rank(self.store.totals(), self.top_k);
        // send_replace never fails, even with no subscribers
        self.rankings_tx.send_replace(rankings);
    }

    pub fn last_seen_height(&self) -> Option<u64> {
        self.last_seen_height
    }

    /// Heights currently retained in the window, ascending
    pub fn window_heights(&self) -> Vec<u64> {
        self.store.heights()
    }

    pub fn window_len(&self) -> usize {
        self.store.len()
    }

    /// Snapshot of the current per-chain totals
    pub fn totals(&mut self) -> crate::pipeline::window::AggregateTotals {
        self.store.totals().clone()
    }
}

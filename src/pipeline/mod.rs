//! # Windowed relay aggregation pipeline
//!
//! In-memory pipeline from raw blocks to a ranked per-chain leaderboard:
//!
//! 1. Blocks arrive from the gateway (latest-height polling plus gap backfill)
//! 2. Each block's relay-payment messages fold into one per-chain map
//! 3. The window store retains the maps for the most recent N heights
//! 4. Totals across the window are re-ranked and republished on every change
//!
//! **Key principle:** nothing is persisted. The window is rebuilt from the chain
//! on every process start, so state stays bounded and there is no storage to
//! migrate or repair.
//!
//! ## Module organization
//!
//! - `aggregator` - per-block reduction of relay records into a chain map
//! - `window` - bounded height-keyed store with cached totals
//! - `ranking` - stable top-k derivation over the totals
//! - `ingestion` - the polling loop driving everything above

pub mod aggregator;
pub mod ingestion;
pub mod ranking;
pub mod window;

pub use aggregator::{aggregate_block, ChainMap};
pub use ingestion::IngestionLoop;
pub use ranking::{rank, RankedRow};
pub use window::{AggregateTotals, WindowStore};

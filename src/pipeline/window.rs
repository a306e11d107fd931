//! Bounded sliding window of per-block chain maps, keyed by height
//!
//! The store retains at most N heights. Re-ingesting a height replaces its entry
//! outright (never an additive merge), which is what makes re-ingestion idempotent
//! with respect to totals. Eviction is purely size-based, oldest height first;
//! there is no time-based expiry.

use super::aggregator::ChainMap;
use std::collections::BTreeMap;

/// Aggregated per-chain totals across every retained height
///
/// Derived state: rebuilt in ascending-height order so that the first-seen order
/// of chains (the ranking tie-break) is deterministic.
pub type AggregateTotals = ChainMap;

/// `height -> ChainMap` store bounded to the most recent N heights
pub struct WindowStore {
    // BTreeMap keeps heights sorted, so the eviction victim is always the first key
    entries: BTreeMap<u64, ChainMap>,

    // Cached totals, invalidated on every mutation
    totals_cache: Option<AggregateTotals>,
}

impl WindowStore {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            totals_cache: None,
        }
    }

    /// Insert or replace the entry for a height
    ///
    /// Replacement (not merge) on an existing height: ingesting the same block
    /// twice must leave totals unchanged, and a re-decode that found different
    /// content wins over what was stored before.
    pub fn upsert(&mut self, height: u64, map: ChainMap) {
        self.entries.insert(height, map);
        self.totals_cache = None;
    }

    /// Drop the smallest heights until at most `capacity` entries remain
    pub fn evict_to_capacity(&mut self, capacity: usize) {
        while self.entries.len() > capacity {
            if let Some((&oldest, _)) = self.entries.iter().next() {
                self.entries.remove(&oldest);
                self.totals_cache = None;
                log::debug!("🧹 Evicted height {} from window", oldest);
            }
        }
    }

    /// Per-chain totals across all retained heights
    ///
    /// Cached between mutations; the cache can never diverge from a from-scratch
    /// recompute because every mutation clears it.
    pub fn totals(&mut self) -> &AggregateTotals {
        let entries = &self.entries;
        self.totals_cache
            .get_or_insert_with(|| Self::recompute_totals(entries))
    }

    fn recompute_totals(entries: &BTreeMap<u64, ChainMap>) -> AggregateTotals {
        let mut totals = AggregateTotals::new();
        // Ascending height order: chains enter the totals map in the order the
        // window first saw them
        for map in entries.values() {
            for (chain, count) in map {
                *totals.entry(chain.clone()).or_insert(0) += count;
            }
        }
        totals
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_height(&self, height: u64) -> bool {
        self.entries.contains_key(&height)
    }

    /// Heights currently retained, ascending
    pub fn heights(&self) -> Vec<u64> {
        self.entries.keys().copied().collect()
    }
}

impl Default for WindowStore {
    fn default() -> Self {
        Self::new()
    }
}

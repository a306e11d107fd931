//! Ranked view over aggregate totals
//!
//! Pure derivation, no internal state: recomputed on every window change.

use super::window::AggregateTotals;

/// One row of the ranked output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRow {
    pub chain_id: String,
    pub total_relays: u64,
}

/// Top-k chains by total relay count
///
/// Stable sort descending by count; ties keep the totals map's iteration order
/// (the order chains were first seen in the window). Output length is at most `k`.
pub fn rank(totals: &AggregateTotals, k: usize) -> Vec<RankedRow> {
    let mut rows: Vec<RankedRow> = totals
        .iter()
        .map(|(chain_id, total)| RankedRow {
            chain_id: chain_id.clone(),
            total_relays: *total,
        })
        .collect();

    rows.sort_by(|a, b| b.total_relays.cmp(&a.total_relays));
    rows.truncate(k);
    rows
}
